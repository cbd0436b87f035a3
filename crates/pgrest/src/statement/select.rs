//! SELECT statements driven by request parameters.

use super::{Statement, StatementKind};
use crate::error::RestResult;
use crate::filter::{WhereClause, where_by_request};
use crate::ident::{Ident, TableRef};
use crate::pagination::Page;
use crate::params::{ORDER_KEY, ParamMap, SELECT_KEY};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// One `ORDER BY` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: Ident,
    pub order: Order,
}

impl OrderBy {
    /// Parse `column` (ascending) or `-column` (descending).
    pub fn parse(item: &str) -> RestResult<Self> {
        let (name, order) = match item.strip_prefix('-') {
            Some(rest) => (rest, Order::Desc),
            None => (item, Order::Asc),
        };
        Ok(Self {
            column: Ident::new(name)?,
            order,
        })
    }
}

/// Everything a read request asks for besides the table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectRequest {
    /// Empty means the default column list.
    pub columns: Vec<Ident>,
    pub filter: WhereClause,
    pub order_by: Vec<OrderBy>,
    pub page: Option<Page>,
}

impl SelectRequest {
    /// Read `_select`, `_order`, `_page`/`_page_size` and the filters.
    ///
    /// `_select=a,b` picks columns (`*` means all). `_order=a,-b` sorts by `a`
    /// ascending then `b` descending. Every name is validated.
    pub fn from_params(params: &ParamMap) -> RestResult<Self> {
        let columns = list_items(params, SELECT_KEY)
            .filter(|item| *item != "*")
            .map(Ident::new)
            .collect::<RestResult<Vec<_>>>()?;
        let order_by = list_items(params, ORDER_KEY)
            .map(OrderBy::parse)
            .collect::<RestResult<Vec<_>>>()?;

        Ok(Self {
            columns,
            filter: where_by_request(params, 1)?,
            order_by,
            page: Page::from_params(params)?,
        })
    }

    /// Cap the requested page size.
    pub fn clamp_page(mut self, max_page_size: Option<u64>) -> Self {
        if let Some(max) = max_page_size {
            self.page = self.page.map(|p| p.clamp(max));
        }
        self
    }

    /// `SELECT ... FROM schema.table ...`
    pub fn build(&self, table: &TableRef) -> Statement {
        self.build_from(&table.to_sql(), None, "*")
    }

    /// Render against an arbitrary trusted relation.
    ///
    /// `relation`, `condition` and `default_columns` are written as is and
    /// must not contain request input.
    pub(crate) fn build_from(
        &self,
        relation: &str,
        condition: Option<&str>,
        default_columns: &str,
    ) -> Statement {
        let mut sql = String::from("SELECT ");
        if self.columns.is_empty() {
            sql.push_str(default_columns);
        } else {
            for (i, col) in self.columns.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(col.as_str());
            }
        }
        sql.push_str(" FROM ");
        sql.push_str(relation);

        match (condition, self.filter.is_empty()) {
            (Some(cond), true) => {
                sql.push_str(" WHERE ");
                sql.push_str(cond);
            }
            (Some(cond), false) => {
                sql.push_str(" WHERE ");
                sql.push_str(cond);
                sql.push_str(" AND ");
                sql.push_str(self.filter.sql());
            }
            (None, false) => {
                sql.push_str(" WHERE ");
                sql.push_str(self.filter.sql());
            }
            (None, true) => {}
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            for (i, item) in self.order_by.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(item.column.as_str());
                sql.push_str(match item.order {
                    Order::Asc => " ASC",
                    Order::Desc => " DESC",
                });
            }
        }

        if let Some(page) = &self.page {
            sql.push(' ');
            sql.push_str(&page.to_sql());
        }

        Statement::new(StatementKind::Select, sql, self.filter.values().to_vec())
    }
}

/// Comma-separated items of every value of `key`, trimmed, empties dropped.
fn list_items<'a>(params: &'a ParamMap, key: &str) -> impl Iterator<Item = &'a str> {
    params
        .get(key)
        .unwrap_or_default()
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `SELECT <_select or *> FROM schema.table [WHERE ...] [ORDER BY ...] [LIMIT ...]`
pub fn select_by_request(table: &TableRef, params: &ParamMap) -> RestResult<Statement> {
    Ok(SelectRequest::from_params(params)?.build(table))
}
