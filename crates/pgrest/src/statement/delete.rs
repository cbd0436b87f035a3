//! DELETE statements.

use super::{Statement, StatementKind};
use crate::error::{RestError, RestResult};
use crate::filter::{WhereClause, where_by_request};
use crate::ident::TableRef;
use crate::params::ParamMap;

/// `DELETE FROM schema.table WHERE <filter>`
///
/// An empty filter is refused rather than deleting every row.
pub fn delete(table: &TableRef, filter: &WhereClause) -> RestResult<Statement> {
    if filter.is_empty() {
        return Err(RestError::MissingFilter("DELETE"));
    }

    let mut sql = String::from("DELETE FROM ");
    table.write_sql(&mut sql);
    sql.push_str(" WHERE ");
    sql.push_str(filter.sql());

    Ok(Statement::new(
        StatementKind::Delete,
        sql,
        filter.values().to_vec(),
    ))
}

/// [`delete`] with the filter built from request parameters.
pub fn delete_by_request(table: &TableRef, params: &ParamMap) -> RestResult<Statement> {
    delete(table, &where_by_request(params, 1)?)
}
