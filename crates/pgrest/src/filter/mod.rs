//! WHERE clause construction from request parameters.
//!
//! Every non-reserved parameter becomes one equality test. Keys are parsed
//! into a [`FieldSpec`] and validated; values only ever reach the database as
//! bound parameters.
//!
//! ```ignore
//! use pgrest::{ParamMap, where_by_request};
//!
//! let params = ParamMap::parse("name=nuveo&data->>description:jsonb=bla");
//! let clause = where_by_request(&params, 1)?;
//! assert_eq!(clause.sql(), "data->>'description'=$1 AND name=$2");
//! ```

mod field;

pub use field::{FieldSpec, FieldType, JsonOp, JsonPath};

use crate::error::RestResult;
use crate::params::ParamMap;
use crate::placeholder::Placeholders;
use crate::value::Value;

/// A parameterized WHERE fragment (without the `WHERE` keyword) and the
/// values bound to its placeholders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    sql: String,
    values: Vec<Value>,
    next_placeholder: usize,
}

impl WhereClause {
    /// Wrap a caller-written fragment such as `"name=$2"` whose placeholders
    /// run from `$offset` to `$offset + values.len() - 1`.
    ///
    /// The fragment is trusted as is: it must come from application code or
    /// from [`where_by_request`], never from request input. Placeholders in it
    /// must already be numbered for the statement it will be embedded in. An
    /// offset of 0 is treated as 1.
    pub fn raw(sql: impl Into<String>, values: Vec<Value>, offset: usize) -> Self {
        Self {
            sql: sql.into(),
            next_placeholder: offset.max(1).saturating_add(values.len()),
            values,
        }
    }

    /// The fragment text, e.g. `dbname=$1 AND test=$2`.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Values in placeholder order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// The first placeholder index not used by this fragment.
    pub fn next_placeholder(&self) -> usize {
        self.next_placeholder
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.values)
    }
}

/// Build a WHERE fragment from the filter parameters in `params`.
///
/// Placeholders start at `$offset` (an offset of 0 is treated as 1); a
/// placeholder past `$65535` fails with [`RestError::TooManyParameters`].
///
/// [`RestError::TooManyParameters`]: crate::error::RestError::TooManyParameters Keys are
/// visited in sorted order, so identical input always produces identical
/// output. Control keys (`_page`, `_page_size`, anything starting with `_`)
/// are skipped. A key given several values produces one `key=$N` test per
/// value, all joined with ` AND `.
///
/// No filters yields an empty clause, not an error.
pub fn where_by_request(params: &ParamMap, offset: usize) -> RestResult<WhereClause> {
    let mut placeholders = Placeholders::starting_at(offset);
    let mut sql = String::new();

    for (key, values) in params.filters() {
        let field = FieldSpec::parse(key)?;
        for value in values {
            if !sql.is_empty() {
                sql.push_str(" AND ");
            }
            field.write_sql(&mut sql);
            sql.push('=');
            placeholders.push(&mut sql, Value::Text(value.clone()))?;
        }
    }

    Ok(WhereClause {
        sql,
        next_placeholder: placeholders.next_index(),
        values: placeholders.into_values(),
    })
}

#[cfg(test)]
mod tests;
