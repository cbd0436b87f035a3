//! INSERT statements.

use super::{Statement, StatementKind};
use crate::error::{RestError, RestResult};
use crate::ident::{Ident, TableRef};
use crate::placeholder::Placeholders;
use crate::value::DataRecord;

/// `INSERT INTO schema.table (c1, c2, ...) VALUES ($1, $2, ...)`
///
/// Columns appear in sorted key order, one placeholder each.
pub fn insert(table: &TableRef, record: &DataRecord) -> RestResult<Statement> {
    if record.is_empty() {
        return Err(RestError::EmptyRecord);
    }
    let columns = record
        .keys()
        .map(|k| Ident::new(k.as_str()))
        .collect::<RestResult<Vec<_>>>()?;

    let mut sql = String::from("INSERT INTO ");
    table.write_sql(&mut sql);
    sql.push_str(" (");
    for (i, col) in columns.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(col.as_str());
    }
    sql.push_str(") VALUES (");

    let mut placeholders = Placeholders::starting_at(1);
    for (i, value) in record.values().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        placeholders.push(&mut sql, value.clone())?;
    }
    sql.push(')');

    Ok(Statement::new(
        StatementKind::Insert,
        sql,
        placeholders.into_values(),
    ))
}
