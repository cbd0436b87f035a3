//! UPDATE statements.

use super::{Statement, StatementKind};
use crate::error::{RestError, RestResult};
use crate::filter::{WhereClause, where_by_request};
use crate::ident::{Ident, TableRef};
use crate::params::ParamMap;
use crate::placeholder::Placeholders;
use crate::value::DataRecord;

/// `UPDATE schema.table SET c1=$1, c2=$2 WHERE <filter>`
///
/// SET placeholders take `$1..$n` for the `n` record columns, so `filter` must
/// already be numbered from `$n+1`. Bound values are the SET values followed by
/// the filter values.
pub fn update(table: &TableRef, record: &DataRecord, filter: &WhereClause) -> RestResult<Statement> {
    if record.is_empty() {
        return Err(RestError::EmptyRecord);
    }
    let columns = record
        .keys()
        .map(|k| Ident::new(k.as_str()))
        .collect::<RestResult<Vec<_>>>()?;
    if filter.is_empty() {
        return Err(RestError::MissingFilter("UPDATE"));
    }

    let mut sql = String::from("UPDATE ");
    table.write_sql(&mut sql);
    sql.push_str(" SET ");

    let mut placeholders = Placeholders::starting_at(1);
    for (i, (col, value)) in columns.iter().zip(record.values()).enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(col.as_str());
        sql.push('=');
        placeholders.push(&mut sql, value.clone())?;
    }

    sql.push_str(" WHERE ");
    sql.push_str(filter.sql());

    let mut values = placeholders.into_values();
    values.extend_from_slice(filter.values());

    Ok(Statement::new(StatementKind::Update, sql, values))
}

/// [`update`] with the filter built from request parameters, numbered to
/// follow the SET placeholders.
pub fn update_by_request(
    table: &TableRef,
    record: &DataRecord,
    params: &ParamMap,
) -> RestResult<Statement> {
    let filter = where_by_request(params, record.len() + 1)?;
    update(table, record, &filter)
}
