//! Parameterized statement construction.
//!
//! Builders validate every identifier before any text is assembled, so a
//! rejected column never leaves a half-built statement behind. Values flow
//! only through `$N` placeholders and the parallel value list.
//!
//! # Example
//!
//! ```ignore
//! use pgrest::{DataRecord, ParamMap, TableRef, statement};
//!
//! let table = TableRef::new("prest", "public", "test")?;
//! let mut record = DataRecord::new();
//! record.insert("name".into(), "prest".into());
//!
//! let stmt = statement::insert(&table, &record)?.returning_all();
//! assert_eq!(stmt.sql(), "INSERT INTO public.test (name) VALUES ($1) RETURNING *");
//!
//! let stmt = statement::update_by_request(&table, &record, &ParamMap::parse("id=7"))?;
//! assert_eq!(stmt.sql(), "UPDATE public.test SET name=$1 WHERE id=$2");
//! ```

mod delete;
mod insert;
mod select;
mod update;

pub use delete::{delete, delete_by_request};
pub use insert::insert;
pub use select::{Order, OrderBy, SelectRequest, select_by_request};
pub use update::{update, update_by_request};

use crate::value::Value;
use tokio_postgres::types::ToSql;

/// The kind of SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// A complete statement: SQL text with `$1, $2, ...` placeholders and the
/// values bound to them, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    kind: StatementKind,
    sql: String,
    values: Vec<Value>,
    returning: bool,
}

impl Statement {
    pub(crate) fn new(kind: StatementKind, sql: String, values: Vec<Value>) -> Self {
        Self {
            kind,
            sql,
            values,
            returning: false,
        }
    }

    /// Wrap an application-written query such as
    /// `SELECT schema_name FROM information_schema.schemata WHERE schema_name = $1`.
    ///
    /// The text is trusted as is and must never contain request input; values
    /// bind to `$1..$n` in order. The result is a read: [`Executor::fetch_json`]
    /// renders its rows as a JSON array.
    ///
    /// [`Executor::fetch_json`]: crate::executor::Executor::fetch_json
    pub fn raw(sql: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(StatementKind::Select, sql.into(), values)
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.values)
    }

    /// Append `RETURNING *` so the affected rows are reported back.
    ///
    /// No effect on SELECT statements or when already applied.
    pub fn returning_all(mut self) -> Self {
        if self.kind != StatementKind::Select && !self.returning {
            self.sql.push_str(" RETURNING *");
            self.returning = true;
        }
        self
    }

    /// Whether running the statement yields rows.
    pub fn returns_rows(&self) -> bool {
        self.kind == StatementKind::Select || self.returning
    }

    /// SQL that makes the server render the rows as one JSON array.
    ///
    /// Returns `None` for writes without `RETURNING`.
    pub fn to_json_sql(&self) -> Option<String> {
        const AGG: &str = "SELECT COALESCE(json_agg(s), '[]'::json) FROM";
        match self.kind {
            StatementKind::Select => Some(format!("{AGG} ({}) s", self.sql)),
            _ if self.returning => Some(format!("WITH s AS ({}) {AGG} s", self.sql)),
            _ => None,
        }
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }
}
