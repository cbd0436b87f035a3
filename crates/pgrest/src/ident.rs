//! Safe SQL identifier handling.
//!
//! Postgres cannot bind identifiers as parameters, so every table, schema,
//! column and JSON-path segment that reaches statement text goes through
//! [`Ident::new`], which is the only way to construct an [`Ident`].
//!
//! An identifier is accepted when it:
//! - is at most 63 bytes long (`NAMEDATALEN - 1`)
//! - starts with an ASCII letter or `_`
//! - continues with ASCII letters, digits, `_` or `.`
//!
//! Nothing is quoted, escaped or normalized: input either passes unchanged or
//! is rejected.
//!
//! # Example
//! ```ignore
//! use pgrest::Ident;
//!
//! let col = Ident::new("created_at")?;
//! assert!(Ident::new("name; DROP TABLE users").is_err());
//! # Ok::<(), pgrest::RestError>(())
//! ```

use crate::error::{RestError, RestResult};
use std::fmt;

/// Postgres truncates identifiers longer than this many bytes.
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Returns `true` if `name` may be embedded in SQL text as a bare identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    if name.len() > MAX_IDENTIFIER_LEN {
        return false;
    }

    let mut bytes = name.bytes();
    let Some(first) = bytes.next() else {
        return false;
    };
    if !(first == b'_' || first.is_ascii_alphabetic()) {
        return false;
    }

    bytes.all(|b| b == b'_' || b == b'.' || b.is_ascii_alphanumeric())
}

/// Returns `true` if `name` must be rejected.
///
/// Negation of [`is_valid_identifier`], kept for callers that phrase the
/// check as "reject if invalid".
pub fn is_invalid_identifier(name: &str) -> bool {
    !is_valid_identifier(name)
}

/// A validated SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ident(String);

impl Ident {
    /// Validate `name` and wrap it.
    pub fn new(name: impl Into<String>) -> RestResult<Self> {
        let name = name.into();
        if is_invalid_identifier(&name) {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "pgrest.filter", identifier = %name, "rejected identifier");
            return Err(RestError::InvalidIdentifier(name));
        }
        Ok(Self(name))
    }

    /// The identifier as it appears in SQL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Convert an input into an [`Ident`].
///
/// This is mainly for ergonomics in builder APIs.
pub trait IntoIdent {
    fn into_ident(self) -> RestResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> RestResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &Ident {
    fn into_ident(self) -> RestResult<Ident> {
        Ok(self.clone())
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> RestResult<Ident> {
        Ident::new(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> RestResult<Ident> {
        Ident::new(self)
    }
}

/// A `(database, schema, table)` triple addressed by a request.
///
/// All three parts are validated on construction. Statement text names the
/// relation as `schema.table`; the database part tells the caller which
/// connection the statement belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    database: Ident,
    schema: Ident,
    table: Ident,
}

impl TableRef {
    /// Validate and build a table reference.
    pub fn new(
        database: impl IntoIdent,
        schema: impl IntoIdent,
        table: impl IntoIdent,
    ) -> RestResult<Self> {
        Ok(Self {
            database: database.into_ident()?,
            schema: schema.into_ident()?,
            table: table.into_ident()?,
        })
    }

    pub fn database(&self) -> &Ident {
        &self.database
    }

    pub fn schema(&self) -> &Ident {
        &self.schema
    }

    pub fn table(&self) -> &Ident {
        &self.table
    }

    /// `schema.table`
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.schema.0.len() + self.table.0.len() + 1);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push_str(self.schema.as_str());
        out.push('.');
        out.push_str(self.table.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(!is_invalid_identifier("fildName"));
        assert!(!is_invalid_identifier("_9fildName"));
        assert!(!is_invalid_identifier("_fild.Name"));
    }

    #[test]
    fn rejects_digit_start() {
        assert!(is_invalid_identifier("0fildName"));
    }

    #[test]
    fn rejects_quotes_and_semicolon() {
        assert!(is_invalid_identifier("fild'Name"));
        assert!(is_invalid_identifier("fild\"Name"));
        assert!(is_invalid_identifier("fild;Name"));
    }

    #[test]
    fn rejects_too_long() {
        let name = "_123456789_123456789_123456789_123456789_123456789_123456789_12345";
        assert!(name.len() > MAX_IDENTIFIER_LEN);
        assert!(is_invalid_identifier(name));
    }

    #[test]
    fn length_boundary() {
        assert!(is_valid_identifier(&"a".repeat(63)));
        assert!(!is_valid_identifier(&"a".repeat(64)));
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert!(is_invalid_identifier(""));
        assert!(is_invalid_identifier("my table"));
        assert!(is_invalid_identifier("name\n"));
    }

    #[test]
    fn rejects_non_ascii() {
        assert!(is_invalid_identifier("naïve"));
        assert!(is_invalid_identifier("étoile"));
    }

    #[test]
    fn ident_new_keeps_text() {
        let ident = Ident::new("public").unwrap();
        assert_eq!(ident.as_str(), "public");
        assert_eq!(ident.to_string(), "public");
    }

    #[test]
    fn ident_new_rejects() {
        let err = Ident::new("users--").unwrap_err();
        assert!(err.is_invalid_identifier());
    }

    #[test]
    fn table_ref_sql() {
        let t = TableRef::new("prest", "public", "test").unwrap();
        assert_eq!(t.to_sql(), "public.test");
        assert_eq!(t.database().as_str(), "prest");
    }

    #[test]
    fn table_ref_validates_every_part() {
        assert!(TableRef::new("prest;", "public", "test").is_err());
        assert!(TableRef::new("prest", "pub lic", "test").is_err());
        assert!(TableRef::new("prest", "public", "1test").is_err());
    }
}
