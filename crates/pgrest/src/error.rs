//! Error types for pgrest

use thiserror::Error;

/// Result type alias for pgrest operations
pub type RestResult<T> = Result<T, RestError>;

/// Errors raised while building or executing statements.
///
/// The first group is produced by the pure builders and is fully deterministic:
/// the same input always fails the same way. The second group comes from the
/// database adapter.
#[derive(Debug, Error)]
pub enum RestError {
    /// A table, schema, column or JSON-path segment failed identifier validation
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// `_page` / `_page_size` present but not a positive integer
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    /// A filter key uses JSON-path syntax that cannot be split into column and path
    #[error("Malformed filter key: {0}")]
    MalformedFilterKey(String),

    /// INSERT/UPDATE with no columns
    #[error("Record has no columns")]
    EmptyRecord,

    /// A placeholder index would exceed what Postgres accepts (`$65535`)
    #[error("Too many parameters: placeholder ${0} is out of range")]
    TooManyParameters(usize),

    /// UPDATE/DELETE without a WHERE fragment
    #[error("{0} requires a WHERE clause")]
    MissingFilter(&'static str),

    /// Missing or unparsable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// Result document could not be produced
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),

    /// Query timeout error
    #[error("Query timeout after {0:?}")]
    Timeout(std::time::Duration),
}

impl RestError {
    /// Create an invalid identifier error
    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier(name.into())
    }

    /// Create an invalid pagination error
    pub fn invalid_pagination(message: impl Into<String>) -> Self {
        Self::InvalidPagination(message.into())
    }

    /// Create a malformed filter key error
    pub fn malformed_filter_key(key: impl Into<String>) -> Self {
        Self::MalformedFilterKey(key.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the error was raised while building a statement (bad request input)
    /// rather than while talking to the database.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier(_)
                | Self::InvalidPagination(_)
                | Self::MalformedFilterKey(_)
                | Self::EmptyRecord
                | Self::MissingFilter(_)
                | Self::TooManyParameters(_)
        )
    }

    /// Check if this is an invalid identifier error
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self, Self::InvalidIdentifier(_))
    }

    /// Check if this is a unique violation error
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Parse a tokio_postgres error into a more specific RestError
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let message = db_err.message();

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(format!("{}: {}", constraint, message)),
                "23503" => {
                    return Self::ForeignKeyViolation(format!("{}: {}", constraint, message));
                }
                "23514" => return Self::CheckViolation(format!("{}: {}", constraint, message)),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for RestError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_errors_are_client_errors() {
        assert!(RestError::invalid_identifier("a;b").is_client_error());
        assert!(RestError::invalid_pagination("_page=0").is_client_error());
        assert!(RestError::malformed_filter_key("->>x").is_client_error());
        assert!(RestError::EmptyRecord.is_client_error());
        assert!(RestError::MissingFilter("DELETE").is_client_error());
        assert!(RestError::TooManyParameters(65536).is_client_error());
        assert!(!RestError::config("DATABASE_URL").is_client_error());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            RestError::invalid_identifier("fild'Name").to_string(),
            "Invalid identifier: fild'Name"
        );
        assert_eq!(
            RestError::MissingFilter("UPDATE").to_string(),
            "UPDATE requires a WHERE clause"
        );
    }
}
