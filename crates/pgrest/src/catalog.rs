//! Catalog listings: databases, schemas and tables.
//!
//! These read fixed system relations; request parameters only contribute
//! filters, column choice, ordering and pagination, all validated the same
//! way as table reads.

use crate::error::RestResult;
use crate::params::ParamMap;
use crate::statement::{SelectRequest, Statement};

/// A system relation that can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    /// `pg_database`, templates excluded. Filter on `datname`.
    Databases,
    /// `information_schema.schemata`. Filter on `schema_name`.
    Schemas,
    /// `pg_catalog.pg_tables`, system schemas excluded. Filter on
    /// `schemaname` / `tablename`.
    Tables,
}

impl Catalog {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Databases => "databases",
            Self::Schemas => "schemas",
            Self::Tables => "tables",
        }
    }

    /// Build the listing for an already parsed request.
    pub fn statement(self, req: &SelectRequest) -> Statement {
        match self {
            Self::Databases => req.build_from("pg_database", Some("NOT datistemplate"), "datname"),
            Self::Schemas => req.build_from("information_schema.schemata", None, "schema_name"),
            Self::Tables => req.build_from(
                "pg_catalog.pg_tables",
                Some("schemaname NOT IN ('pg_catalog', 'information_schema')"),
                "schemaname, tablename",
            ),
        }
    }
}

/// `SELECT datname FROM pg_database WHERE NOT datistemplate ...`
pub fn databases(params: &ParamMap) -> RestResult<Statement> {
    Ok(Catalog::Databases.statement(&SelectRequest::from_params(params)?))
}

/// `SELECT schema_name FROM information_schema.schemata ...`
pub fn schemas(params: &ParamMap) -> RestResult<Statement> {
    Ok(Catalog::Schemas.statement(&SelectRequest::from_params(params)?))
}

/// `SELECT schemaname, tablename FROM pg_catalog.pg_tables ...`
pub fn tables(params: &ParamMap) -> RestResult<Statement> {
    Ok(Catalog::Tables.statement(&SelectRequest::from_params(params)?))
}
