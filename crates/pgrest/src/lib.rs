//! # pgrest
//!
//! Turns untrusted HTTP request parameters into parameterized PostgreSQL
//! statements, and runs them returning JSON documents.
//!
//! ## Guarantees
//!
//! - **No value interpolation**: request values only ever travel as `$N`
//!   parameters alongside the SQL text
//! - **Validated identifiers**: table, schema, column and JSON-path names must
//!   pass [`is_valid_identifier`] and are carried as [`Ident`]
//! - **Deterministic output**: parameters are visited in sorted order, so the
//!   same request always produces the same statement
//! - **Safe defaults**: UPDATE and DELETE require a WHERE clause
//!
//! ## Building statements
//!
//! ```ignore
//! use pgrest::{ParamMap, TableRef, statement, where_by_request, paginate_if_possible};
//!
//! let params = ParamMap::parse("name=nuveo&data->>description:jsonb=bla&_page=1&_page_size=20");
//!
//! let clause = where_by_request(&params, 1)?;
//! assert_eq!(clause.sql(), "data->>'description'=$1 AND name=$2");
//! assert_eq!(paginate_if_possible(&params)?, "LIMIT 20 OFFSET(1 - 1) * 20");
//!
//! let table = TableRef::new("prest", "public", "test")?;
//! let stmt = statement::select_by_request(&table, &params)?;
//! ```
//!
//! ## Running them
//!
//! ```ignore
//! use pgrest::{RestConfig, TableService, create_pool};
//!
//! let config = RestConfig::from_env()?;
//! let pool = create_pool(&config)?;
//! let client = pool.get().await?;
//!
//! let rows = TableService::new(&client, &config).select(&table, &params).await?;
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod filter;
pub mod ident;
pub mod pagination;
pub mod params;
mod placeholder;
pub mod service;
pub mod statement;
pub mod value;

pub use catalog::Catalog;
pub use client::GenericClient;
pub use config::RestConfig;
pub use error::{RestError, RestResult};
pub use executor::Executor;
pub use filter::{FieldSpec, WhereClause, where_by_request};
pub use ident::{Ident, IntoIdent, TableRef, is_invalid_identifier, is_valid_identifier};
pub use pagination::{Page, paginate_if_possible};
pub use params::ParamMap;
pub use service::TableService;
pub use statement::{Statement, StatementKind};
pub use value::{DataRecord, Value, record_from_json};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::create_pool;
