//! Request-level operations over one client.
//!
//! [`TableService`] is what an HTTP handler calls: it turns a table address,
//! request parameters and an optional JSON body into a statement, runs it and
//! returns the JSON document to send back.

use crate::catalog::Catalog;
use crate::client::GenericClient;
use crate::config::RestConfig;
use crate::error::RestResult;
use crate::executor::Executor;
use crate::ident::TableRef;
use crate::params::ParamMap;
use crate::statement::{self, SelectRequest};
use crate::value::record_from_json;

/// Table and catalog operations bound to a client and configuration.
pub struct TableService<'a, C: GenericClient> {
    client: &'a C,
    config: &'a RestConfig,
}

impl<'a, C: GenericClient> TableService<'a, C> {
    pub fn new(client: &'a C, config: &'a RestConfig) -> Self {
        Self { client, config }
    }

    fn executor(&self, tag: &str) -> Executor<'a, C> {
        Executor::new(self.client).with_config(self.config).with_tag(tag)
    }

    fn select_request(&self, params: &ParamMap) -> RestResult<SelectRequest> {
        Ok(SelectRequest::from_params(params)?.clamp_page(self.config.max_page_size))
    }

    /// `GET /{database}/{schema}/{table}?...`
    pub async fn select(&self, table: &TableRef, params: &ParamMap) -> RestResult<serde_json::Value> {
        let stmt = self.select_request(params)?.build(table);
        self.executor(table.database().as_str()).fetch_json(&stmt).await
    }

    /// `POST /{database}/{schema}/{table}` with a JSON object body.
    ///
    /// Returns the inserted row(s).
    pub async fn insert(&self, table: &TableRef, body: serde_json::Value) -> RestResult<serde_json::Value> {
        let record = record_from_json(body)?;
        let stmt = statement::insert(table, &record)?.returning_all();
        self.executor(table.database().as_str()).fetch_json(&stmt).await
    }

    /// `PATCH /{database}/{schema}/{table}?...` with a JSON object body.
    ///
    /// Returns the updated rows.
    pub async fn update(
        &self,
        table: &TableRef,
        params: &ParamMap,
        body: serde_json::Value,
    ) -> RestResult<serde_json::Value> {
        let record = record_from_json(body)?;
        let stmt = statement::update_by_request(table, &record, params)?.returning_all();
        self.executor(table.database().as_str()).fetch_json(&stmt).await
    }

    /// `DELETE /{database}/{schema}/{table}?...`
    ///
    /// Returns `{"rows_affected": n}`.
    pub async fn delete(&self, table: &TableRef, params: &ParamMap) -> RestResult<serde_json::Value> {
        let stmt = statement::delete_by_request(table, params)?;
        self.executor(table.database().as_str()).run(&stmt).await
    }

    /// `GET /databases?...`, `GET /schemas?...`, `GET /tables?...`
    pub async fn catalog(&self, catalog: Catalog, params: &ParamMap) -> RestResult<serde_json::Value> {
        let stmt = catalog.statement(&self.select_request(params)?);
        self.executor(catalog.as_str()).fetch_json(&stmt).await
    }
}
