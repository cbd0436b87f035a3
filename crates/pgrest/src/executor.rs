//! Statement execution.
//!
//! [`Executor`] runs [`Statement`]s on any [`GenericClient`], applies the
//! configured timeout and turns results into JSON documents. Rows are
//! rendered by the server (`json_agg`), so no per-column decoding happens
//! here.

use crate::client::GenericClient;
use crate::config::RestConfig;
use crate::error::{RestError, RestResult};
use crate::statement::Statement;
use std::time::{Duration, Instant};

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// Runs statements on a borrowed client.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub struct Executor<'a, C: GenericClient> {
    client: &'a C,
    query_timeout: Option<Duration>,
    slow_query_threshold: Option<Duration>,
    log_sql_max_length: Option<usize>,
    tag: Option<String>,
}

impl<'a, C: GenericClient> Executor<'a, C> {
    /// Create an executor with no timeout.
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            query_timeout: None,
            slow_query_threshold: None,
            log_sql_max_length: Some(200),
            tag: None,
        }
    }

    /// Take timeout, slow-query and logging settings from `config`.
    pub fn with_config(mut self, config: &RestConfig) -> Self {
        self.query_timeout = config.query_timeout;
        self.slow_query_threshold = config.slow_query_threshold;
        self.log_sql_max_length = config.log_sql_max_length;
        self
    }

    /// Set the query timeout.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Attach a tag (e.g. the route or database name) to log events.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Run a statement and return the number of affected rows.
    pub async fn execute(&self, stmt: &Statement) -> RestResult<u64> {
        let params = stmt.params_ref();
        self.timed(stmt.sql(), params.len(), self.client.execute(stmt.sql(), &params))
            .await
    }

    /// Run a statement and return its rows as a JSON array.
    ///
    /// Fails for writes without `RETURNING`; use [`Executor::run`] when the
    /// statement kind is not known up front.
    pub async fn fetch_json(&self, stmt: &Statement) -> RestResult<serde_json::Value> {
        let Some(sql) = stmt.to_json_sql() else {
            return Err(RestError::Serialization(format!(
                "{} without RETURNING yields no rows",
                stmt.kind().as_str()
            )));
        };
        let params = stmt.params_ref();
        let row = self
            .timed(&sql, params.len(), self.client.query_opt(&sql, &params))
            .await?;

        let Some(row) = row else {
            return Ok(serde_json::Value::Array(Vec::new()));
        };
        let doc: Option<serde_json::Value> = row
            .try_get(0)
            .map_err(|e| RestError::Serialization(e.to_string()))?;
        Ok(doc.unwrap_or_else(|| serde_json::Value::Array(Vec::new())))
    }

    /// Run a statement and describe the outcome as JSON.
    ///
    /// Row-returning statements yield `[...]`; other writes yield
    /// `{"rows_affected": n}`.
    pub async fn run(&self, stmt: &Statement) -> RestResult<serde_json::Value> {
        if stmt.returns_rows() {
            self.fetch_json(stmt).await
        } else {
            let n = self.execute(stmt).await?;
            Ok(serde_json::json!({ "rows_affected": n }))
        }
    }

    async fn timed<T, F>(&self, sql: &str, param_count: usize, future: F) -> RestResult<T>
    where
        F: std::future::Future<Output = RestResult<T>> + Send,
    {
        self.log_before(sql, param_count);
        let start = Instant::now();
        let result = self.execute_with_timeout(future).await;
        self.log_after(sql, start.elapsed(), result.as_ref().err());
        result
    }

    async fn execute_with_timeout<T, F>(&self, future: F) -> RestResult<T>
    where
        F: std::future::Future<Output = RestResult<T>> + Send,
    {
        match self.query_timeout {
            Some(timeout) => {
                tokio::pin!(future);
                tokio::select! {
                    result = &mut future => result,
                    _ = tokio::time::sleep(timeout) => {
                        if let Some(cancel_token) = self.client.cancel_token() {
                            tokio::spawn(async move {
                                let _ = cancel_token.cancel_query(tokio_postgres::NoTls).await;
                            });
                        }
                        Err(RestError::Timeout(timeout))
                    }
                }
            }
            None => future.await,
        }
    }

    #[cfg(feature = "tracing")]
    fn display_sql<'s>(&self, sql: &'s str) -> std::borrow::Cow<'s, str> {
        match self.log_sql_max_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)).into(),
            _ => sql.into(),
        }
    }

    #[cfg(feature = "tracing")]
    fn log_before(&self, sql: &str, param_count: usize) {
        let tag = self.tag.as_deref().unwrap_or("-");
        tracing::debug!(
            target: "pgrest.sql",
            tag,
            param_count,
            sql = %self.display_sql(sql),
            "executing statement"
        );
    }

    #[cfg(not(feature = "tracing"))]
    fn log_before(&self, _sql: &str, _param_count: usize) {}

    #[cfg(feature = "tracing")]
    fn log_after(&self, sql: &str, elapsed: Duration, error: Option<&RestError>) {
        let tag = self.tag.as_deref().unwrap_or("-");
        if let Some(err) = error {
            tracing::warn!(
                target: "pgrest.sql",
                tag,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %err,
                sql = %self.display_sql(sql),
                "statement failed"
            );
            return;
        }
        match self.slow_query_threshold {
            Some(threshold) if elapsed > threshold => tracing::warn!(
                target: "pgrest.sql",
                tag,
                elapsed_ms = elapsed.as_millis() as u64,
                threshold_ms = threshold.as_millis() as u64,
                sql = %self.display_sql(sql),
                "slow query"
            ),
            _ => tracing::debug!(
                target: "pgrest.sql",
                tag,
                elapsed_ms = elapsed.as_millis() as u64,
                "statement completed"
            ),
        }
    }

    #[cfg(not(feature = "tracing"))]
    fn log_after(&self, _sql: &str, _elapsed: Duration, _error: Option<&RestError>) {}
}
