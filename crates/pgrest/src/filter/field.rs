//! Filter key parsing.

use crate::error::{RestError, RestResult};
use crate::ident::Ident;

/// JSON operator used to reach into a json/jsonb column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonOp {
    /// `->` (yields the column's own type). Equality on the result only
    /// exists for `jsonb`; Postgres has no `=` operator for `json`.
    Arrow,
    /// `->>` (yields text)
    LongArrow,
}

impl JsonOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arrow => "->",
            Self::LongArrow => "->>",
        }
    }
}

/// Type annotation after `:` in a filter key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Json,
    Jsonb,
}

/// A JSON path step: `column->>'path'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    pub op: JsonOp,
    pub path: Ident,
}

/// A parameter key decomposed into column, optional JSON path and optional
/// type annotation. Every identifier in it has been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub column: Ident,
    pub json: Option<JsonPath>,
    pub field_type: Option<FieldType>,
}

impl FieldSpec {
    /// Parse a filter key such as `name`, `data->>description:jsonb` or
    /// `data->'tags'`.
    ///
    /// Keys that use JSON-path syntax but cannot be split into a column and a
    /// path fail with [`RestError::MalformedFilterKey`]; keys whose parts are
    /// unsafe fail with [`RestError::InvalidIdentifier`].
    ///
    /// `col->path` compares a JSON value, which only works when `col` is
    /// `jsonb`: on a `json` column the server rejects the query because `json`
    /// has no equality operator. Use `col->>path` there to compare as text.
    /// The `:json`/`:jsonb` annotation is parsed but does not change the SQL.
    pub fn parse(key: &str) -> RestResult<Self> {
        let (body, field_type) = match key.split_once(':') {
            Some((body, annotation)) => (body, Some(parse_annotation(key, annotation)?)),
            None => (key, None),
        };

        let split = body
            .split_once("->>")
            .map(|(c, p)| (c, JsonOp::LongArrow, p))
            .or_else(|| body.split_once("->").map(|(c, p)| (c, JsonOp::Arrow, p)));

        let Some((column, op, path)) = split else {
            if field_type.is_some() {
                // A type annotation only makes sense on a JSON path.
                return Err(RestError::malformed_filter_key(key));
            }
            return Ok(Self {
                column: Ident::new(body)?,
                json: None,
                field_type: None,
            });
        };

        let path = strip_quotes(path);
        if column.is_empty() || path.is_empty() || column.contains("->") || path.contains("->") {
            return Err(RestError::malformed_filter_key(key));
        }

        Ok(Self {
            column: Ident::new(column)?,
            json: Some(JsonPath {
                op,
                path: Ident::new(path)?,
            }),
            field_type,
        })
    }

    /// Append the left-hand side of the comparison to `out`.
    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push_str(self.column.as_str());
        if let Some(json) = &self.json {
            out.push_str(json.op.as_str());
            out.push('\'');
            out.push_str(json.path.as_str());
            out.push('\'');
        }
    }
}

fn parse_annotation(key: &str, annotation: &str) -> RestResult<FieldType> {
    match annotation {
        "jsonb" => Ok(FieldType::Jsonb),
        "json" => Ok(FieldType::Json),
        _ => Err(RestError::malformed_filter_key(key)),
    }
}

/// `'description'` → `description`; anything else is returned as is.
fn strip_quotes(path: &str) -> &str {
    path.strip_prefix('\'')
        .and_then(|p| p.strip_suffix('\''))
        .unwrap_or(path)
}
