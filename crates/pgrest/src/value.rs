//! Dynamically typed bound values.
//!
//! Query-string values arrive as text and request bodies as JSON, while the
//! column types are only known to the server. [`Value`] carries whatever the
//! request supplied and converts it when tokio-postgres asks for the parameter
//! in the type Postgres inferred for the placeholder.

use crate::error::{RestError, RestResult};
use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use tokio_postgres::types::{IsNull, Kind, ToSql, Type, to_sql_checked};

type BoxError = Box<dyn Error + Sync + Send>;

/// A single bound parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Arrays and objects from a JSON request body.
    Json(serde_json::Value),
}

/// Column name → value for one inserted row or the new values of an update.
///
/// A `BTreeMap` so columns are always visited in sorted order.
pub type DataRecord = BTreeMap<String, Value>;

/// Build a [`DataRecord`] from a decoded JSON request body.
///
/// The body must be a JSON object. Keys are not validated here; the statement
/// builders validate every column before using it.
pub fn record_from_json(body: serde_json::Value) -> RestResult<DataRecord> {
    match body {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(k, v)| (k, Value::from(v)))
            .collect()),
        other => Err(RestError::Serialization(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The text form used when a value is bound to a text-like parameter.
    fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::Json(v) => v.to_string(),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => match n.as_f64() {
                    Some(f) => Self::Float(f),
                    // u64 beyond i64::MAX
                    None => Self::Text(n.to_string()),
                },
            },
            serde_json::Value::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i.into())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Self::Text(s) if s == other)
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
        // Domains use their base type's wire format.
        if let Kind::Domain(base) = ty.kind() {
            return self.to_sql(base, out);
        }
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(b) if *ty == Type::BOOL => b.to_sql(ty, out),
            Self::Int(i) => int_to_sql(*i, ty, out),
            Self::Float(f) => float_to_sql(*f, ty, out),
            Self::Text(s) => text_to_sql(s, ty, out),
            Self::Json(v) if is_json(ty) => v.to_sql(ty, out),
            other => text_to_sql(&other.to_text(), ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn is_json(ty: &Type) -> bool {
    *ty == Type::JSON || *ty == Type::JSONB
}

fn is_text_like(ty: &Type) -> bool {
    *ty == Type::TEXT
        || *ty == Type::VARCHAR
        || *ty == Type::BPCHAR
        || *ty == Type::NAME
        || *ty == Type::UNKNOWN
        || ty.name() == "citext"
        || matches!(ty.kind(), Kind::Enum(_))
}

fn int_to_sql(i: i64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if *ty == Type::INT2 {
        i16::try_from(i)?.to_sql(ty, out)
    } else if *ty == Type::INT4 {
        i32::try_from(i)?.to_sql(ty, out)
    } else if *ty == Type::INT8 {
        i.to_sql(ty, out)
    } else if *ty == Type::FLOAT4 {
        (i as f32).to_sql(ty, out)
    } else if *ty == Type::FLOAT8 {
        (i as f64).to_sql(ty, out)
    } else if *ty == Type::NUMERIC {
        Decimal::from(i).to_sql(ty, out)
    } else if is_json(ty) {
        serde_json::Value::from(i).to_sql(ty, out)
    } else {
        text_to_sql(&i.to_string(), ty, out)
    }
}

fn float_to_sql(f: f64, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if *ty == Type::FLOAT8 {
        f.to_sql(ty, out)
    } else if *ty == Type::FLOAT4 {
        (f as f32).to_sql(ty, out)
    } else if *ty == Type::NUMERIC {
        Decimal::try_from(f)?.to_sql(ty, out)
    } else if is_json(ty) {
        serde_json::Value::from(f).to_sql(ty, out)
    } else {
        text_to_sql(&f.to_string(), ty, out)
    }
}

/// Bind request text to the parameter type Postgres inferred.
fn text_to_sql(s: &str, ty: &Type, out: &mut BytesMut) -> Result<IsNull, BoxError> {
    if is_text_like(ty) {
        return s.to_sql(ty, out);
    }

    let t = s.trim();
    if *ty == Type::BOOL {
        parse_bool(t)?.to_sql(ty, out)
    } else if *ty == Type::INT2 {
        t.parse::<i16>()?.to_sql(ty, out)
    } else if *ty == Type::INT4 {
        t.parse::<i32>()?.to_sql(ty, out)
    } else if *ty == Type::INT8 {
        t.parse::<i64>()?.to_sql(ty, out)
    } else if *ty == Type::FLOAT4 {
        t.parse::<f32>()?.to_sql(ty, out)
    } else if *ty == Type::FLOAT8 {
        t.parse::<f64>()?.to_sql(ty, out)
    } else if *ty == Type::NUMERIC {
        Decimal::from_str(t)?.to_sql(ty, out)
    } else if is_json(ty) {
        // Bare words are compared as JSON strings.
        serde_json::from_str::<serde_json::Value>(s)
            .unwrap_or_else(|_| serde_json::Value::String(s.to_string()))
            .to_sql(ty, out)
    } else if *ty == Type::UUID {
        uuid::Uuid::parse_str(t)?.to_sql(ty, out)
    } else if *ty == Type::DATE {
        NaiveDate::from_str(t)?.to_sql(ty, out)
    } else if *ty == Type::TIME {
        NaiveTime::from_str(t)?.to_sql(ty, out)
    } else if *ty == Type::TIMESTAMP {
        parse_timestamp(t)?.to_sql(ty, out)
    } else if *ty == Type::TIMESTAMPTZ {
        DateTime::parse_from_rfc3339(t)?.to_sql(ty, out)
    } else {
        Err(format!("cannot bind text value to parameter of type {ty}").into())
    }
}

fn parse_bool(s: &str) -> Result<bool, BoxError> {
    match s.to_ascii_lowercase().as_str() {
        "t" | "true" | "y" | "yes" | "on" | "1" => Ok(true),
        "f" | "false" | "n" | "no" | "off" | "0" => Ok(false),
        _ => Err(format!("invalid boolean value: {s}").into()),
    }
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, BoxError> {
    match NaiveDateTime::from_str(s) {
        Ok(ts) => Ok(ts),
        Err(_) => Ok(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")?),
    }
}
