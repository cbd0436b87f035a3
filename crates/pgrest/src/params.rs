//! Request parameter map.

use std::collections::BTreeMap;

/// Parameter name for the 1-based page number.
pub const PAGE_KEY: &str = "_page";
/// Parameter name for the page size.
pub const PAGE_SIZE_KEY: &str = "_page_size";
/// Parameter name for the column list of a SELECT.
pub const SELECT_KEY: &str = "_select";
/// Parameter name for the ORDER BY list of a SELECT.
pub const ORDER_KEY: &str = "_order";
/// Keys starting with this prefix are control parameters, never filters.
pub const RESERVED_PREFIX: &str = "_";

/// Parsed query-string or form parameters.
///
/// Keys are attacker-controlled and are never used as identifiers without
/// validation. Keys iterate in sorted order; repeated keys keep their values
/// in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `application/x-www-form-urlencoded` text (a query string without
    /// the leading `?`, or a form body).
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Build from already decoded `(key, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (k, v) in pairs {
            map.append(k, v);
        }
        map
    }

    /// Add one value for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.entry(key.into()).or_default().push(value.into());
        self
    }

    /// All values for `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// First value for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, values)` in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Iterate only the keys that are filter candidates.
    pub fn filters(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.iter().filter(|(k, _)| !is_reserved(k))
    }
}

/// Whether `key` is a control parameter (`_page`, `_page_size`, `_select`, ...).
pub fn is_reserved(key: &str) -> bool {
    key.starts_with(RESERVED_PREFIX)
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
