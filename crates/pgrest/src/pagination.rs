//! LIMIT/OFFSET construction from `_page` and `_page_size`.

use crate::error::{RestError, RestResult};
use crate::params::{PAGE_KEY, PAGE_SIZE_KEY, ParamMap};

/// LIMIT and OFFSET are `bigint` on the server.
const MAX_BIGINT: u64 = i64::MAX as u64;

/// A requested page: 1-based `page` of `page_size` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub page_size: u64,
}

impl Page {
    /// Build a page, rejecting zero values and pages whose LIMIT or OFFSET
    /// would not fit a Postgres `bigint`.
    pub fn new(page: u64, page_size: u64) -> RestResult<Self> {
        if page == 0 || page > MAX_BIGINT {
            return Err(RestError::invalid_pagination(format!(
                "_page must be between 1 and {MAX_BIGINT}"
            )));
        }
        if page_size == 0 || page_size > MAX_BIGINT {
            return Err(RestError::invalid_pagination(format!(
                "_page_size must be between 1 and {MAX_BIGINT}"
            )));
        }
        match (page - 1).checked_mul(page_size) {
            Some(offset) if offset <= MAX_BIGINT => Ok(Self { page, page_size }),
            _ => Err(RestError::invalid_pagination(format!(
                "offset of page {page} with size {page_size} is out of range"
            ))),
        }
    }

    /// Read `_page` and `_page_size`.
    ///
    /// Returns `Ok(None)` unless both are present.
    pub fn from_params(params: &ParamMap) -> RestResult<Option<Self>> {
        let (Some(page), Some(page_size)) = (params.first(PAGE_KEY), params.first(PAGE_SIZE_KEY))
        else {
            return Ok(None);
        };
        let page = parse_positive(PAGE_KEY, page)?;
        let page_size = parse_positive(PAGE_SIZE_KEY, page_size)?;
        Self::new(page, page_size).map(Some)
    }

    /// Cap `page_size` at `max`.
    pub fn clamp(self, max: u64) -> Self {
        Self {
            page: self.page,
            page_size: self.page_size.min(max.max(1)),
        }
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Rows skipped before this page (saturating).
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// `LIMIT <size> OFFSET(<page> - 1) * <size>`
    ///
    /// The offset is left for the server to compute.
    pub fn to_sql(&self) -> String {
        format!(
            "LIMIT {size} OFFSET({page} - 1) * {size}",
            size = self.page_size,
            page = self.page
        )
    }
}

fn parse_positive(key: &str, raw: &str) -> RestResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(RestError::invalid_pagination(format!(
            "{key} must be a positive integer, got '{raw}'"
        ))),
    }
}

/// Build a pagination fragment if the request asks for one.
///
/// Returns an empty string when `_page` or `_page_size` is missing. No upper
/// bound is applied to the page size here.
pub fn paginate_if_possible(params: &ParamMap) -> RestResult<String> {
    Ok(Page::from_params(params)?
        .map(|p| p.to_sql())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page() {
        let params = ParamMap::parse("dbname=prest&test=cool&_page=1&_page_size=20");
        let sql = paginate_if_possible(&params).unwrap();
        assert_eq!(sql, "LIMIT 20 OFFSET(1 - 1) * 20");
    }

    #[test]
    fn later_page() {
        let params = ParamMap::parse("_page=3&_page_size=10");
        assert_eq!(
            paginate_if_possible(&params).unwrap(),
            "LIMIT 10 OFFSET(3 - 1) * 10"
        );
        let page = Page::from_params(&params).unwrap().unwrap();
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn missing_either_key_is_no_pagination() {
        for q in ["", "_page=2", "_page_size=5", "name=x"] {
            let params = ParamMap::parse(q);
            assert_eq!(paginate_if_possible(&params).unwrap(), "", "{q}");
        }
    }

    #[test]
    fn rejects_non_numeric() {
        let params = ParamMap::parse("_page=one&_page_size=20");
        let err = paginate_if_possible(&params).unwrap_err();
        assert!(matches!(err, RestError::InvalidPagination(_)));
    }

    #[test]
    fn rejects_zero_and_negative() {
        for q in ["_page=0&_page_size=20", "_page=1&_page_size=0", "_page=-1&_page_size=20"] {
            let params = ParamMap::parse(q);
            assert!(
                matches!(
                    paginate_if_possible(&params),
                    Err(RestError::InvalidPagination(_))
                ),
                "{q}"
            );
        }
    }

    #[test]
    fn rejects_sql_in_page_size() {
        let params = ParamMap::parse("_page=1&_page_size=20%3B%20DROP%20TABLE%20t");
        assert!(paginate_if_possible(&params).is_err());
    }

    #[test]
    fn no_upper_bound_without_clamp() {
        let params = ParamMap::parse("_page=1&_page_size=1000000");
        assert_eq!(
            paginate_if_possible(&params).unwrap(),
            "LIMIT 1000000 OFFSET(1 - 1) * 1000000"
        );
    }

    #[test]
    fn clamp_caps_page_size() {
        let page = Page::new(2, 500).unwrap().clamp(100);
        assert_eq!(page.to_sql(), "LIMIT 100 OFFSET(2 - 1) * 100");
        assert_eq!(Page::new(1, 5).unwrap().clamp(100).page_size, 5);
    }

    #[test]
    fn idempotent() {
        let params = ParamMap::parse("_page=4&_page_size=7");
        assert_eq!(
            paginate_if_possible(&params).unwrap(),
            paginate_if_possible(&params).unwrap()
        );
    }

    #[test]
    fn rejects_values_beyond_bigint() {
        for q in [
            "_page=1&_page_size=18446744073709551615",
            "_page=1&_page_size=9223372036854775808",
            "_page=9223372036854775808&_page_size=1",
            "_page=3&_page_size=9223372036854775807",
            "_page=4294967296&_page_size=4294967296",
        ] {
            let params = ParamMap::parse(q);
            assert!(
                matches!(
                    paginate_if_possible(&params),
                    Err(RestError::InvalidPagination(_))
                ),
                "{q}"
            );
        }
    }

    #[test]
    fn accepts_bigint_edges() {
        let params = ParamMap::parse("_page=1&_page_size=9223372036854775807");
        assert_eq!(
            paginate_if_possible(&params).unwrap(),
            "LIMIT 9223372036854775807 OFFSET(1 - 1) * 9223372036854775807"
        );
        let page = Page::new(9_223_372_036_854_775_807, 1).unwrap();
        assert_eq!(page.offset(), 9_223_372_036_854_775_806);
    }
}
