use super::*;
use crate::error::RestError;

fn text(values: &[&str]) -> Vec<Value> {
    values.iter().map(|v| Value::from(*v)).collect()
}

#[test]
fn test_two_plain_filters() {
    let params = ParamMap::parse("dbname=prest&test=cool");
    let clause = where_by_request(&params, 1).unwrap();
    assert_eq!(clause.sql(), "dbname=$1 AND test=$2");
    assert_eq!(clause.values(), text(&["prest", "cool"]).as_slice());
    assert_eq!(clause.next_placeholder(), 3);
}

#[test]
fn test_jsonb_field_with_plain_field() {
    let params = ParamMap::parse("name=nuveo&data->>description:jsonb=bla");
    let clause = where_by_request(&params, 1).unwrap();
    assert!(clause.sql().contains("data->>'description'=$"));
    assert!(clause.sql().contains("name=$"));
    assert!(clause.sql().contains(" AND "));
    // "data->>..." sorts before "name"
    assert_eq!(clause.sql(), "data->>'description'=$1 AND name=$2");
    assert_eq!(clause.values(), text(&["bla", "nuveo"]).as_slice());
}

#[test]
fn test_offset_continues_numbering() {
    let params = ParamMap::parse("name=prest");
    let clause = where_by_request(&params, 2).unwrap();
    assert_eq!(clause.sql(), "name=$2");
    assert_eq!(clause.next_placeholder(), 3);
}

#[test]
fn test_reserved_keys_are_skipped() {
    let params = ParamMap::parse("_page=1&_page_size=20&_select=name&_order=-id");
    let clause = where_by_request(&params, 1).unwrap();
    assert!(clause.is_empty());
    assert!(clause.values().is_empty());
    assert_eq!(clause.next_placeholder(), 1);
}

#[test]
fn test_empty_params() {
    let clause = where_by_request(&ParamMap::new(), 5).unwrap();
    assert_eq!(clause.sql(), "");
    assert!(clause.values().is_empty());
    assert_eq!(clause.next_placeholder(), 5);
}

#[test]
fn test_repeated_key_is_and_not_in() {
    let params = ParamMap::parse("tag=a&tag=b");
    let clause = where_by_request(&params, 1).unwrap();
    assert_eq!(clause.sql(), "tag=$1 AND tag=$2");
    assert_eq!(clause.values(), text(&["a", "b"]).as_slice());
}

#[test]
fn test_values_never_reach_sql_text() {
    let params = ParamMap::parse("name=x%27%20OR%201%3D1%20--");
    let clause = where_by_request(&params, 1).unwrap();
    assert_eq!(clause.sql(), "name=$1");
    assert_eq!(clause.values(), text(&["x' OR 1=1 --"]).as_slice());
}

#[test]
fn test_unsafe_key_fails_whole_build() {
    let params = ParamMap::parse("name=ok&na%3Bme=bad");
    let err = where_by_request(&params, 1).unwrap_err();
    assert!(matches!(err, RestError::InvalidIdentifier(ref s) if s == "na;me"));
}

#[test]
fn test_malformed_json_key() {
    let params = ParamMap::parse("data:jsonb=x");
    let err = where_by_request(&params, 1).unwrap_err();
    assert!(matches!(err, RestError::MalformedFilterKey(_)));
}

#[test]
fn test_idempotent() {
    let params = ParamMap::parse("b=2&a=1&data->tags=x&a=0");
    let first = where_by_request(&params, 1).unwrap();
    let second = where_by_request(&params, 1).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.sql(), "a=$1 AND a=$2 AND b=$3 AND data->'tags'=$4");
}

#[test]
fn test_raw_clause() {
    let clause = WhereClause::raw("name=$2", text(&["prest"]), 2);
    assert_eq!(clause.sql(), "name=$2");
    assert_eq!(clause.next_placeholder(), 3);
    let (sql, values) = clause.into_parts();
    assert_eq!(sql, "name=$2");
    assert_eq!(values, text(&["prest"]));
}

#[test]
fn test_raw_clause_next_placeholder_follows_offset() {
    let clause = WhereClause::raw("a=$4 AND b=$5", text(&["x", "y"]), 4);
    assert_eq!(clause.next_placeholder(), 6);

    let clause = WhereClause::raw("a=$1", text(&["x"]), 0);
    assert_eq!(clause.next_placeholder(), 2);

    let clause = WhereClause::raw("", Vec::new(), 1);
    assert!(clause.is_empty());
    assert_eq!(clause.next_placeholder(), 1);
}

#[test]
fn test_offset_past_parameter_limit_is_error() {
    let params = ParamMap::parse("a=1&b=2");
    for offset in [usize::MAX, 65_535] {
        let err = where_by_request(&params, offset).unwrap_err();
        assert!(matches!(err, RestError::TooManyParameters(_)), "{offset}");
    }
    let clause = where_by_request(&params, 65_534).unwrap();
    assert_eq!(clause.sql(), "a=$65534 AND b=$65535");
}
