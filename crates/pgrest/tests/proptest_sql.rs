//! Property-based tests for identifier validation and filter building.

use pgrest::{ParamMap, Value, is_invalid_identifier, is_valid_identifier, where_by_request};
use proptest::prelude::*;

proptest! {
    /// Everything matching the accepted shape passes.
    #[test]
    fn valid_identifiers_always_pass(s in "[A-Za-z_][A-Za-z0-9_.]{0,62}") {
        prop_assert!(is_valid_identifier(&s), "should pass: {}", s);
        prop_assert!(!is_invalid_identifier(&s));
    }

    /// Leading digits are rejected.
    #[test]
    fn numeric_start_always_fails(prefix in "[0-9]+", suffix in "[A-Za-z0-9_]{0,20}") {
        let ident = format!("{prefix}{suffix}");
        prop_assert!(is_invalid_identifier(&ident), "should fail: {}", ident);
    }

    /// Any quote, semicolon or other metacharacter is rejected wherever it appears.
    #[test]
    fn special_chars_fail(
        prefix in "[A-Za-z_][A-Za-z0-9_]{0,10}",
        special in r#"['";\-\s()=*/\\,<>!@#%^&+|`~:]"#,
        suffix in "[A-Za-z0-9_]{0,10}"
    ) {
        let ident = format!("{prefix}{special}{suffix}");
        prop_assert!(is_invalid_identifier(&ident), "should fail: {:?}", ident);
    }

    /// Over 63 bytes is rejected even when every character is allowed.
    #[test]
    fn long_identifiers_fail(s in "[A-Za-z_][A-Za-z0-9_]{63,100}") {
        prop_assert!(is_invalid_identifier(&s), "{} chars should fail", s.len());
    }

    /// Agrees with the reference pattern on arbitrary input.
    #[test]
    fn matches_reference_pattern(s in "\\PC{0,70}") {
        let expected = !s.is_empty()
            && s.len() <= 63
            && s.chars().next().is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
            && s.chars().all(|c| c == '_' || c == '.' || c.is_ascii_alphanumeric());
        prop_assert_eq!(is_valid_identifier(&s), expected);
    }

    /// Values never show up in the clause text and are bound in order.
    #[test]
    fn values_only_travel_as_parameters(
        entries in prop::collection::btree_map("[a-z][a-z0-9_]{0,8}", "[^&=]{1,12}", 1..6)
    ) {
        let params = ParamMap::from_pairs(entries.clone());
        let clause = where_by_request(&params, 1).unwrap();

        let expected: Vec<Value> = entries.values().map(|v| Value::from(v.as_str())).collect();
        prop_assert_eq!(clause.values(), expected.as_slice());
        for (i, key) in entries.keys().enumerate() {
            let fragment = format!("{}=${}", key, i + 1);
            prop_assert!(clause.sql().contains(&fragment));
        }
        prop_assert_eq!(clause.next_placeholder(), entries.len() + 1);
    }

    /// Identical input gives byte-identical output.
    #[test]
    fn filter_is_deterministic(
        entries in prop::collection::vec(("[a-z]{1,6}", "[a-z0-9]{0,6}"), 0..8),
        offset in 1usize..20
    ) {
        let params = ParamMap::from_pairs(entries);
        let a = where_by_request(&params, offset).unwrap();
        let b = where_by_request(&params, offset).unwrap();
        prop_assert_eq!(a, b);
    }
}
