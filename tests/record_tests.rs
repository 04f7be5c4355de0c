//! Record Tests
//!
//! Tests for field values and number normalization:
//! - Integers stay integers
//! - Other numbers become exact decimals and keep their digits
//! - Non-numeric values pass through untouched

use std::str::FromStr;

use recordhub::record::{Record, Scalar};
use rust_decimal::Decimal;
use serde_json::json;

// =============================================================================
// Number Tests
// =============================================================================

#[test]
fn test_integers_stay_integers() {
    let record: Record = serde_json::from_value(json!({"id": "X1", "val": 5})).unwrap();

    assert_eq!(record.get("val"), Some(&Scalar::Integer(5)));
    assert_eq!(serde_json::to_value(&record).unwrap(), json!({"id": "X1", "val": 5}));
}

#[test]
fn test_fractions_become_exact_decimals() {
    let record: Record = serde_json::from_value(json!({"id": "X1", "price": 0.1})).unwrap();

    assert_eq!(
        record.get("price"),
        Some(&Scalar::Decimal(Decimal::from_str("0.1").unwrap()))
    );
    assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"id":"X1","price":0.1}"#);
}

#[test]
fn test_decimal_digits_survive_encoding() {
    let text = r#"{"id":"X1","rate":0.1234567890123456789012345678}"#;
    let record: Record = serde_json::from_str(text).unwrap();

    assert_eq!(serde_json::to_string(&record).unwrap(), text);
}

#[test]
fn test_integers_beyond_i64_are_exact() {
    let text = r#"{"big":18446744073709551615,"id":"X1","neg":-9223372036854775809}"#;
    let record: Record = serde_json::from_str(text).unwrap();

    assert_eq!(record.get("big"), Some(&Scalar::Decimal(Decimal::from(u64::MAX))));
    assert_eq!(serde_json::to_string(&record).unwrap(), text);
}

#[test]
fn test_trailing_zeros_normalized() {
    let record: Record = serde_json::from_str(r#"{"a":5.0,"b":1.50,"id":"X1"}"#).unwrap();

    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"a":5,"b":1.5,"id":"X1"}"#
    );
}

#[test]
fn test_numbers_out_of_decimal_range_kept_verbatim() {
    let text = r#"{"huge":1e400,"id":"X1"}"#;
    let record: Record = serde_json::from_str(text).unwrap();

    assert!(matches!(record.get("huge"), Some(Scalar::Other(_))));
    assert_eq!(serde_json::to_string(&record).unwrap(), text);
}

// =============================================================================
// Field Tests
// =============================================================================

#[test]
fn test_non_numeric_values_pass_through() {
    let value = json!({"id": "X1", "ok": true, "tags": ["a", "b"], "none": null});
    let record: Record = serde_json::from_value(value.clone()).unwrap();

    assert_eq!(serde_json::to_value(&record).unwrap(), value);
}

#[test]
fn test_id_must_be_a_string() {
    let record: Record = serde_json::from_value(json!({"id": 7})).unwrap();
    assert_eq!(record.id(), None);

    let record: Record = [("id", "abc")].into_iter().collect();
    assert_eq!(record.id(), Some("abc"));
}
