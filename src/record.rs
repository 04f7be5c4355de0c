//! Record definitions
//!
//! A record is a flat mapping of field names to scalar values, keyed by its
//! `id` field.
//!
//! ## Numeric values
//! Numbers never travel through binary floating point on their way to the
//! store. JSON numbers are kept as their literal text while parsing, so when
//! a record is decoded, integers that fit in an `i64` are kept as integers
//! and every other number is parsed from that text into an exact
//! [`Decimal`]. When encoded again the decimal's own digits are written back
//! as a JSON number, so `5` stays `5`, `0.1` stays `0.1` and
//! `18446744073709551615` is not rounded.
//!
//! Numbers a [`Decimal`] cannot hold (more than 96 bits of mantissa, or
//! exponents out of range) are stored as the literal JSON number.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use uuid::Uuid;

/// Name of the primary key field
pub const ID_FIELD: &str = "id";

/// Name of the field carrying the audit entry id in responses
pub const LOG_ID_FIELD: &str = "log_id";

/// A single field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Decimal(Decimal),

    /// Anything else (booleans, null, nested values) is stored untouched
    Other(Value),
}

impl Scalar {
    /// The text value, if this is a string field
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Value> for Scalar {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => Scalar::Text(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Scalar::Integer(i),
                None => match parse_decimal(&n.to_string()) {
                    Some(d) => Scalar::Decimal(d),
                    None => Scalar::Other(Value::Number(n)),
                },
            },
            other => Scalar::Other(other),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => Value::String(s),
            Scalar::Integer(i) => Value::from(i),
            Scalar::Decimal(d) => decimal_to_json(d),
            Scalar::Other(v) => v,
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<Decimal> for Scalar {
    fn from(d: Decimal) -> Self {
        Scalar::Decimal(d)
    }
}

/// Exact parse only; text that would need rounding is rejected
fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str_exact(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn decimal_to_json(d: Decimal) -> Value {
    let d = d.normalize();
    let text = d.to_string();
    if d.scale() == 0 {
        if let Ok(i) = text.parse::<i64>() {
            return Value::from(i);
        }
    }
    match Number::from_str(&text) {
        Ok(n) => Value::Number(n),
        Err(_) => Value::String(text),
    }
}

/// A stored record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Scalar>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// The primary key, if the record has a string `id`
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Scalar::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Scalar> {
        self.0.get(field)
    }

    /// Insert a field, returning the previous value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Scalar>) -> Option<Scalar> {
        self.0.insert(field.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Scalar> {
        self.0.iter()
    }

    /// Copy of this record carrying the `log_id` of the audit entry that
    /// recorded the operation
    pub fn with_log_id(mut self, log_id: Uuid) -> Self {
        self.insert(LOG_ID_FIELD, log_id.to_string());
        self
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
