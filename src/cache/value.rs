//! Cache Value Module
//!
//! The opaque values callers store. Equality is structural, which is what
//! compare-and-swap compares against; floats compare by bit pattern.

use serde::{Deserialize, Serialize};

// == Cache Value ==
/// A value held in the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CacheValue {
    /// 64-bit signed integer, the only type `increment` accepts
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    /// Arbitrary structured document
    Json(serde_json::Value),
}

impl PartialEq for CacheValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CacheValue::Integer(a), CacheValue::Integer(b)) => a == b,
            // NaN equals itself and 0.0 differs from -0.0
            (CacheValue::Float(a), CacheValue::Float(b)) => a.to_bits() == b.to_bits(),
            (CacheValue::Bool(a), CacheValue::Bool(b)) => a == b,
            (CacheValue::Text(a), CacheValue::Text(b)) => a == b,
            (CacheValue::Bytes(a), CacheValue::Bytes(b)) => a == b,
            (CacheValue::Json(a), CacheValue::Json(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CacheValue {}

impl CacheValue {
    /// Returns the integer payload, or None for any non-integral value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CacheValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            CacheValue::Integer(_) => "integer",
            CacheValue::Float(_) => "float",
            CacheValue::Bool(_) => "bool",
            CacheValue::Text(_) => "text",
            CacheValue::Bytes(_) => "bytes",
            CacheValue::Json(_) => "json",
        }
    }

    // == Size ==
    /// Approximate payload size in bytes, used for limits and statistics.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            CacheValue::Integer(_) | CacheValue::Float(_) => 8,
            CacheValue::Bool(_) => 1,
            CacheValue::Text(s) => s.len(),
            CacheValue::Bytes(b) => b.len(),
            CacheValue::Json(v) => v.to_string().len(),
        }
    }
}

impl From<i64> for CacheValue {
    fn from(n: i64) -> Self {
        CacheValue::Integer(n)
    }
}

impl From<i32> for CacheValue {
    fn from(n: i32) -> Self {
        CacheValue::Integer(n.into())
    }
}

impl From<f64> for CacheValue {
    fn from(n: f64) -> Self {
        CacheValue::Float(n)
    }
}

impl From<bool> for CacheValue {
    fn from(b: bool) -> Self {
        CacheValue::Bool(b)
    }
}

impl From<&str> for CacheValue {
    fn from(s: &str) -> Self {
        CacheValue::Text(s.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(s: String) -> Self {
        CacheValue::Text(s)
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(b: Vec<u8>) -> Self {
        CacheValue::Bytes(b)
    }
}

impl From<serde_json::Value> for CacheValue {
    fn from(v: serde_json::Value) -> Self {
        CacheValue::Json(v)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_integer_is_integral() {
        assert_eq!(CacheValue::Integer(7).as_integer(), Some(7));
        assert_eq!(CacheValue::Float(7.0).as_integer(), None);
        assert_eq!(CacheValue::from("7").as_integer(), None);
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(
            CacheValue::from(json!({"a": [1, 2]})),
            CacheValue::from(json!({"a": [1, 2]}))
        );
        assert_ne!(CacheValue::Integer(1), CacheValue::Float(1.0));
        assert_ne!(CacheValue::from("1"), CacheValue::Integer(1));
    }

    #[test]
    fn test_float_equality_is_bitwise() {
        assert_eq!(CacheValue::Float(f64::NAN), CacheValue::Float(f64::NAN));
        assert_ne!(CacheValue::Float(0.0), CacheValue::Float(-0.0));
        assert_eq!(CacheValue::Float(1.5), CacheValue::Float(1.5));
    }

    #[test]
    fn test_serde_tagged_format() {
        let json = serde_json::to_string(&CacheValue::Integer(42)).unwrap();
        assert_eq!(json, r#"{"type":"integer","value":42}"#);

        let parsed: CacheValue = serde_json::from_str(r#"{"type":"text","value":"hi"}"#).unwrap();
        assert_eq!(parsed, CacheValue::from("hi"));
    }

    #[test]
    fn test_size_in_bytes() {
        assert_eq!(CacheValue::from("hello").size_in_bytes(), 5);
        assert_eq!(CacheValue::Bytes(vec![0; 16]).size_in_bytes(), 16);
        assert_eq!(CacheValue::Integer(0).size_in_bytes(), 8);
    }
}
