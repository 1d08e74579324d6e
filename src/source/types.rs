//! Row and value types for extracted results.
//!
//! Defines the structures used to represent rows read from the snapshot.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// A row of the result relation: column name to scalar value, in
/// result-set column order.
pub type ReportRow = IndexMap<String, Value>;

/// A single scalar from the snapshot, mirroring SQLite's storage classes.
///
/// Serializes to the native JSON scalar; blobs serialize as base64 text.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text value.
    Text(String),

    /// Binary data.
    Blob(Vec<u8>),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Renders the value as a report key.
    ///
    /// Only integer and text values identify rows; anything else is
    /// rejected by the caller.
    pub fn to_key_string(&self) -> Option<String> {
        match self {
            Value::Int(i) => Some(i.to_string()),
            Value::Text(t) => Some(t.clone()),
            _ => None,
        }
    }

    /// Converts the value to a string representation.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(t) => t.clone(),
            Value::Blob(b) => format!("<{} bytes>", b.len()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Text(t) => serializer.serialize_str(t),
            Value::Blob(b) => serializer.serialize_str(&BASE64.encode(b)),
        }
    }
}

// Conversion implementations for common types
impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_serializes_to_native_json() {
        assert_eq!(serde_json::to_value(Value::Null).unwrap(), json!(null));
        assert_eq!(serde_json::to_value(Value::Int(42)).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(Value::Float(2.5)).unwrap(), json!(2.5));
        assert_eq!(
            serde_json::to_value(Value::Text("hi".to_string())).unwrap(),
            json!("hi")
        );
    }

    #[test]
    fn test_blob_serializes_as_base64() {
        let value = serde_json::to_value(Value::Blob(vec![1, 2, 3])).unwrap();
        assert_eq!(value, json!("AQID"));
    }

    #[test]
    fn test_to_key_string() {
        assert_eq!(Value::Int(7).to_key_string(), Some("7".to_string()));
        assert_eq!(
            Value::Text("msg-1".to_string()).to_key_string(),
            Some("msg-1".to_string())
        );
        assert_eq!(Value::Null.to_key_string(), None);
        assert_eq!(Value::Float(1.5).to_key_string(), None);
        assert_eq!(Value::Blob(vec![0]).to_key_string(), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_display_string(), "NULL");
        assert_eq!(Value::Int(42).to_display_string(), "42");
        assert_eq!(Value::Float(2.71).to_display_string(), "2.71");
        assert_eq!(Value::Text("hello".to_string()).to_display_string(), "hello");
        assert_eq!(Value::Blob(vec![1, 2, 3]).to_display_string(), "<3 bytes>");
    }

    #[test]
    fn test_value_from_conversions() {
        assert_eq!(Value::from(42i32), Value::Int(42));
        assert_eq!(Value::from(42i64), Value::Int(42));
        assert_eq!(Value::from(2.71f64), Value::Float(2.71));
        assert_eq!(Value::from("hello"), Value::Text("hello".to_string()));
        assert_eq!(Value::from(vec![1u8]), Value::Blob(vec![1]));
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(42i64)), Value::Int(42));
    }

    #[test]
    fn test_report_row_preserves_column_order() {
        let mut row = ReportRow::new();
        row.insert("zulu".to_string(), Value::Int(1));
        row.insert("alpha".to_string(), Value::Int(2));

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"zulu":1,"alpha":2}"#);
    }
}
