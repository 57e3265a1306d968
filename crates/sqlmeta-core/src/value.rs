//! Dynamically-typed field values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value stored in, or destined for, a model field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// SQL NULL / unset.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    BigInt(i64),
    /// Double-precision float.
    Double(f64),
    /// Text.
    Text(String),
}

impl Value {
    /// Check for NULL.
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value reads as a number.
    ///
    /// Integers and finite doubles are numeric, and so is text that parses as a
    /// finite number once surrounding whitespace is trimmed (`"42"`, `" 7 "`,
    /// `"1e3"`, `"-2.5"`).
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Int(_) | Value::BigInt(_) => true,
            Value::Double(f) => f.is_finite(),
            Value::Text(s) => parse_number(s).is_some(),
            _ => false,
        }
    }

    /// Coerce to an integer the way a loosely-typed store would.
    ///
    /// Numeric values truncate toward zero; booleans map to `0`/`1`; NULL maps
    /// to `0`. Returns `None` for anything else (non-numeric text, non-finite doubles).
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            Value::Null => Some(0),
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(i) => Some(i64::from(*i)),
            Value::BigInt(i) => Some(*i),
            Value::Double(f) if f.is_finite() => Some(f.trunc() as i64),
            Value::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Render the value as text.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => String::new(),
            Value::Int(i) => i.to_string(),
            Value::BigInt(i) => i.to_string(),
            Value::Double(f) => f.to_string(),
            Value::Text(s) => s.clone(),
        }
    }

    /// Normalize to a key: integers for numeric input, text otherwise.
    ///
    /// NULL is kept as NULL so optional keys stay unset.
    pub fn to_key(&self) -> Value {
        if self.is_null() {
            return Value::Null;
        }
        if self.is_numeric() {
            if let Some(i) = self.to_integer() {
                return Value::BigInt(i);
            }
        }
        Value::Text(self.to_text())
    }
}

fn parse_number(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    // Rust accepts "inf"/"nan" as floats; a key never should.
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && s.bytes().any(|b| b.is_ascii_digit()) => Some(f.trunc() as i64),
        _ => None,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            other => write!(f, "{}", other.to_text()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// JSON scalars map to their variants; arrays and objects are kept as JSON text.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::BigInt(i),
                None => n.as_f64().map_or(Value::Null, Value::Double),
            },
            other => Value::Text(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_detection() {
        assert!(Value::Int(3).is_numeric());
        assert!(Value::from("42").is_numeric());
        assert!(Value::from(" 7 ").is_numeric());
        assert!(Value::from("1e3").is_numeric());
        assert!(!Value::from("abc").is_numeric());
        assert!(!Value::from("inf").is_numeric());
        assert!(!Value::from("").is_numeric());
        assert!(!Value::Double(f64::NAN).is_numeric());
        assert!(!Value::Bool(true).is_numeric());
    }

    #[test]
    fn test_to_integer_truncates() {
        assert_eq!(Value::from("12.9").to_integer(), Some(12));
        assert_eq!(Value::Double(-2.5).to_integer(), Some(-2));
        assert_eq!(Value::from("1e3").to_integer(), Some(1000));
        assert_eq!(Value::Null.to_integer(), Some(0));
        assert_eq!(Value::from("slug").to_integer(), None);
    }

    #[test]
    fn test_to_key() {
        assert_eq!(Value::from("15").to_key(), Value::BigInt(15));
        assert_eq!(Value::Int(4).to_key(), Value::BigInt(4));
        assert_eq!(Value::from("alice").to_key(), Value::from("alice"));
        assert_eq!(Value::Bool(true).to_key(), Value::from("1"));
        assert_eq!(Value::Null.to_key(), Value::Null);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from(serde_json::json!(5)), Value::BigInt(5));
        assert_eq!(Value::from(serde_json::json!("x")), Value::from("x"));
        assert_eq!(
            Value::from(serde_json::json!({"a": 1})),
            Value::from(r#"{"a":1}"#)
        );
    }
}
