//! Integer field.

use crate::field::{Field, FieldOptions};
use crate::value::Value;

/// A field whose values are always integers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Integer {
    options: FieldOptions,
}

impl Integer {
    /// Create an integer field.
    pub fn new() -> Self {
        Default::default()
    }

    option_setters!();
}

impl Field for Integer {
    field_options!();

    /// Non-numeric input collapses to `0`.
    fn set(&self, value: Value) -> Value {
        Value::BigInt(value.to_integer().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_casts() {
        let field = Integer::new();
        assert_eq!(field.set(Value::from("42")), Value::BigInt(42));
        assert_eq!(field.set(Value::Double(3.7)), Value::BigInt(3));
        assert_eq!(field.set(Value::from("nope")), Value::BigInt(0));
        assert_eq!(field.set(Value::Bool(true)), Value::BigInt(1));
    }
}
