//! Text field.

use crate::field::{Field, FieldOptions};
use crate::value::Value;

/// A field stored as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    options: FieldOptions,
}

impl Text {
    /// Create a text field.
    pub fn new() -> Self {
        Default::default()
    }

    option_setters!();
}

impl Field for Text {
    field_options!();

    fn set(&self, value: Value) -> Value {
        if value.is_null() {
            return value;
        }
        Value::Text(value.to_text())
    }
}
