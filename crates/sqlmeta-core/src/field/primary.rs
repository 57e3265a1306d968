//! Primary-key field.

use crate::field::{Field, FieldOptions};
use crate::value::Value;

/// An auto-assigned primary key.
///
/// Marked primary by construction. Incoming values are normalized like
/// foreign keys: numeric input becomes an integer, anything else text.
#[derive(Debug, Clone, PartialEq)]
pub struct Primary {
    options: FieldOptions,
}

impl Default for Primary {
    fn default() -> Self {
        Self {
            options: FieldOptions {
                primary: true,
                ..FieldOptions::default()
            },
        }
    }
}

impl Primary {
    /// Create a primary-key field.
    pub fn new() -> Self {
        Default::default()
    }

    option_setters!();
}

impl Field for Primary {
    field_options!();

    fn set(&self, value: Value) -> Value {
        value.to_key()
    }
}
