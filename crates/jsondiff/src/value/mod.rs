//! The JSON value domain every diff and patch operates on.
//!
//! Values are plain `serde_json::Value`s. Absence is never encoded as a value:
//! functions that can see a missing key or list slot take `Option<&Value>`,
//! where `None` means "not there" and `Some(Value::Null)` is a stored null.

mod canonical;
mod number;

use serde_json::{Map, Value};

pub use canonical::{canonical_eq, canonical_string, write_canonical};
pub use number::{add as add_numbers, increment_between, number_eq};

/// A top-level document: a JSON object keyed by attribute name.
pub type Document = Map<String, Value>;

/// Runtime kind of a value, with numbers split into integers and floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
    Object,
}

impl Kind {
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(n) if n.is_f64() => Kind::Float,
            Value::Number(_) => Kind::Int,
            Value::String(_) => Kind::Str,
            Value::Array(_) => Kind::List,
            Value::Object(_) => Kind::Object,
        }
    }

    /// Human readable name used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "a boolean",
            Kind::Int => "an integer",
            Kind::Float => "a float",
            Kind::Str => "a string",
            Kind::List => "a list",
            Kind::Object => "an object",
        }
    }
}

/// Like [`Kind::describe`], but also covers an absent value.
pub fn describe_slot(value: Option<&Value>) -> &'static str {
    value.map_or("an absent value", |v| Kind::of(v).describe())
}
