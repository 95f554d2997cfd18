//! The value model the pre-serialisation engine operates on
//!
//! Input trees are built from [`Value`], a closed sum type over primitives,
//! ordered containers, and object handles, so the traversal can match
//! exhaustively instead of relying on dynamic type checks. Output trees are
//! plain [`serde_json::Value`] and therefore contain no object handles or
//! engine-specific types by construction.
//!
//! Copyright (c) 2025 Preserialise Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::capability::{Fields, Preserialisable};
use crate::Result;

/// Numeric primitive, shared with the output model
pub use serde_json::Number;

/// Insertion-ordered mapping of string keys to input values
pub type Map = IndexMap<String, Value>;

/// Parameter set passed to every capability invocation within one call.
/// Insertion-ordered plain data; call-level entries overlay engine defaults,
/// with an overwritten key keeping its original position.
pub type Args = serde_json::Map<String, serde_json::Value>;

/// A fully pre-serialised tree, ready for any downstream serde encoder
pub type Preserialised = serde_json::Value;

/// Any datum flowing into the pre-serialisation engine
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Ordered sequence of values
    Seq(Vec<Value>),
    /// Insertion-ordered key/value mapping
    Map(Map),
    /// A domain object, resolved during traversal via its capability
    Object(ObjectRef),
}

/// Shared handle to a domain object participating in pre-serialisation.
///
/// Objects are either transformable (they implement [`Preserialisable`] and
/// supply their own replacement value) or plain (they expose an ordered
/// field snapshot via [`Fields`]). Handles are reference-counted so one
/// instance can appear at several positions in an input tree; the traversal
/// itself is single-threaded, hence `Rc` rather than `Arc`.
#[derive(Clone)]
pub enum ObjectRef {
    Preserialisable(Rc<dyn Preserialisable>),
    Plain(Rc<dyn Fields>),
}

impl ObjectRef {
    /// Replacement value for this object under the given effective args.
    pub(crate) fn resolve(&self, args: &Args) -> Result<Value> {
        match self {
            ObjectRef::Preserialisable(object) => object.preserialise(args),
            ObjectRef::Plain(object) => Ok(Value::Map(object.fields())),
        }
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectRef::Preserialisable(_) => f.write_str("Preserialisable(..)"),
            ObjectRef::Plain(_) => f.write_str("Plain(..)"),
        }
    }
}

impl Value {
    /// Wrap a transformable object for inclusion in an input tree
    pub fn preserialisable(object: Rc<dyn Preserialisable>) -> Self {
        Value::Object(ObjectRef::Preserialisable(object))
    }

    /// Wrap a plain object for inclusion in an input tree
    pub fn plain(object: Rc<dyn Fields>) -> Self {
        Value::Object(ObjectRef::Plain(object))
    }

    /// Build an input value from any serde-serializable type
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Value::from(serde_json::to_value(value)?))
    }

    /// Whether this value is an ordered container (sequence or mapping)
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Seq(_) | Value::Map(_))
    }

    /// Whether this value is an unresolved object handle
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        // Non-finite floats have no JSON representation; follow serde_json
        // and map them to null.
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::from(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::String(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::String(text)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Map> for Value {
    fn from(entries: Map) -> Self {
        Value::Map(entries)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Seq(iter.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(flag) => Value::Bool(flag),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(text) => Value::String(text),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Value {
    fn from(entries: serde_json::Map<String, serde_json::Value>) -> Self {
        Value::from(serde_json::Value::Object(entries))
    }
}

/// Build an [`Args`] map from `key => value` pairs. Values go through
/// [`serde_json::json!`], so anything that macro accepts works here.
///
/// ```
/// use preserialise_core::args;
///
/// let args = args! { "include_children" => true, "limit" => 5 };
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => { $crate::Args::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::Args::new();
        $(
            args.insert(::std::string::String::from($key), ::serde_json::json!($value));
        )+
        args
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_conversions() {
        assert!(matches!(Value::from(true), Value::Bool(true)));
        assert!(matches!(Value::from(42i64), Value::Number(_)));
        assert!(matches!(Value::from("text"), Value::String(_)));
        assert!(matches!(Value::from(()), Value::Null));
        assert!(matches!(Value::from(f64::NAN), Value::Null));
    }

    #[test]
    fn test_json_round_trip_structure() {
        let value = Value::from(json!({"a": [1, 2], "b": {"c": null}}));
        let Value::Map(entries) = value else {
            panic!("expected a mapping");
        };
        assert!(entries["a"].is_container());
        assert!(entries["b"].is_container());
    }

    #[test]
    fn test_map_preserves_insertion_order() {
        let value = Value::from(json!({"z": 1, "a": 2, "m": 3}));
        let Value::Map(entries) = value else {
            panic!("expected a mapping");
        };
        let keys: Vec<_> = entries.keys().cloned().collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_args_macro() {
        let args = args! { "flag" => true, "name" => "probe" };
        assert_eq!(args["flag"], json!(true));
        assert_eq!(args["name"], json!("probe"));
        assert!(args!().is_empty());
    }

    #[test]
    fn test_from_serialize() {
        #[derive(serde::Serialize)]
        struct Point {
            x: i32,
            y: i32,
        }

        let value = Value::from_serialize(&Point { x: 1, y: 2 }).unwrap();
        assert!(value.is_container());
    }
}
