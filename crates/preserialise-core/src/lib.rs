//! Preserialise Core - Depth-bounded recursive pre-serialisation engine
//!
//! This crate converts arbitrary value graphs (scalars, ordered containers,
//! and domain objects) into plain [`serde_json::Value`] trees ready for any
//! downstream encoder. Objects that implement the [`Preserialisable`]
//! capability supply their own replacement value and can react to
//! caller-supplied args; plain objects expose an ordered field snapshot via
//! [`Fields`] and are flattened generically.
//!
//! # Main Components
//!
//! - **Error Handling**: fail-fast error types using `thiserror` and `anyhow`
//! - **Value Model**: a closed sum type over primitives, sequences,
//!   insertion-ordered mappings, and object handles
//! - **Capabilities**: the contracts objects implement to take part in
//!   pre-serialisation
//! - **Engine**: the `Preserialiser` - argument merging, capability
//!   dispatch, and the recursion depth guard
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use preserialise_core::{args, Args, Map, Preserialisable, Preserialiser, Result, Value};
//!
//! struct Tag {
//!     label: String,
//! }
//!
//! impl Preserialisable for Tag {
//!     fn preserialise(&self, args: &Args) -> Result<Value> {
//!         let mut out = Map::new();
//!         out.insert("label".to_string(), Value::from(self.label.as_str()));
//!         if args.get("verbose").and_then(|flag| flag.as_bool()).unwrap_or(false) {
//!             out.insert("kind".to_string(), Value::from("tag"));
//!         }
//!         Ok(Value::Map(out))
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let engine = Preserialiser::new();
//!     let tag = Rc::new(Tag { label: "demo".to_string() });
//!
//!     let terse = engine.preserialise(Value::preserialisable(tag.clone()))?;
//!     assert_eq!(terse["label"], "demo");
//!
//!     let verbose = engine.preserialise_with(
//!         Value::preserialisable(tag),
//!         args! { "verbose" => true },
//!     )?;
//!     assert_eq!(verbose["kind"], "tag");
//!     Ok(())
//! }
//! ```

pub mod capability;
pub mod engine;
pub mod error;
pub mod value;

// Re-export main types for convenience
pub use capability::{Fields, Preserialisable};
pub use engine::Preserialiser;
pub use error::{Error, Result};
pub use value::{Args, Map, Number, ObjectRef, Preserialised, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_creation() {
        let err = Error::MaxDepthExceeded { max_depth: 3 };
        assert!(err.to_string().contains('3'));
    }
}
