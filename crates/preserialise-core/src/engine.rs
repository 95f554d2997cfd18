//! The pre-serialisation engine
//!
//! This module contains the `Preserialiser`: configuration (default args,
//! maximum recursion depth) and the recursive traversal that converts an
//! input [`Value`] tree into a plain [`Preserialised`] tree.
//!
//! Copyright (c) 2025 Preserialise Team
//! Licensed under the Apache-2.0 license

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::value::{Args, Map, Preserialised, Value};

/// A generic recursive pre-serialiser.
///
/// When the traversal encounters an object implementing
/// [`Preserialisable`](crate::Preserialisable), it invokes `preserialise()`
/// on it to obtain its serialisable replacement, passing along the effective
/// argument set so the object can customise its output per invocation. Plain
/// objects are flattened into their [`Fields`](crate::Fields) snapshot.
/// Containers are walked in iteration order, keys and order preserved.
///
/// The engine holds no call state: default args and max depth persist until
/// changed, while the merged argument set and the depth counter live only
/// for the duration of one `preserialise` call. Concurrent use from several
/// threads together with concurrent reconfiguration needs external
/// synchronisation; the engine provides no locking of its own.
#[derive(Debug, Clone)]
pub struct Preserialiser {
    /// Args passed to every capability invocation unless overridden per call
    default_args: Args,
    /// Recursion budget; the sole defense against runaway object graphs
    max_depth: usize,
}

impl Preserialiser {
    /// Nesting budget used when none is configured
    pub const DEFAULT_MAX_DEPTH: usize = 20;

    /// Create an engine with no default args and the default depth budget
    pub fn new() -> Self {
        Self {
            default_args: Args::new(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Replace the default args during construction
    pub fn with_default_args(mut self, default_args: Args) -> Self {
        self.default_args = default_args;
        self
    }

    /// Set the maximum recursion depth during construction.
    /// Negative inputs are coerced to their absolute value.
    pub fn with_max_depth(mut self, max_depth: i64) -> Self {
        self.max_depth = absolute_depth(max_depth);
        self
    }

    /// Replace the default args wholesale
    pub fn set_default_args(&mut self, default_args: Args) {
        self.default_args = default_args;
    }

    /// Merge additional default args into the existing ones; incoming keys
    /// overwrite, everything else is preserved
    pub fn add_default_args(&mut self, more_default_args: Args) {
        self.default_args.extend(more_default_args);
    }

    /// Empty the default args
    pub fn clear_default_args(&mut self) {
        self.default_args.clear();
    }

    /// The current default args
    pub fn default_args(&self) -> &Args {
        &self.default_args
    }

    /// Set the maximum recursion depth, coercing negative inputs to their
    /// absolute value
    pub fn set_max_depth(&mut self, max_depth: i64) {
        self.max_depth = absolute_depth(max_depth);
    }

    /// The current maximum recursion depth
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Pre-serialise a value with no call-specific args.
    ///
    /// See [`preserialise_with`](Self::preserialise_with).
    pub fn preserialise(&self, value: impl Into<Value>) -> Result<Preserialised> {
        self.preserialise_with(value, Args::new())
    }

    /// Pre-serialise a value.
    ///
    /// Call args are merged over the engine's default args, call args
    /// winning on key collision; the merged set is handed unchanged to every
    /// capability invocation within this call. Fails with
    /// [`Error::MaxDepthExceeded`] when the traversal would need to enter
    /// more nesting levels than the configured maximum allows, and
    /// propagates any error a capability implementation returns.
    pub fn preserialise_with(&self, value: impl Into<Value>, args: Args) -> Result<Preserialised> {
        let mut effective = self.default_args.clone();
        effective.extend(args);
        debug!(
            "preserialising with {} effective arg(s), max depth {}",
            effective.len(),
            self.max_depth
        );

        // The root value is treated as the sole element of a wrapping
        // container, so the wrapper itself consumes the first nesting level
        // and a budget of 0 rejects any input.
        let depth = 1;
        if depth > self.max_depth {
            return Err(Error::MaxDepthExceeded {
                max_depth: self.max_depth,
            });
        }
        Self::walk_value(&value.into(), &effective, self.max_depth, depth)
    }

    /// Transform one value found at the current depth.
    ///
    /// Objects are resolved through their capability first; whatever comes
    /// back (or the value itself, for non-objects) is then expanded if it is
    /// a container.
    fn walk_value(
        value: &Value,
        args: &Args,
        max_depth: usize,
        depth: usize,
    ) -> Result<Preserialised> {
        match value {
            Value::Null => Ok(Preserialised::Null),
            Value::Bool(flag) => Ok(Preserialised::Bool(*flag)),
            Value::Number(number) => Ok(Preserialised::Number(number.clone())),
            Value::String(text) => Ok(Preserialised::String(text.clone())),
            Value::Seq(items) => {
                Self::walk_seq(items, args, max_depth, depth).map(Preserialised::Array)
            }
            Value::Map(entries) => {
                Self::walk_map(entries, args, max_depth, depth).map(Preserialised::Object)
            }
            Value::Object(object) => {
                let replacement = object.resolve(args)?;
                let mut depth = depth;
                if replacement.is_object() {
                    // A capability handing back another bare object gets that
                    // object resolved in turn; the hop consumes a nesting
                    // level so self-returning implementations stay bounded.
                    depth += 1;
                    if depth > max_depth {
                        return Err(Error::MaxDepthExceeded { max_depth });
                    }
                }
                Self::walk_value(&replacement, args, max_depth, depth)
            }
        }
    }

    /// Recursively transform a sequence, preserving element order
    fn walk_seq(
        items: &[Value],
        args: &Args,
        max_depth: usize,
        depth: usize,
    ) -> Result<Vec<Preserialised>> {
        let depth = depth + 1;
        if depth > max_depth {
            return Err(Error::MaxDepthExceeded { max_depth });
        }
        trace!("walking sequence of {} item(s) at depth {}", items.len(), depth);

        items
            .iter()
            .map(|item| Self::walk_value(item, args, max_depth, depth))
            .collect()
    }

    /// Recursively transform a mapping, preserving keys and their order
    fn walk_map(
        entries: &Map,
        args: &Args,
        max_depth: usize,
        depth: usize,
    ) -> Result<serde_json::Map<String, Preserialised>> {
        let depth = depth + 1;
        if depth > max_depth {
            return Err(Error::MaxDepthExceeded { max_depth });
        }
        trace!("walking mapping of {} entries at depth {}", entries.len(), depth);

        entries
            .iter()
            .map(|(key, value)| {
                Ok((key.clone(), Self::walk_value(value, args, max_depth, depth)?))
            })
            .collect()
    }
}

impl Default for Preserialiser {
    fn default() -> Self {
        Self::new()
    }
}

/// `abs` coercion for depth inputs; saturates on 32-bit targets rather than
/// truncating
fn absolute_depth(max_depth: i64) -> usize {
    usize::try_from(max_depth.unsigned_abs()).unwrap_or(usize::MAX)
}
