//! State threaded through one top-level mapping call

use std::collections::HashMap;

use tracing::trace;

use super::value::Value;
use crate::error::{Error, Result};
use crate::metadata::TypeDescriptor;

/// Per-call mapping state
///
/// Tracks nesting depth against a limit and remembers, for each source struct
/// identity and destination type, the destination already produced so shared
/// sources map to a shared result.
#[derive(Debug)]
pub struct MappingContext {
    depth:     usize,
    max_depth: usize,
    mapped:    HashMap<(usize, TypeDescriptor), Value>,
}

impl MappingContext {
    /// Fresh context with the given depth limit
    pub fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
            mapped: HashMap::new(),
        }
    }

    /// Current nesting depth
    pub const fn depth(&self) -> usize { self.depth }

    /// Configured depth limit
    pub const fn max_depth(&self) -> usize { self.max_depth }

    /// Enter a nested mapping into `destination`
    pub fn enter(&mut self, destination: &TypeDescriptor) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::RecursionLimit {
                limit:     self.max_depth,
                type_name: destination.to_string(),
            }
            .into());
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave the innermost nested mapping
    pub const fn exit(&mut self) { self.depth = self.depth.saturating_sub(1); }

    /// The destination already produced for `source` as `destination`
    pub fn mapped_object(&self, source: &Value, destination: &TypeDescriptor) -> Option<&Value> {
        let identity = source.identity()?;
        self.mapped.get(&(identity, destination.clone()))
    }

    /// Remember the destination produced for `source`
    pub fn cache_mapped_object(&mut self, source: &Value, destination: &TypeDescriptor, mapped: &Value) {
        if let Some(identity) = source.identity() {
            trace!(destination = %destination, "Caching mapped object");
            self.mapped
                .insert((identity, destination.clone()), mapped.clone());
        }
    }
}
