//! Incremental, path-aware property construction
//!
//! Each step is resolved against the value type produced by the previous one,
//! and the steps are collapsed into one flat chain on `build`. Building
//! `name` then `first` yields the same property as resolving `name.first`.

use super::nested_property::{NestedProperty, PropertyRef};
use super::type_descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::property::PropertyResolver;

/// Builds a property one expression at a time from a root shape
#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    root:  TypeDescriptor,
    steps: Vec<String>,
}

impl PropertyBuilder {
    /// Start at `root`
    pub const fn new(root: TypeDescriptor) -> Self {
        Self {
            root,
            steps: Vec::new(),
        }
    }

    /// Append an expression resolved relative to the previous step
    #[must_use]
    pub fn property(mut self, expression: impl Into<String>) -> Self {
        self.steps.push(expression.into());
        self
    }

    /// Resolve every step and collapse them into one property
    pub fn build(&self, resolver: &PropertyResolver) -> Result<PropertyRef> {
        let mut resolved: Vec<PropertyRef> = Vec::with_capacity(self.steps.len());
        let mut current = self.root.clone();
        for step in &self.steps {
            let property = resolver.resolve(&current, step)?;
            current = property.value_type().clone();
            resolved.push(property);
        }

        match resolved.pop() {
            None => Err(Error::invalid("property builder", "no steps were added").into()),
            Some(tail) if resolved.is_empty() => Ok(tail),
            Some(tail) => Ok(NestedProperty::new(resolved, tail)?.into()),
        }
    }
}
