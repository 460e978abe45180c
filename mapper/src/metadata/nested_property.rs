//! Nested properties and the collapse algorithm
//!
//! A nested property reaches its value through a chain of hops. The chain is
//! stored as a flat arena of atomic [`Property`] values: every hop but the last
//! is the path, the last is the tail. However a nested property is assembled,
//! from incremental builder steps or from other nested properties, the arena
//! never holds a nested hop.

use std::fmt;

use super::property::Property;
use super::type_descriptor::TypeDescriptor;
use crate::error::{Error, Result};

/// Either a single hop or a chain of hops
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyRef {
    /// One hop from the root
    Simple(Property),
    /// Several hops from the root
    Nested(NestedProperty),
}

impl PropertyRef {
    /// All atomic hops from the root, in order
    pub fn hops(&self) -> &[Property] {
        match self {
            Self::Simple(property) => std::slice::from_ref(property),
            Self::Nested(nested) => nested.hops(),
        }
    }

    /// The hop that holds the value
    pub fn tail(&self) -> &Property {
        match self {
            Self::Simple(property) => property,
            Self::Nested(nested) => nested.tail(),
        }
    }

    /// Full expression from the root
    pub fn expression(&self) -> String {
        match self {
            Self::Simple(property) => property.expression().to_string(),
            Self::Nested(nested) => nested.expression().to_string(),
        }
    }

    /// Short name of the tail
    pub fn name(&self) -> &str { self.tail().name() }

    /// Value type of the tail
    pub fn value_type(&self) -> &TypeDescriptor { self.tail().value_type() }

    /// Shape the first hop is read from
    pub fn root(&self) -> &TypeDescriptor { self.hops()[0].owner() }

    /// True if the tail can be written
    pub fn is_writable(&self) -> bool { self.tail().is_writable() }

    /// True for chains of more than one hop
    pub const fn has_path(&self) -> bool { matches!(self, Self::Nested(_)) }

    /// Tail selects a list element
    pub fn is_list_element(&self) -> bool { self.tail().is_list_element() }

    /// Tail selects an array element
    pub fn is_array_element(&self) -> bool { self.tail().is_array_element() }

    /// Tail selects a map entry
    pub fn is_map_key(&self) -> bool { self.tail().is_map_key() }

    /// Independent copy: every hop is copied, descriptors are shared
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        match self {
            Self::Simple(property) => Self::Simple(property.clone()),
            Self::Nested(nested) => Self::Nested(nested.deep_copy()),
        }
    }
}

impl From<Property> for PropertyRef {
    fn from(property: Property) -> Self { Self::Simple(property) }
}

impl From<NestedProperty> for PropertyRef {
    fn from(nested: NestedProperty) -> Self { Self::Nested(nested) }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.expression(), self.value_type())
    }
}

/// A property reached through intermediate hops
///
/// Element-kind queries reflect the tail hop only.
#[derive(Debug, Clone)]
pub struct NestedProperty {
    expression: String,
    hops:       Vec<Property>,
}

impl NestedProperty {
    /// Chain `path` in front of `tail`, collapsing any nested elements
    ///
    /// Each hop must be declared on a shape that accepts the value produced by
    /// the hop before it; otherwise this is a configuration error.
    pub fn new(path: Vec<PropertyRef>, tail: PropertyRef) -> Result<Self> {
        let mut working = path;
        working.push(tail);
        let hops = collapse(working);
        if hops.len() < 2 {
            return Err(Error::invalid("nested property", "at least two hops are required").into());
        }

        for pair in hops.windows(2) {
            let (parent, hop) = (&pair[0], &pair[1]);
            if !hop.owner().is_assignable_from(parent.value_type()) {
                return Err(
                    Error::owner_mismatch(hop.expression(), hop.owner(), parent.value_type()).into(),
                );
            }
        }

        Ok(Self {
            expression: join_expression(&hops),
            hops,
        })
    }

    /// Full expression from the root, e.g. `names['first']`
    pub fn expression(&self) -> &str { &self.expression }

    /// Intermediate hops leading to the tail's owner
    pub fn path(&self) -> &[Property] { &self.hops[..self.hops.len() - 1] }

    /// The hop that holds the value
    pub fn tail(&self) -> &Property { &self.hops[self.hops.len() - 1] }

    /// Path followed by tail
    pub fn hops(&self) -> &[Property] { &self.hops }

    /// Short name of the tail
    pub fn name(&self) -> &str { self.tail().name() }

    /// Value type of the tail
    pub fn value_type(&self) -> &TypeDescriptor { self.tail().value_type() }

    /// Element type of the tail
    pub fn element_type(&self) -> Option<&TypeDescriptor> { self.tail().element_type() }

    /// Tail selects a list element
    pub fn is_list_element(&self) -> bool { self.tail().is_list_element() }

    /// Tail selects an array element
    pub fn is_array_element(&self) -> bool { self.tail().is_array_element() }

    /// Tail selects a map entry
    pub fn is_map_key(&self) -> bool { self.tail().is_map_key() }

    /// Copy every hop independently
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self {
            expression: self.expression.clone(),
            hops:       self.hops.iter().cloned().collect(),
        }
    }
}

impl PartialEq for NestedProperty {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression && self.hops == other.hops
    }
}

impl Eq for NestedProperty {}

/// Flatten a working list of hops into atomic hops, preserving order
///
/// Nested elements are replaced in place by their own path followed by their
/// tail. Nested properties are flat, so one pass leaves no nested element.
pub fn collapse(working: Vec<PropertyRef>) -> Vec<Property> {
    let mut collapsed = Vec::with_capacity(working.len());
    for element in working {
        match element {
            PropertyRef::Simple(property) => collapsed.push(property),
            PropertyRef::Nested(nested) => collapsed.extend(nested.hops),
        }
    }
    collapsed
}

/// Render hop segments as one expression: dots between names, selectors attached
pub(crate) fn join_expression(hops: &[Property]) -> String {
    let mut expression = String::new();
    for hop in hops {
        if !expression.is_empty() && !hop.accessor().is_selector() {
            expression.push('.');
        }
        expression.push_str(hop.expression());
    }
    expression
}
