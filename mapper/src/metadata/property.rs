//! Atomic properties: one accessible slot of a shape
//!
//! A `Property` is a single hop: a struct field, a keyed map entry, an indexed
//! list or array element, or the `class` placeholder. Chains of hops are
//! represented by [`NestedProperty`](super::NestedProperty).

use std::fmt;

use super::type_descriptor::TypeDescriptor;
use super::type_kind::TypeKind;

/// Literal key of a bracket selector, e.g. `['first']`, `[3]` or `[GOLD]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    /// Quoted string key
    Str(String),
    /// Integer key or index
    Int(i64),
    /// Enum constant name
    Constant(String),
}

impl MapKey {
    /// The key as stored in a runtime map entry
    pub fn entry_key(&self) -> String {
        match self {
            Self::Str(key) | Self::Constant(key) => key.clone(),
            Self::Int(key) => key.to_string(),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(key) => write!(f, "'{key}'"),
            Self::Int(key) => write!(f, "{key}"),
            Self::Constant(key) => write!(f, "{key}"),
        }
    }
}

/// How a hop reaches its value from the owning value
///
/// Resolved once per property and invoked uniformly by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Accessor {
    /// Named field of a struct value
    Field(String),
    /// Keyed entry of a map value
    Key(MapKey),
    /// Indexed element of a list or array value
    Index(usize),
    /// The shape name of the owning value
    Class,
}

impl Accessor {
    /// Path segment for this accessor; bracket forms carry their brackets
    pub fn segment(&self) -> String {
        match self {
            Self::Field(name) => name.clone(),
            Self::Key(key) => format!("[{key}]"),
            Self::Index(index) => format!("[{index}]"),
            Self::Class => crate::constants::CLASS_PROPERTY.to_string(),
        }
    }

    /// True for bracket selectors, which attach to the previous segment without a dot
    pub const fn is_selector(&self) -> bool { matches!(self, Self::Key(_) | Self::Index(_)) }
}

/// A single resolved hop within a shape
///
/// Immutable once built. Equality covers the expression, the accessor, whether
/// a mutator exists, and the value type.
#[derive(Debug, Clone)]
pub struct Property {
    expression:        String,
    name:              String,
    accessor:          Accessor,
    writable:          bool,
    value_type:        TypeDescriptor,
    owner:             TypeDescriptor,
    declared_on_owner: bool,
}

impl Property {
    /// Create a property owned by `owner`
    pub fn new(
        owner: TypeDescriptor,
        accessor: Accessor,
        value_type: TypeDescriptor,
        writable: bool,
    ) -> Self {
        let name = match &accessor {
            Accessor::Field(name) => name.clone(),
            Accessor::Key(key) => key.entry_key(),
            Accessor::Index(index) => index.to_string(),
            Accessor::Class => crate::constants::CLASS_PROPERTY.to_string(),
        };
        Self {
            expression: accessor.segment(),
            name,
            accessor,
            writable,
            value_type,
            owner,
            declared_on_owner: true,
        }
    }

    /// Mark the property as inherited from a supertype of its owner
    #[must_use]
    pub fn inherited(mut self) -> Self {
        self.declared_on_owner = false;
        self
    }

    /// Expression relative to the owner, e.g. `name` or `['first']`
    pub fn expression(&self) -> &str { &self.expression }

    /// Short name: the field name, or the key or index for element hops
    pub fn name(&self) -> &str { &self.name }

    /// Accessor handle
    pub const fn accessor(&self) -> &Accessor { &self.accessor }

    /// Mutator handle, absent for read-only properties
    pub const fn mutator(&self) -> Option<&Accessor> {
        if self.writable {
            Some(&self.accessor)
        } else {
            None
        }
    }

    /// True if the property has a mutator
    pub const fn is_writable(&self) -> bool { self.writable }

    /// Declared value type
    pub const fn value_type(&self) -> &TypeDescriptor { &self.value_type }

    /// Element type for container-valued properties
    pub fn element_type(&self) -> Option<&TypeDescriptor> { self.value_type.contained_type() }

    /// Shape this hop is read from
    pub const fn owner(&self) -> &TypeDescriptor { &self.owner }

    /// False for fields inherited from a supertype
    pub const fn is_declared_on_owner(&self) -> bool { self.declared_on_owner }

    /// True if values of `other` can be written where this property's values go
    pub fn is_assignable_from(&self, other: &Self) -> bool {
        self.value_type.is_assignable_from(&other.value_type)
    }

    /// Collection-valued (any list, set or collection)
    pub fn is_collection(&self) -> bool { self.value_type.kind().is_collection() }

    /// List-valued
    pub fn is_list(&self) -> bool { self.value_type.kind() == TypeKind::List }

    /// Set-valued
    pub fn is_set(&self) -> bool { self.value_type.kind() == TypeKind::Set }

    /// Map-valued
    pub fn is_map(&self) -> bool { self.value_type.kind() == TypeKind::Map }

    /// Array-valued
    pub fn is_array(&self) -> bool { self.value_type.kind() == TypeKind::Array }

    /// Primitive-valued
    pub fn is_primitive(&self) -> bool { self.value_type.kind() == TypeKind::Primitive }

    /// Enum-valued
    pub fn is_enum(&self) -> bool { self.value_type.kind() == TypeKind::Enum }

    /// True if this hop selects an element of a list
    pub fn is_list_element(&self) -> bool {
        matches!(self.accessor, Accessor::Index(_)) && self.owner.kind() == TypeKind::List
    }

    /// True if this hop selects an element of an array
    pub fn is_array_element(&self) -> bool {
        matches!(self.accessor, Accessor::Index(_)) && self.owner.kind() == TypeKind::Array
    }

    /// True if this hop selects a keyed map entry
    pub const fn is_map_key(&self) -> bool { matches!(self.accessor, Accessor::Key(_)) }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
            && self.accessor == other.accessor
            && self.writable == other.writable
            && self.value_type == other.value_type
    }
}

impl Eq for Property {}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.expression, self.value_type)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;
    use crate::metadata::TypeFactory;

    #[test]
    fn test_capability_flags_follow_value_type() {
        let factory = TypeFactory::new();
        let owner = factory.parse("Map<String, List<String>>").unwrap();
        let list = factory.parse("List<String>").unwrap();

        let entry = Property::new(
            owner,
            Accessor::Key(MapKey::Str("first".into())),
            list.clone(),
            true,
        );
        assert!(entry.is_map_key());
        assert!(entry.is_list());
        assert!(entry.is_collection());
        assert!(!entry.is_map());
        assert_eq!(entry.expression(), "['first']");
        assert_eq!(entry.name(), "first");
        assert_eq!(entry.element_type().map(ToString::to_string).as_deref(), Some("String"));

        let element = Property::new(list, Accessor::Index(2), factory.value_of("String").unwrap(), true);
        assert!(element.is_list_element());
        assert!(!element.is_array_element());
        assert_eq!(element.expression(), "[2]");
    }

    #[test]
    fn test_equality_ignores_owner_and_inheritance() {
        let factory = TypeFactory::new();
        let string = factory.value_of("String").unwrap();
        let first_owner = factory.parse("Map<String, String>").unwrap();
        let second_owner = factory.value_of("Map").unwrap();

        let first = Property::new(first_owner, Accessor::Field("id".into()), string.clone(), true);
        let second =
            Property::new(second_owner, Accessor::Field("id".into()), string.clone(), true).inherited();
        let read_only = Property::new(
            factory.value_of("Map").unwrap(),
            Accessor::Field("id".into()),
            string,
            false,
        );

        assert_eq!(first, second);
        assert_ne!(first, read_only);
        assert!(read_only.mutator().is_none());
    }
}
