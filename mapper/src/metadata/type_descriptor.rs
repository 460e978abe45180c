//! Canonical structural type descriptors
//!
//! A `TypeDescriptor` is a raw kind plus its generic arguments. Descriptors are
//! created through a `TypeFactory`, which interns them so that equal shapes are
//! normally the same allocation. Equality is still structural: two descriptors
//! built by different factories, or during an interning race, compare equal
//! when their raw kind names and arguments are recursively equal.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use itertools::Itertools;

use super::raw_kind::RawKind;
use super::type_kind::TypeKind;

#[derive(Debug)]
struct TypeInner {
    raw:  Arc<RawKind>,
    args: Vec<TypeDescriptor>,
}

/// Immutable, cheaply cloneable descriptor of a shape
#[derive(Debug, Clone)]
pub struct TypeDescriptor(Arc<TypeInner>);

impl TypeDescriptor {
    pub(crate) fn new(raw: Arc<RawKind>, args: Vec<Self>) -> Self {
        Self(Arc::new(TypeInner { raw, args }))
    }

    /// The raw kind behind this descriptor
    pub fn raw_kind(&self) -> &RawKind { &self.0.raw }

    pub(crate) fn raw_kind_arc(&self) -> &Arc<RawKind> { &self.0.raw }

    /// Raw kind name without arguments
    pub fn name(&self) -> &str { self.0.raw.name() }

    /// Structural category
    pub fn kind(&self) -> TypeKind { self.0.raw.kind() }

    /// Generic arguments in order, empty for raw use
    pub fn type_arguments(&self) -> &[Self] { &self.0.args }

    /// Element type of a single-argument generic container
    pub fn element_type(&self) -> Option<&Self> {
        match self.0.args.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Key type of a `Map<K, V>`
    pub fn map_key_type(&self) -> Option<&Self> {
        if self.kind() == TypeKind::Map {
            self.0.args.first()
        } else {
            None
        }
    }

    /// Value type of a `Map<K, V>`
    pub fn map_value_type(&self) -> Option<&Self> {
        if self.kind() == TypeKind::Map {
            self.0.args.get(1)
        } else {
            None
        }
    }

    /// Type of the values held by a container: the element type for
    /// collections and arrays, the value type for maps
    pub fn contained_type(&self) -> Option<&Self> {
        match self.kind() {
            TypeKind::Map => self.map_value_type(),
            kind if kind.is_container() => self.element_type(),
            _ => None,
        }
    }

    /// True if both descriptors are the same interned instance
    pub fn same_instance(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }

    /// True if values of kind `other` may stand where `self` is expected
    ///
    /// The raw kind of `other` must be the same as or a subkind of this raw
    /// kind. When both sides carry type arguments they must agree in number
    /// and be pairwise assignable.
    pub fn is_assignable_from(&self, other: &Self) -> bool {
        if self == other {
            return true;
        }
        if !other.raw_kind().is_same_or_subkind_of(self.raw_kind()) {
            return false;
        }
        let (mine, theirs) = (self.type_arguments(), other.type_arguments());
        if mine.is_empty() || theirs.is_empty() {
            return true;
        }
        mine.len() == theirs.len()
            && mine
                .iter()
                .zip(theirs)
                .all(|(expected, found)| expected.is_assignable_from(found))
    }

    /// Immutable kinds are shared rather than copied
    pub fn is_immutable(&self) -> bool { self.kind().is_immutable() }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
            || (self.name() == other.name() && self.type_arguments() == other.type_arguments())
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.type_arguments().hash(state);
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.type_arguments().is_empty() {
            write!(f, "{}", self.name())
        } else {
            write!(
                f,
                "{}<{}>",
                self.name(),
                self.type_arguments().iter().join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, kind: TypeKind) -> Arc<RawKind> { Arc::new(RawKind::new(name, kind)) }

    #[test]
    fn test_equality_is_structural_not_identity() {
        let string = TypeDescriptor::new(raw("String", TypeKind::String), vec![]);
        let first = TypeDescriptor::new(raw("List", TypeKind::List), vec![string.clone()]);
        let second = TypeDescriptor::new(raw("List", TypeKind::List), vec![string]);

        assert!(!first.same_instance(&second));
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "List<String>");
    }

    #[test]
    fn test_arguments_distinguish_descriptors() {
        let string = TypeDescriptor::new(raw("String", TypeKind::String), vec![]);
        let int = TypeDescriptor::new(raw("i64", TypeKind::Primitive), vec![]);
        let list = raw("List", TypeKind::List);

        let strings = TypeDescriptor::new(Arc::clone(&list), vec![string]);
        let ints = TypeDescriptor::new(list, vec![int]);
        assert_ne!(strings, ints);
    }

    #[test]
    fn test_map_accessors() {
        let string = TypeDescriptor::new(raw("String", TypeKind::String), vec![]);
        let int = TypeDescriptor::new(raw("i64", TypeKind::Primitive), vec![]);
        let map = TypeDescriptor::new(raw("Map", TypeKind::Map), vec![string.clone(), int.clone()]);

        assert_eq!(map.map_key_type(), Some(&string));
        assert_eq!(map.map_value_type(), Some(&int));
        assert_eq!(map.contained_type(), Some(&int));
        assert_eq!(map.element_type(), None);
    }
}
