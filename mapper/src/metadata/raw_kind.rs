//! Raw kinds: the un-parameterized structural definitions behind type descriptors
//!
//! A raw kind names a shape (`Person`, `List`, `Map`), its structural category,
//! its supertypes and, for structs, its ordered field declarations. Field types
//! are written as type expressions and may mention the kind's type parameters,
//! e.g. `Holder<T> { value: T, history: List<T> }`.

use super::type_kind::TypeKind;

/// A field declared on a struct kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field name as written in path expressions
    pub name:      String,
    /// Type expression, e.g. `Map<String, List<T>>`
    pub type_expr: String,
    /// Read-only fields have no mutator
    pub read_only: bool,
}

/// Structural definition of a kind, registered once with a `TypeFactory`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKind {
    name:        String,
    kind:        TypeKind,
    supertypes:  Vec<String>,
    type_params: Vec<String>,
    fields:      Vec<FieldDecl>,
    constants:   Vec<String>,
    /// Transitive supertype names, filled in by the factory at registration
    ancestors:   Vec<String>,
}

impl RawKind {
    /// Create a raw kind of the given category with no fields
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            supertypes: Vec::new(),
            type_params: Vec::new(),
            fields: Vec::new(),
            constants: Vec::new(),
            ancestors: Vec::new(),
        }
    }

    /// Create a struct kind
    pub fn structure(name: impl Into<String>) -> Self { Self::new(name, TypeKind::Struct) }

    /// Create an enum kind with its constants
    pub fn enumeration<I, S>(name: impl Into<String>, constants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut raw = Self::new(name, TypeKind::Enum);
        raw.constants = constants.into_iter().map(Into::into).collect();
        raw
    }

    /// Declare a writable field
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, type_expr: impl Into<String>) -> Self {
        self.fields.push(FieldDecl {
            name:      name.into(),
            type_expr: type_expr.into(),
            read_only: false,
        });
        self
    }

    /// Declare a field that can be read but not written
    #[must_use]
    pub fn read_only_field(mut self, name: impl Into<String>, type_expr: impl Into<String>) -> Self {
        self.fields.push(FieldDecl {
            name:      name.into(),
            type_expr: type_expr.into(),
            read_only: true,
        });
        self
    }

    /// Declare a direct supertype; it must be registered before this kind
    #[must_use]
    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    /// Declare type parameters in order
    #[must_use]
    pub fn type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Kind name
    pub fn name(&self) -> &str { &self.name }

    /// Structural category
    pub const fn kind(&self) -> TypeKind { self.kind }

    /// Direct supertypes as declared
    pub fn supertypes(&self) -> &[String] { &self.supertypes }

    /// Declared type parameter names
    pub fn type_param_names(&self) -> &[String] { &self.type_params }

    /// Fields declared directly on this kind, in declaration order
    pub fn fields(&self) -> &[FieldDecl] { &self.fields }

    /// Enum constants, empty for non-enum kinds
    pub fn constants(&self) -> &[String] { &self.constants }

    /// Transitive supertypes, nearest first
    pub fn ancestors(&self) -> &[String] { &self.ancestors }

    pub(crate) fn set_ancestors(&mut self, ancestors: Vec<String>) { self.ancestors = ancestors; }

    /// True if `other` names this kind or one of its ancestors
    ///
    /// Every kind is a subkind of the top `Object` kind.
    pub fn is_same_or_subkind_of(&self, other: &Self) -> bool {
        other.kind == TypeKind::Object
            || self.name == other.name
            || self.ancestors.iter().any(|ancestor| ancestor == &other.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_builder_keeps_declaration_order() {
        let raw = RawKind::structure("Student")
            .field("id", "String")
            .field("name", "Name")
            .read_only_field("grade", "Grade");

        let names: Vec<&str> = raw.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "name", "grade"]);
        assert!(raw.fields()[2].read_only);
        assert_eq!(raw.kind(), TypeKind::Struct);
    }

    #[test]
    fn test_subkind_uses_ancestors() {
        let object = RawKind::new("Object", TypeKind::Object);
        let base = RawKind::structure("Base");
        let mut derived = RawKind::structure("Derived").extends("Base");
        derived.set_ancestors(vec!["Base".to_string()]);

        assert!(derived.is_same_or_subkind_of(&base));
        assert!(derived.is_same_or_subkind_of(&object));
        assert!(!base.is_same_or_subkind_of(&derived));
    }
}
