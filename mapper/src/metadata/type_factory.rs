//! Intern table for raw kinds and type descriptors
//!
//! The factory is an explicitly owned service: create one, share it behind an
//! `Arc`, and every descriptor it hands out for a given structural shape is the
//! same instance. Entries are never evicted; the table grows with the number of
//! distinct shapes the process actually uses.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;

use super::raw_kind::{FieldDecl, RawKind};
use super::type_descriptor::TypeDescriptor;
use super::type_kind::TypeKind;
use super::type_parser::{TypeExpr, parse_type_expr};
use crate::constants::{
    KIND_ARRAY, KIND_BOOL, KIND_CHAR, KIND_CLASS, KIND_COLLECTION, KIND_F64, KIND_I64, KIND_LIST,
    KIND_MAP, KIND_OBJECT, KIND_SET, KIND_STRING,
};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TypeKey {
    name: String,
    args: Vec<TypeDescriptor>,
}

/// Thread-safe registry of raw kinds and interned descriptors
#[derive(Debug)]
pub struct TypeFactory {
    kinds:    DashMap<String, Arc<RawKind>>,
    interned: DashMap<TypeKey, TypeDescriptor>,
}

impl Default for TypeFactory {
    fn default() -> Self { Self::new() }
}

impl TypeFactory {
    /// Create a factory with the built-in kinds registered
    pub fn new() -> Self {
        let factory = Self {
            kinds:    DashMap::new(),
            interned: DashMap::new(),
        };
        for raw in Self::builtin_kinds() {
            factory.kinds.insert(raw.name().to_string(), Arc::new(raw));
        }
        factory
    }

    fn builtin_kinds() -> Vec<RawKind> {
        let with_ancestors = |raw: RawKind, ancestors: &[&str]| {
            let mut raw = raw;
            raw.set_ancestors(ancestors.iter().map(ToString::to_string).collect());
            raw
        };
        vec![
            RawKind::new(KIND_OBJECT, TypeKind::Object),
            RawKind::new(KIND_BOOL, TypeKind::Primitive),
            RawKind::new(KIND_CHAR, TypeKind::Primitive),
            RawKind::new(KIND_F64, TypeKind::Primitive),
            RawKind::new(KIND_I64, TypeKind::Primitive),
            RawKind::new(KIND_STRING, TypeKind::String),
            RawKind::new(KIND_CLASS, TypeKind::Class),
            RawKind::new(KIND_COLLECTION, TypeKind::Collection).type_params(["E"]),
            with_ancestors(
                RawKind::new(KIND_LIST, TypeKind::List)
                    .type_params(["E"])
                    .extends(KIND_COLLECTION),
                &[KIND_COLLECTION],
            ),
            with_ancestors(
                RawKind::new(KIND_SET, TypeKind::Set)
                    .type_params(["E"])
                    .extends(KIND_COLLECTION),
                &[KIND_COLLECTION],
            ),
            RawKind::new(KIND_ARRAY, TypeKind::Array).type_params(["E"]),
            RawKind::new(KIND_MAP, TypeKind::Map).type_params(["K", "V"]),
        ]
    }

    /// Register a raw kind
    ///
    /// Supertypes must already be registered. Re-registering an identical
    /// definition is a no-op; a different definition under the same name is a
    /// configuration error.
    pub fn register(&self, raw: RawKind) -> Result<()> {
        let mut raw = raw;
        let mut ancestors: Vec<String> = Vec::new();
        for supertype in raw.supertypes() {
            let parent = self.raw_kind(supertype)?;
            if !ancestors.contains(&parent.name().to_string()) {
                ancestors.push(parent.name().to_string());
            }
            for ancestor in parent.ancestors() {
                if !ancestors.contains(ancestor) {
                    ancestors.push(ancestor.clone());
                }
            }
        }
        raw.set_ancestors(ancestors);

        match self.kinds.entry(raw.name().to_string()) {
            dashmap::mapref::entry::Entry::Occupied(existing) => {
                if existing.get().as_ref() == &raw {
                    Ok(())
                } else {
                    Err(Error::cannot(
                        "register kind",
                        format!("'{}' is already registered", raw.name()),
                    )
                    .into())
                }
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                trace!(kind = raw.name(), "Registered raw kind");
                slot.insert(Arc::new(raw));
                Ok(())
            }
        }
    }

    /// Look up a registered raw kind
    pub fn raw_kind(&self, name: &str) -> Result<Arc<RawKind>> {
        self.kinds
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::unknown("kind", name).into())
    }

    /// True if a kind with this name is registered
    pub fn is_registered(&self, name: &str) -> bool { self.kinds.contains_key(name) }

    /// Resolve the interned descriptor for a raw kind and its arguments
    ///
    /// Idempotent and safe to call concurrently; every caller asking for the
    /// same structural shape receives an equal descriptor. Raw use (no
    /// arguments) is always allowed; otherwise the argument count must match
    /// the kind's declared type parameters.
    pub fn resolve(&self, name: &str, args: Vec<TypeDescriptor>) -> Result<TypeDescriptor> {
        let raw = self.raw_kind(name)?;
        let arity = raw.type_param_names().len();
        if !args.is_empty() && args.len() != arity {
            return Err(Error::invalid(
                "type arguments",
                format!("{name} takes {arity} argument(s), {} given", args.len()),
            )
            .into());
        }

        let key = TypeKey {
            name: name.to_string(),
            args,
        };
        if let Some(found) = self.interned.get(&key) {
            return Ok(found.value().clone());
        }

        let args = key.args.clone();
        let descriptor = self
            .interned
            .entry(key)
            .or_insert_with(|| {
                trace!(kind = name, args = args.len(), "Interning type descriptor");
                TypeDescriptor::new(raw, args)
            })
            .value()
            .clone();
        Ok(descriptor)
    }

    /// Descriptor for a kind used without arguments
    pub fn value_of(&self, name: &str) -> Result<TypeDescriptor> { self.resolve(name, Vec::new()) }

    /// Parse and intern a type expression such as `Map<String, List<Name>>`
    pub fn parse(&self, expression: &str) -> Result<TypeDescriptor> {
        let parsed = parse_type_expr(expression).map_err(|e| Error::invalid("type expression", e))?;
        self.materialize(&parsed, &HashMap::new())
    }

    /// Intern a parsed expression, substituting type parameters from `bindings`
    pub fn materialize(
        &self,
        expr: &TypeExpr,
        bindings: &HashMap<&str, TypeDescriptor>,
    ) -> Result<TypeDescriptor> {
        if expr.args.is_empty()
            && let Some(bound) = bindings.get(expr.name.as_str())
        {
            return Ok(bound.clone());
        }
        let args = expr
            .args
            .iter()
            .map(|arg| self.materialize(arg, bindings))
            .collect::<Result<Vec<_>>>()?;
        self.resolve(&expr.name, args)
    }

    /// Descriptor of a field as seen from a concrete owner
    ///
    /// Type parameters of the declaring kind are bound to the owner's
    /// arguments; a raw owner binds them to `Object`.
    pub fn field_type(
        &self,
        owner: &TypeDescriptor,
        declaring: &RawKind,
        field: &FieldDecl,
    ) -> Result<TypeDescriptor> {
        let parsed = parse_type_expr(&field.type_expr).map_err(|e| {
            Error::invalid(
                "field type",
                format!("{}.{}: {e}", declaring.name(), field.name),
            )
        })?;

        let object = self.value_of(KIND_OBJECT)?;
        let owner_args = if owner.name() == declaring.name() {
            owner.type_arguments()
        } else {
            &[]
        };
        let bindings: HashMap<&str, TypeDescriptor> = declaring
            .type_param_names()
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let bound = owner_args.get(index).cloned().unwrap_or_else(|| object.clone());
                (param.as_str(), bound)
            })
            .collect();
        self.materialize(&parsed, &bindings)
    }

    /// Number of interned descriptors
    pub fn interned_count(&self) -> usize { self.interned.len() }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_resolve_interns_equal_shapes() {
        let factory = TypeFactory::new();
        let string = factory.value_of("String").unwrap();
        let first = factory.resolve("List", vec![string.clone()]).unwrap();
        let second = factory.resolve("List", vec![string]).unwrap();

        assert!(first.same_instance(&second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_resolution_yields_equal_descriptors() {
        let factory = Arc::new(TypeFactory::new());
        factory
            .register(RawKind::structure("Name").field("first", "String"))
            .unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let factory = Arc::clone(&factory);
                thread::spawn(move || {
                    let string = factory.value_of("String").unwrap();
                    let name = factory.value_of("Name").unwrap();
                    factory.resolve("Map", vec![string, name]).unwrap()
                })
            })
            .collect();

        let results: Vec<TypeDescriptor> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        for result in &results {
            assert_eq!(result, &results[0]);
            assert!(result.same_instance(&results[0]));
        }
    }

    #[test]
    fn test_parse_builds_nested_descriptors() {
        let factory = TypeFactory::new();
        factory.register(RawKind::structure("Name")).unwrap();

        let parsed = factory.parse("Map<String, List<Name>>").unwrap();
        let name = factory.value_of("Name").unwrap();
        let list = factory.resolve("List", vec![name]).unwrap();
        let expected = factory
            .resolve("Map", vec![factory.value_of("String").unwrap(), list])
            .unwrap();

        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_unknown_kind_and_bad_arity_are_configuration_errors() {
        let factory = TypeFactory::new();
        let unknown = factory.value_of("Widget").unwrap_err();
        assert!(unknown.current_context().is_configuration());

        let string = factory.value_of("String").unwrap();
        let arity = factory.resolve("Map", vec![string]).unwrap_err();
        assert!(arity.current_context().is_configuration());
    }

    #[test]
    fn test_register_requires_known_supertypes_and_rejects_conflicts() {
        let factory = TypeFactory::new();
        assert!(factory.register(RawKind::structure("Derived").extends("Base")).is_err());

        factory.register(RawKind::structure("Base")).unwrap();
        factory
            .register(RawKind::structure("Derived").extends("Base"))
            .unwrap();
        factory
            .register(RawKind::structure("Derived").extends("Base"))
            .unwrap();
        assert!(factory.register(RawKind::structure("Derived")).is_err());

        let derived = factory.raw_kind("Derived").unwrap();
        assert_eq!(derived.ancestors(), ["Base".to_string()]);
    }

    #[test]
    fn test_assignability_follows_supertypes_and_arguments() {
        let factory = TypeFactory::new();
        factory.register(RawKind::structure("Base")).unwrap();
        factory
            .register(RawKind::structure("Derived").extends("Base"))
            .unwrap();

        let base = factory.value_of("Base").unwrap();
        let derived = factory.value_of("Derived").unwrap();
        assert!(base.is_assignable_from(&base));
        assert!(base.is_assignable_from(&derived));
        assert!(!derived.is_assignable_from(&base));

        let bases = factory.parse("List<Base>").unwrap();
        let deriveds = factory.parse("List<Derived>").unwrap();
        let collection = factory.parse("Collection<Base>").unwrap();
        let raw_list = factory.value_of("List").unwrap();
        assert!(bases.is_assignable_from(&deriveds));
        assert!(!deriveds.is_assignable_from(&bases));
        assert!(collection.is_assignable_from(&deriveds));
        assert!(bases.is_assignable_from(&raw_list));

        let object = factory.value_of("Object").unwrap();
        assert!(object.is_assignable_from(&bases));
    }

    #[test]
    fn test_field_type_binds_owner_arguments() {
        let factory = TypeFactory::new();
        factory.register(RawKind::structure("Name")).unwrap();
        factory
            .register(
                RawKind::structure("Holder")
                    .type_params(["T"])
                    .field("value", "T")
                    .field("history", "List<T>"),
            )
            .unwrap();

        let holder = factory.parse("Holder<Name>").unwrap();
        let raw = factory.raw_kind("Holder").unwrap();
        let history = factory
            .field_type(&holder, &raw, &raw.fields()[1])
            .unwrap();
        assert_eq!(history.to_string(), "List<Name>");

        let raw_holder = factory.value_of("Holder").unwrap();
        let value = factory
            .field_type(&raw_holder, &raw, &raw.fields()[0])
            .unwrap();
        assert_eq!(value.to_string(), "Object");
    }
}
