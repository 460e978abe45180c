//! Converter registry and built-in converters

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use super::collaborators::Converter;
use super::value::Value;
use crate::error::{Error, Result};
use crate::metadata::{TypeDescriptor, TypeKind};

struct Registered {
    id:        Option<String>,
    converter: Arc<dyn Converter>,
}

/// Ordered set of converters, optionally registered under an id
///
/// Lookups by shape pair consider only converters registered without an id,
/// in registration order. Lookups by id ignore shapes.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: RwLock<Vec<Registered>>,
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let converters = self.converters.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("ConverterRegistry")
            .field("count", &converters.len())
            .field(
                "ids",
                &converters.iter().filter_map(|c| c.id.as_deref()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ConverterRegistry {
    /// Empty registry
    pub fn new() -> Self { Self::default() }

    /// Register a converter found by shape pair
    pub fn register(&self, converter: impl Converter + 'static) {
        self.converters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registered {
                id:        None,
                converter: Arc::new(converter),
            });
    }

    /// Register a converter found by id only
    pub fn register_with_id(&self, id: &str, converter: impl Converter + 'static) -> Result<()> {
        let mut converters = self.converters.write().unwrap_or_else(PoisonError::into_inner);
        if converters.iter().any(|c| c.id.as_deref() == Some(id)) {
            return Err(Error::cannot("register converter", format!("id '{id}' is already taken")).into());
        }
        debug!(id, "Registered converter");
        converters.push(Registered {
            id:        Some(id.to_string()),
            converter: Arc::new(converter),
        });
        Ok(())
    }

    /// Find a converter by id, or the first matching unnamed converter
    pub fn find(
        &self,
        source: &TypeDescriptor,
        destination: &TypeDescriptor,
        id: Option<&str>,
    ) -> Option<Arc<dyn Converter>> {
        let converters = self.converters.read().unwrap_or_else(PoisonError::into_inner);
        let found = match id {
            Some(id) => converters.iter().find(|c| c.id.as_deref() == Some(id)),
            None => converters
                .iter()
                .find(|c| c.id.is_none() && c.converter.can_convert(source, destination)),
        };
        found.map(|c| Arc::clone(&c.converter))
    }

    /// Number of registered converters
    pub fn len(&self) -> usize { self.converters.read().unwrap_or_else(PoisonError::into_inner).len() }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Shares values of the listed kinds instead of mapping them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassThroughConverter {
    kinds: HashSet<String>,
}

impl PassThroughConverter {
    /// Pass through values whose raw kind is one of `kinds`
    pub fn new<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kinds: kinds.into_iter().map(Into::into).collect(),
        }
    }
}

impl Converter for PassThroughConverter {
    fn can_convert(&self, source: &TypeDescriptor, destination: &TypeDescriptor) -> bool {
        self.kinds.contains(source.name()) && destination.is_assignable_from(source)
    }

    fn convert(&self, value: &Value, _destination: &TypeDescriptor) -> Result<Value> { Ok(value.clone()) }
}

/// Renders scalars and enum constants as strings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToStringConverter;

impl Converter for ToStringConverter {
    fn can_convert(&self, source: &TypeDescriptor, destination: &TypeDescriptor) -> bool {
        destination.kind() == TypeKind::String
            && matches!(source.kind(), TypeKind::Primitive | TypeKind::Enum)
    }

    fn convert(&self, value: &Value, destination: &TypeDescriptor) -> Result<Value> {
        let rendered = match value {
            Value::Null => return Ok(Value::Null),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Str(s) => s.clone(),
            Value::Enum { constant, .. } => constant.clone(),
            other => {
                return Err(Error::conversion(
                    format!("{other:?}"),
                    destination,
                    "not a scalar",
                )
                .into());
            }
        };
        Ok(Value::Str(rendered))
    }
}

/// Parses strings into primitives and enum constants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FromStringConverter;

impl Converter for FromStringConverter {
    fn can_convert(&self, source: &TypeDescriptor, destination: &TypeDescriptor) -> bool {
        source.kind() == TypeKind::String
            && matches!(destination.kind(), TypeKind::Primitive | TypeKind::Enum)
    }

    fn convert(&self, value: &Value, destination: &TypeDescriptor) -> Result<Value> {
        let text = match value {
            Value::Null => return Ok(Value::Null),
            Value::Str(text) => text.trim(),
            other => {
                return Err(Error::conversion(format!("{other:?}"), destination, "not a string").into());
            }
        };
        let fail = |reason: &str| Error::conversion(format!("'{text}'"), destination, reason);

        if destination.kind() == TypeKind::Enum {
            let constants = destination.raw_kind().constants();
            return constants
                .iter()
                .find(|constant| constant.as_str() == text)
                .map(|constant| Value::Enum {
                    shape:    destination.name().to_string(),
                    constant: constant.clone(),
                })
                .ok_or_else(|| fail("no such constant").into());
        }

        match destination.name() {
            crate::constants::KIND_BOOL => text
                .parse::<bool>()
                .map(Value::Bool)
                .map_err(|e| fail(&e.to_string()).into()),
            crate::constants::KIND_I64 => text
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| fail(&e.to_string()).into()),
            crate::constants::KIND_F64 => text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| fail(&e.to_string()).into()),
            crate::constants::KIND_CHAR => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Value::Str(c.to_string())),
                    _ => Err(fail("expected exactly one character").into()),
                }
            }
            _ => Err(fail("unsupported primitive").into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;
    use crate::metadata::{RawKind, TypeFactory};

    #[test]
    fn test_lookup_by_pair_skips_named_converters() {
        let types = TypeFactory::new();
        let int = types.value_of("i64").unwrap();
        let string = types.value_of("String").unwrap();
        let registry = ConverterRegistry::new();

        registry.register_with_id("shout", ToStringConverter).unwrap();
        assert!(registry.find(&int, &string, None).is_none());
        assert!(registry.find(&int, &string, Some("shout")).is_some());
        assert!(registry.register_with_id("shout", ToStringConverter).is_err());

        registry.register(ToStringConverter);
        assert!(registry.find(&int, &string, None).is_some());
        assert!(registry.find(&string, &int, None).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_string_round_trip_for_scalars_and_enums() {
        let types = TypeFactory::new();
        types
            .register(RawKind::enumeration("Level", ["GOLD", "SILVER"]))
            .unwrap();
        let level = types.value_of("Level").unwrap();
        let f64_type = types.value_of("f64").unwrap();
        let string = types.value_of("String").unwrap();

        let rendered = ToStringConverter.convert(&Value::Float(2.7), &string).unwrap();
        assert_eq!(rendered, Value::Str("2.7".into()));
        let parsed = FromStringConverter.convert(&rendered, &f64_type).unwrap();
        assert_eq!(parsed, Value::Float(2.7));

        let gold = FromStringConverter.convert(&"GOLD".into(), &level).unwrap();
        assert_eq!(
            gold,
            Value::Enum {
                shape:    "Level".into(),
                constant: "GOLD".into(),
            }
        );
        let error = FromStringConverter.convert(&"BRONZE".into(), &level).unwrap_err();
        assert!(matches!(error.current_context(), Error::Conversion(_)));
    }

    #[test]
    fn test_pass_through_requires_listed_kind() {
        let types = TypeFactory::new();
        types.register(RawKind::structure("Name")).unwrap();
        let name = types.value_of("Name").unwrap();
        let object = types.value_of("Object").unwrap();
        let converter = PassThroughConverter::new(["Name"]);

        assert!(converter.can_convert(&name, &name));
        assert!(converter.can_convert(&name, &object));
        assert!(!converter.can_convert(&object, &name));
    }
}
