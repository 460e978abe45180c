//! Resolved strategies and how each kind maps a value

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::key::MappingStrategyKey;
use crate::error::{Error, Result};
use crate::metadata::{TypeDescriptor, TypeKind};
use crate::runtime::{CompiledMapper, Converter, MappingContext, NestedMapper, ObjectFactory, Value};

/// How values for one key are produced
#[derive(Clone)]
pub enum StrategyKind {
    /// Share the source value unchanged
    CopyByReference,
    /// Hand the value to a converter
    UseConverter(Arc<dyn Converter>),
    /// Map a collection, array or map element by element
    MapContainer {
        /// Declared element type on the source side
        source_element:      TypeDescriptor,
        /// Declared element type on the destination side
        destination_element: TypeDescriptor,
        /// Container kind to produce
        destination_kind:    TypeKind,
    },
    /// Create a destination and run a compiled mapper into it
    InstantiateAndMap {
        /// Compiled plan
        mapper:         Arc<dyn CompiledMapper>,
        /// Creates the destination
        object_factory: Arc<dyn ObjectFactory>,
    },
    /// Run a compiled mapper into a caller-supplied destination
    MapInPlace {
        /// Compiled plan
        mapper: Arc<dyn CompiledMapper>,
    },
}

impl StrategyKind {
    /// Variant name for logging
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CopyByReference => "CopyByReference",
            Self::UseConverter(_) => "UseConverter",
            Self::MapContainer { .. } => "MapContainer",
            Self::InstantiateAndMap { .. } => "InstantiateAndMap",
            Self::MapInPlace { .. } => "MapInPlace",
        }
    }
}

impl fmt::Debug for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MapContainer {
                source_element,
                destination_element,
                destination_kind,
            } => f
                .debug_struct("MapContainer")
                .field("source_element", &source_element.to_string())
                .field("destination_element", &destination_element.to_string())
                .field("destination_kind", destination_kind)
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

/// An immutable, shareable plan for one strategy key
#[derive(Debug, Clone)]
pub struct MappingStrategy {
    key:  MappingStrategyKey,
    kind: StrategyKind,
}

impl MappingStrategy {
    /// Pair a key with how to map it
    pub const fn new(key: MappingStrategyKey, kind: StrategyKind) -> Self { Self { key, kind } }

    /// The key this strategy was resolved for
    pub const fn key(&self) -> &MappingStrategyKey { &self.key }

    /// The resolved behaviour
    pub const fn kind(&self) -> &StrategyKind { &self.kind }

    /// Map `source`, into `destination` when the key is in-place
    pub fn map(
        &self,
        source: &Value,
        destination: Option<Value>,
        nested: &dyn NestedMapper,
        context: &mut MappingContext,
    ) -> Result<Value> {
        let destination_type = self.key.destination_type();
        match &self.kind {
            StrategyKind::CopyByReference => Ok(source.clone()),
            StrategyKind::UseConverter(converter) => converter.convert(source, destination_type),
            StrategyKind::MapContainer {
                source_element,
                destination_element,
                destination_kind,
            } => map_container(
                source,
                source_element,
                destination_element,
                *destination_kind,
                nested,
                context,
            ),
            StrategyKind::InstantiateAndMap {
                mapper,
                object_factory,
            } => {
                let mut created = object_factory.new_instance(destination_type, source, context)?;
                mapper.map_into(source, &mut created, nested, context)?;
                Ok(created)
            }
            StrategyKind::MapInPlace { mapper } => {
                let mut provided = destination
                    .ok_or_else(|| Error::mismatch(destination_type, "no destination instance"))?;
                mapper.map_into(source, &mut provided, nested, context)?;
                Ok(provided)
            }
        }
    }
}

fn map_container(
    source: &Value,
    source_element: &TypeDescriptor,
    destination_element: &TypeDescriptor,
    destination_kind: TypeKind,
    nested: &dyn NestedMapper,
    context: &mut MappingContext,
) -> Result<Value> {
    let mut map_element = |element: &Value| -> Result<Value> {
        if element.is_null() {
            Ok(Value::Null)
        } else {
            nested.map_nested(element, source_element, destination_element, context)
        }
    };

    match (source, destination_kind) {
        (Value::Map(entries), TypeKind::Map) => {
            let mut mapped = BTreeMap::new();
            for (key, value) in entries {
                mapped.insert(key.clone(), map_element(value)?);
            }
            Ok(Value::Map(mapped))
        }
        (Value::List(items) | Value::Set(items) | Value::Array(items), kind)
            if kind != TypeKind::Map =>
        {
            let mut mapped = Vec::with_capacity(items.len());
            for item in items {
                let element = map_element(item)?;
                if kind != TypeKind::Set || !mapped.contains(&element) {
                    mapped.push(element);
                }
            }
            Ok(match kind {
                TypeKind::Set => Value::Set(mapped),
                TypeKind::Array => Value::Array(mapped),
                _ => Value::List(mapped),
            })
        }
        (other, kind) => Err(Error::mismatch(kind, format!("{other:?}")).into()),
    }
}
