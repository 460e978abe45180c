//! Resolution of path expressions against shapes
//!
//! The resolver turns `a.b['k'].c` into a [`PropertyRef`] for a given root
//! shape, one hop at a time. Property tables, lowercase lookups and resolved
//! expressions are cached per shape; the caches only grow.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::{debug, trace};

use super::path_parser::{PathStep, parse_path};
use crate::constants::{KIND_CLASS, KIND_OBJECT};
use crate::error::{Error, Result};
use crate::metadata::{
    Accessor, MapKey, NestedProperty, Property, PropertyRef, TypeDescriptor, TypeFactory, TypeKind,
};

/// How property names are compared during resolution and default matching
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NameMatching {
    /// Names must match exactly
    #[default]
    Exact,
    /// Names match ignoring ASCII and Unicode case
    CaseInsensitive,
}

/// Resolves path expressions to properties, caching per shape
#[derive(Debug)]
pub struct PropertyResolver {
    types:      Arc<TypeFactory>,
    matching:   NameMatching,
    properties: DashMap<TypeDescriptor, Arc<[Property]>>,
    lowercase:  DashMap<TypeDescriptor, Arc<HashMap<String, String>>>,
    resolved:   DashMap<(TypeDescriptor, String), PropertyRef>,
}

impl PropertyResolver {
    /// Create a resolver over `types` with the given name matching policy
    pub fn new(types: Arc<TypeFactory>, matching: NameMatching) -> Self {
        Self {
            types,
            matching,
            properties: DashMap::new(),
            lowercase: DashMap::new(),
            resolved: DashMap::new(),
        }
    }

    /// The type factory used to bind field types
    pub const fn types(&self) -> &Arc<TypeFactory> { &self.types }

    /// Name matching policy
    pub const fn matching(&self) -> NameMatching { self.matching }

    /// Top-level properties of a shape in declaration order
    ///
    /// Struct shapes list inherited fields first, then their own, then the
    /// read-only `class` placeholder. Other shapes have no enumerable
    /// properties; maps resolve keyed names on demand instead.
    pub fn properties(&self, shape: &TypeDescriptor) -> Result<Arc<[Property]>> {
        if let Some(found) = self.properties.get(shape) {
            return Ok(Arc::clone(found.value()));
        }

        let computed: Arc<[Property]> = self.collect_properties(shape)?.into();
        debug!(
            shape = %shape,
            count = computed.len(),
            "Collected properties"
        );
        Ok(Arc::clone(
            self.properties
                .entry(shape.clone())
                .or_insert(computed)
                .value(),
        ))
    }

    fn collect_properties(&self, shape: &TypeDescriptor) -> Result<Vec<Property>> {
        if shape.kind() != TypeKind::Struct {
            return Ok(Vec::new());
        }

        let mut collected: Vec<Property> = Vec::new();
        let own = shape.raw_kind_arc();
        let mut declaring = Vec::with_capacity(own.ancestors().len() + 1);
        for ancestor in own.ancestors().iter().rev() {
            declaring.push(self.types.raw_kind(ancestor)?);
        }
        declaring.push(Arc::clone(own));

        for raw in declaring {
            let is_own = raw.name() == own.name();
            for field in raw.fields() {
                let value_type = self.types.field_type(shape, &raw, field)?;
                let property = Property::new(
                    shape.clone(),
                    Accessor::Field(field.name.clone()),
                    value_type,
                    !field.read_only,
                );
                let property = if is_own { property } else { property.inherited() };
                match collected.iter_mut().find(|p| p.name() == field.name) {
                    Some(existing) => *existing = property,
                    None => collected.push(property),
                }
            }
        }

        collected.push(Property::new(
            shape.clone(),
            Accessor::Class,
            self.types.value_of(KIND_CLASS)?,
            false,
        ));
        Ok(collected)
    }

    /// Names of the top-level properties of a shape
    pub fn property_names(&self, shape: &TypeDescriptor) -> Result<Vec<String>> {
        Ok(self
            .properties(shape)?
            .iter()
            .map(|property| property.name().to_string())
            .collect())
    }

    /// The declared name matching `name` under this resolver's policy
    pub fn canonical_name(&self, shape: &TypeDescriptor, name: &str) -> Result<Option<String>> {
        match self.matching {
            NameMatching::Exact => Ok(self
                .properties(shape)?
                .iter()
                .find(|property| property.name() == name)
                .map(|property| property.name().to_string())),
            NameMatching::CaseInsensitive => {
                let lookup = self.lowercase_names(shape)?;
                Ok(lookup.get(&name.to_lowercase()).cloned())
            }
        }
    }

    fn lowercase_names(&self, shape: &TypeDescriptor) -> Result<Arc<HashMap<String, String>>> {
        if let Some(found) = self.lowercase.get(shape) {
            return Ok(Arc::clone(found.value()));
        }
        let mut lookup = HashMap::new();
        for property in self.properties(shape)?.iter() {
            lookup
                .entry(property.name().to_lowercase())
                .or_insert_with(|| property.name().to_string());
        }
        Ok(Arc::clone(
            self.lowercase
                .entry(shape.clone())
                .or_insert_with(|| Arc::new(lookup))
                .value(),
        ))
    }

    /// A top-level property by name, under this resolver's policy
    pub fn find_property(&self, shape: &TypeDescriptor, name: &str) -> Result<Option<Property>> {
        let Some(canonical) = self.canonical_name(shape, name)? else {
            return Ok(None);
        };
        Ok(self
            .properties(shape)?
            .iter()
            .find(|property| property.name() == canonical)
            .cloned())
    }

    /// Resolve a path expression against a root shape
    ///
    /// Fails with a configuration error if the expression is malformed or any
    /// hop names nothing on the shape it is applied to.
    pub fn resolve(&self, shape: &TypeDescriptor, expression: &str) -> Result<PropertyRef> {
        let cache_key = (shape.clone(), expression.to_string());
        if let Some(found) = self.resolved.get(&cache_key) {
            return Ok(found.value().clone());
        }

        let steps = parse_path(expression)?;
        let mut hops: Vec<Property> = Vec::with_capacity(steps.len());
        let mut current = shape.clone();
        for step in &steps {
            let hop = self
                .resolve_step(&current, step)?
                .ok_or_else(|| Error::unresolvable(shape, expression))?;
            trace!(shape = %current, hop = hop.expression(), "Resolved hop");
            current = hop.value_type().clone();
            hops.push(hop);
        }

        let resolved = match hops.pop() {
            Some(tail) if hops.is_empty() => PropertyRef::Simple(tail),
            Some(tail) => PropertyRef::Nested(NestedProperty::new(
                hops.into_iter().map(PropertyRef::from).collect(),
                tail.into(),
            )?),
            None => return Err(Error::unresolvable(shape, expression).into()),
        };

        debug!(shape = %shape, expression, resolved = %resolved, "Resolved expression");
        Ok(self
            .resolved
            .entry(cache_key)
            .or_insert(resolved)
            .value()
            .clone())
    }

    fn resolve_step(&self, current: &TypeDescriptor, step: &PathStep) -> Result<Option<Property>> {
        match (current.kind(), step) {
            (TypeKind::Struct, PathStep::Name(name)) => self.find_property(current, name),
            (TypeKind::Map, PathStep::Name(name)) => {
                self.map_entry(current, MapKey::Str(name.clone())).map(Some)
            }
            (TypeKind::Map, PathStep::Select(key)) => {
                if let MapKey::Constant(constant) = key
                    && let Some(key_type) = current.map_key_type()
                    && key_type.kind() == TypeKind::Enum
                    && !key_type.raw_kind().constants().contains(constant)
                {
                    return Ok(None);
                }
                self.map_entry(current, key.clone()).map(Some)
            }
            (TypeKind::List | TypeKind::Array, PathStep::Select(MapKey::Int(index))) => {
                let Ok(index) = usize::try_from(*index) else {
                    return Ok(None);
                };
                let element = match current.element_type() {
                    Some(element) => element.clone(),
                    None => self.types.value_of(KIND_OBJECT)?,
                };
                Ok(Some(Property::new(
                    current.clone(),
                    Accessor::Index(index),
                    element,
                    true,
                )))
            }
            _ => Ok(None),
        }
    }

    fn map_entry(&self, map: &TypeDescriptor, key: MapKey) -> Result<Property> {
        let value_type = match map.map_value_type() {
            Some(value_type) => value_type.clone(),
            None => self.types.value_of(KIND_OBJECT)?,
        };
        Ok(Property::new(map.clone(), Accessor::Key(key), value_type, true))
    }
}

/// True for the `class` placeholder, which is never default-mapped
pub fn is_class_placeholder(property: &Property) -> bool {
    matches!(property.accessor(), Accessor::Class)
}
