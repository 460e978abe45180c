//! Builder for class maps, including the default-matching pass

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::class_map::ClassMap;
use super::direction::MappingDirection;
use super::field_map::FieldMap;
use super::suggestor::DefaultFieldSuggestor;
use crate::error::{Error, Result};
use crate::metadata::{Accessor, MapKey, TypeDescriptor, TypeKind};
use crate::property::{PropertyResolver, is_class_placeholder};

/// Accumulates correspondences between shapes A and B
///
/// Explicit correspondences come first; `by_default` then fills in what is
/// left without touching anything already mapped. Mapped properties are
/// tracked by their full expression on each side.
#[derive(Debug)]
pub struct ClassMapBuilder {
    resolver:   Arc<PropertyResolver>,
    a_type:     TypeDescriptor,
    b_type:     TypeDescriptor,
    field_maps: Vec<FieldMap>,
    excluded:   Vec<String>,
    mapped_a:   HashSet<String>,
    mapped_b:   HashSet<String>,
    suggestors: Vec<Arc<dyn DefaultFieldSuggestor>>,
}

impl ClassMapBuilder {
    /// Start a class map between `a_type` and `b_type`
    pub fn new(resolver: Arc<PropertyResolver>, a_type: TypeDescriptor, b_type: TypeDescriptor) -> Self {
        Self {
            resolver,
            a_type,
            b_type,
            field_maps: Vec::new(),
            excluded: Vec::new(),
            mapped_a: HashSet::new(),
            mapped_b: HashSet::new(),
            suggestors: Vec::new(),
        }
    }

    /// Map `a` and `b` both ways
    pub fn field(self, a: &str, b: &str) -> Result<Self> {
        self.add_field_map(a, b, MappingDirection::Bidirectional, None, false)
    }

    /// Map `a` into `b` only
    pub fn field_a_to_b(self, a: &str, b: &str) -> Result<Self> {
        self.add_field_map(a, b, MappingDirection::AToB, None, false)
    }

    /// Map `b` into `a` only
    pub fn field_b_to_a(self, a: &str, b: &str) -> Result<Self> {
        self.add_field_map(a, b, MappingDirection::BToA, None, false)
    }

    /// Map `a` and `b` both ways through the converter registered under `converter_id`
    pub fn field_with_converter(self, a: &str, b: &str, converter_id: &str) -> Result<Self> {
        self.add_field_map(
            a,
            b,
            MappingDirection::Bidirectional,
            Some(converter_id.to_string()),
            false,
        )
    }

    /// Mark `name` as handled on both sides without mapping it
    pub fn exclude(mut self, name: &str) -> Result<Self> {
        let on_a = self.resolver.canonical_name(&self.a_type, name)?;
        let on_b = self.resolver.canonical_name(&self.b_type, name)?;
        if on_a.is_none() && on_b.is_none() {
            return Err(Error::unresolvable(
                format!("{} or {}", self.a_type, self.b_type),
                name,
            )
            .into());
        }
        self.mapped_a.extend(on_a);
        self.mapped_b.extend(on_b);
        self.excluded.push(name.to_string());
        Ok(self)
    }

    /// Append a suggestor consulted by the default pass
    #[must_use]
    pub fn suggestor(mut self, suggestor: impl DefaultFieldSuggestor + 'static) -> Self {
        self.suggestors.push(Arc::new(suggestor));
        self
    }

    /// Pair remaining properties by name, both ways
    pub fn by_default(self) -> Result<Self> { self.by_default_in(MappingDirection::Bidirectional) }

    /// Pair remaining properties by name, then by suggestion, in `direction`
    ///
    /// The `class` placeholder is never paired. Proposals naming a missing or
    /// already mapped property are skipped.
    pub fn by_default_in(mut self, direction: MappingDirection) -> Result<Self> {
        match (self.a_type.kind(), self.b_type.kind()) {
            (TypeKind::Struct, TypeKind::Map) => return self.by_default_to_map(direction),
            (TypeKind::Map, TypeKind::Struct) => return self.by_default_from_map(direction),
            _ => {}
        }

        let properties = self.resolver.properties(&self.a_type)?;
        for property in properties.iter() {
            if is_class_placeholder(property) || self.mapped_a.contains(property.expression()) {
                continue;
            }

            if let Some(b_name) = self.resolver.canonical_name(&self.b_type, property.name())? {
                if self.is_default_target(&b_name)? {
                    self = self.add_field_map(property.name(), &b_name, direction, None, true)?;
                } else {
                    trace!(a = property.name(), b = %b_name, "Default match already mapped on B");
                }
                continue;
            }

            let suggestors = self.suggestors.clone();
            for suggestor in &suggestors {
                let Some(proposal) = suggestor.suggest(property.name(), property.value_type()) else {
                    continue;
                };
                match self.resolver.canonical_name(&self.b_type, &proposal)? {
                    Some(b_name) if self.is_default_target(&b_name)? => {
                        debug!(a = property.name(), b = %b_name, "Accepted suggested field");
                        self = self.add_field_map(property.name(), &b_name, direction, None, true)?;
                        break;
                    }
                    _ => warn!(
                        a = property.name(),
                        proposal = %proposal,
                        shape = %self.b_type,
                        "Skipped suggestion: not an unmapped property"
                    ),
                }
            }
        }
        Ok(self)
    }

    /// Every unmapped struct property becomes the map entry of the same name
    fn by_default_to_map(mut self, direction: MappingDirection) -> Result<Self> {
        let properties = self.resolver.properties(&self.a_type)?;
        for property in properties.iter() {
            let key = entry_expression(property.name());
            if is_class_placeholder(property)
                || self.mapped_a.contains(property.expression())
                || self.mapped_b.contains(&key)
            {
                continue;
            }
            self = self.add_field_map(property.name(), &key, direction, None, true)?;
        }
        Ok(self)
    }

    /// Every unmapped struct property is read from the map entry of the same name
    fn by_default_from_map(mut self, direction: MappingDirection) -> Result<Self> {
        let properties = self.resolver.properties(&self.b_type)?;
        for property in properties.iter() {
            let key = entry_expression(property.name());
            if is_class_placeholder(property)
                || self.mapped_b.contains(property.expression())
                || self.mapped_a.contains(&key)
            {
                continue;
            }
            self = self.add_field_map(&key, property.name(), direction, None, true)?;
        }
        Ok(self)
    }

    fn is_default_target(&self, b_name: &str) -> Result<bool> {
        if self.mapped_b.contains(b_name) {
            return Ok(false);
        }
        Ok(self
            .resolver
            .find_property(&self.b_type, b_name)?
            .is_some_and(|property| !is_class_placeholder(&property)))
    }

    fn add_field_map(
        mut self,
        a: &str,
        b: &str,
        direction: MappingDirection,
        converter_id: Option<String>,
        by_default: bool,
    ) -> Result<Self> {
        let a_property = self.resolver.resolve(&self.a_type, a)?;
        let b_property = self.resolver.resolve(&self.b_type, b)?;
        for (mapped, property) in [
            (&mut self.mapped_a, &a_property),
            (&mut self.mapped_b, &b_property),
        ] {
            // a nested side also claims its root property
            mapped.insert(property.hops()[0].expression().to_string());
            mapped.insert(property.expression());
        }

        let field_map = FieldMap::new(a_property, b_property, direction, converter_id, by_default);
        debug!(
            a_type = %self.a_type,
            b_type = %self.b_type,
            field_map = %field_map,
            "Added field map"
        );
        self.field_maps.push(field_map);
        Ok(self)
    }

    /// Finish the class map
    pub fn build(self) -> ClassMap {
        ClassMap::new(self.a_type, self.b_type, self.field_maps, self.excluded)
    }
}

fn entry_expression(name: &str) -> String { Accessor::Key(MapKey::Str(name.to_string())).segment() }
