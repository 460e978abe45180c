//! Class maps and the directed plans derived from them

use std::fmt;

use itertools::Itertools;

use super::field_map::FieldMap;
use crate::metadata::{PropertyRef, TypeDescriptor};

/// The complete set of correspondences between two shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMap {
    a_type:     TypeDescriptor,
    b_type:     TypeDescriptor,
    field_maps: Vec<FieldMap>,
    excluded:   Vec<String>,
}

impl ClassMap {
    pub(crate) const fn new(
        a_type: TypeDescriptor,
        b_type: TypeDescriptor,
        field_maps: Vec<FieldMap>,
        excluded: Vec<String>,
    ) -> Self {
        Self {
            a_type,
            b_type,
            field_maps,
            excluded,
        }
    }

    /// The A shape
    pub const fn a_type(&self) -> &TypeDescriptor { &self.a_type }

    /// The B shape
    pub const fn b_type(&self) -> &TypeDescriptor { &self.b_type }

    /// Correspondences in the order they were added
    pub fn field_maps(&self) -> &[FieldMap] { &self.field_maps }

    /// Names excluded from mapping
    pub fn excluded(&self) -> &[String] { &self.excluded }

    /// Plan for mapping A values into B
    pub fn plan_a_to_b(&self) -> MappingPlan {
        MappingPlan::from_field_maps(
            self.a_type.clone(),
            self.b_type.clone(),
            self.field_maps
                .iter()
                .filter(|field_map| field_map.direction().allows_a_to_b())
                .cloned(),
        )
    }

    /// Plan for mapping B values into A
    pub fn plan_b_to_a(&self) -> MappingPlan {
        MappingPlan::from_field_maps(
            self.b_type.clone(),
            self.a_type.clone(),
            self.field_maps
                .iter()
                .filter(|field_map| field_map.direction().allows_b_to_a())
                .map(FieldMap::flip),
        )
    }
}

impl fmt::Display for ClassMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClassMap({} <-> {}: [{}])",
            self.a_type,
            self.b_type,
            self.field_maps.iter().join(", ")
        )
    }
}

/// One directed field copy within a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectedField {
    /// Where the value is read
    pub source:       PropertyRef,
    /// Where the value is written
    pub destination:  PropertyRef,
    /// Converter id to apply, if any
    pub converter_id: Option<String>,
}

/// A resolved, directed plan: which source properties feed which destination
/// properties when mapping `source_type` into `destination_type`
///
/// Destinations without a mutator are dropped when the plan is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingPlan {
    source_type:      TypeDescriptor,
    destination_type: TypeDescriptor,
    fields:           Vec<DirectedField>,
}

impl MappingPlan {
    fn from_field_maps(
        source_type: TypeDescriptor,
        destination_type: TypeDescriptor,
        field_maps: impl Iterator<Item = FieldMap>,
    ) -> Self {
        let fields = field_maps
            .filter(|field_map| field_map.b().is_writable())
            .map(|field_map| DirectedField {
                converter_id: field_map.converter_id().map(ToString::to_string),
                source:       field_map.a().clone(),
                destination:  field_map.b().clone(),
            })
            .collect();
        Self {
            source_type,
            destination_type,
            fields,
        }
    }

    /// Declared source shape
    pub const fn source_type(&self) -> &TypeDescriptor { &self.source_type }

    /// Declared destination shape
    pub const fn destination_type(&self) -> &TypeDescriptor { &self.destination_type }

    /// Field copies in order
    pub fn fields(&self) -> &[DirectedField] { &self.fields }
}
