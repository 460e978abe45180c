//! Field correspondences between two shapes
//!
//! A [`ClassMap`] is built once per shape pair by a [`ClassMapBuilder`] and
//! turned into directed [`MappingPlan`]s for the strategy layer.

mod builder;
mod class_map;
mod direction;
mod field_map;
mod suggestor;


pub use builder::ClassMapBuilder;
pub use class_map::{ClassMap, DirectedField, MappingPlan};
pub use direction::MappingDirection;
pub use field_map::FieldMap;
pub use suggestor::{
    CaseConvention, CaseConventionSuggestor, DefaultFieldSuggestor, PrefixMode, PrefixSuggestor,
};
