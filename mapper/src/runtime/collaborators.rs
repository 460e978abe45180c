//! Seams between strategy resolution and the code that executes it
//!
//! Strategies are resolved against these traits only. The defaults live in
//! sibling modules; hosts may substitute any of them when building a
//! `MapperFactory`.

use std::sync::Arc;

use super::context::MappingContext;
use super::value::Value;
use crate::error::Result;
use crate::mapping::MappingPlan;
use crate::metadata::{TypeDescriptor, TypeFactory};

/// Executes a resolved plan on one source value
pub trait CompiledMapper: Send + Sync {
    /// Copy the plan's fields from `source` into `destination`
    fn map_into(
        &self,
        source: &Value,
        destination: &mut Value,
        nested: &dyn NestedMapper,
        context: &mut MappingContext,
    ) -> Result<()>;
}

/// Produces compiled mappers for plans, typically caching them
pub trait MapperProvider: Send + Sync {
    /// The compiled mapper for `plan`
    fn get_or_build(&self, plan: &MappingPlan) -> Result<Arc<dyn CompiledMapper>>;
}

/// Creates destination instances when the caller supplied none
pub trait ObjectFactory: Send + Sync {
    /// A new, empty value of `destination`
    fn new_instance(
        &self,
        destination: &TypeDescriptor,
        source: &Value,
        context: &mut MappingContext,
    ) -> Result<Value>;
}

/// Converts a value of one shape into another without structural mapping
pub trait Converter: Send + Sync {
    /// True if this converter handles `source` to `destination`
    fn can_convert(&self, source: &TypeDescriptor, destination: &TypeDescriptor) -> bool;

    /// Convert `value` into a value of `destination`
    fn convert(&self, value: &Value, destination: &TypeDescriptor) -> Result<Value>;
}

/// Callbacks a compiled mapper uses to map the values it reads
pub trait NestedMapper {
    /// Map `source` from `source_type` into a new value of `destination_type`
    fn map_nested(
        &self,
        source: &Value,
        source_type: &TypeDescriptor,
        destination_type: &TypeDescriptor,
        context: &mut MappingContext,
    ) -> Result<Value>;

    /// A converter by id, or by shape pair when `id` is `None`
    fn find_converter(
        &self,
        source: &TypeDescriptor,
        destination: &TypeDescriptor,
        id: Option<&str>,
    ) -> Option<Arc<dyn Converter>>;

    /// Factory for intermediate destination values
    fn object_factory(&self) -> &dyn ObjectFactory;

    /// The type factory values are described by
    fn types(&self) -> &TypeFactory;

    /// Whether null sources overwrite destination fields
    fn map_nulls(&self) -> bool;
}
