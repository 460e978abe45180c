//! Identity of a strategy in the cache

use std::fmt;

use crate::metadata::TypeDescriptor;

/// Cache key for a resolved strategy
///
/// Two keys are interchangeable only when all four parts are equal; in
/// particular a key for in-place population never matches a key for a fresh
/// destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingStrategyKey {
    raw_source_type:      TypeDescriptor,
    source_type:          TypeDescriptor,
    destination_type:     TypeDescriptor,
    destination_provided: bool,
}

impl MappingStrategyKey {
    /// Key for mapping a value whose runtime type is `raw_source_type`
    pub const fn new(
        raw_source_type: TypeDescriptor,
        source_type: TypeDescriptor,
        destination_type: TypeDescriptor,
        destination_provided: bool,
    ) -> Self {
        Self {
            raw_source_type,
            source_type,
            destination_type,
            destination_provided,
        }
    }

    /// Runtime type of the source value
    pub const fn raw_source_type(&self) -> &TypeDescriptor { &self.raw_source_type }

    /// Declared source type
    pub const fn source_type(&self) -> &TypeDescriptor { &self.source_type }

    /// Declared destination type
    pub const fn destination_type(&self) -> &TypeDescriptor { &self.destination_type }

    /// True if the caller supplies the destination instance
    pub const fn is_destination_provided(&self) -> bool { self.destination_provided }
}

impl fmt::Display for MappingStrategyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{source: {}, dest: {}, in-place:{}}}",
            self.raw_source_type, self.destination_type, self.destination_provided
        )
    }
}
