//! Strategy resolution for one key
//!
//! Rules are tried in order and the first that applies wins:
//!
//! 1. a converter registered for the (source, destination) pair
//! 2. an `Object` destination shares the source
//! 3. immutable values are shared when assignable, otherwise the pair needs a converter
//! 4. containers map element by element
//! 5. struct to struct, struct to map and map to struct run the compiled mapper
//!    for the pair's class map

use std::sync::Arc;

use tracing::trace;

use super::key::MappingStrategyKey;
use super::mapping_strategy::{MappingStrategy, StrategyKind};
use crate::error::{Error, Result};
use crate::mapping::MappingPlan;
use crate::metadata::{TypeDescriptor, TypeFactory, TypeKind};
use crate::runtime::{ConverterRegistry, MapperProvider, ObjectFactory};

/// Supplies the directed plan for a key whose values are mapped field by field
pub trait PlanSource {
    /// The plan mapping the key's source into its destination
    fn plan_for(&self, key: &MappingStrategyKey) -> Result<MappingPlan>;
}

/// Collaborators consulted while resolving a key
pub struct StrategyResolver<'a> {
    /// Interns element and `Object` descriptors
    pub types:          &'a TypeFactory,
    /// Pair converters
    pub converters:     &'a ConverterRegistry,
    /// Class-map plans
    pub plans:          &'a dyn PlanSource,
    /// Compiles plans
    pub provider:       &'a dyn MapperProvider,
    /// Creates destinations for non-in-place keys
    pub object_factory: &'a Arc<dyn ObjectFactory>,
}

impl StrategyResolver<'_> {
    /// Resolve how values for `key` are mapped
    pub fn resolve(&self, key: &MappingStrategyKey) -> Result<MappingStrategy> {
        let kind = self.resolve_kind(key)?;
        trace!(key = %key, strategy = kind.name(), "Selected strategy");
        Ok(MappingStrategy::new(key.clone(), kind))
    }

    fn resolve_kind(&self, key: &MappingStrategyKey) -> Result<StrategyKind> {
        let raw = key.raw_source_type();
        let declared = key.source_type();
        let destination = key.destination_type();

        let converter = self
            .converters
            .find(raw, destination, None)
            .or_else(|| self.converters.find(declared, destination, None));
        if let Some(converter) = converter {
            return Ok(StrategyKind::UseConverter(converter));
        }

        if destination.kind() == TypeKind::Object {
            return Ok(StrategyKind::CopyByReference);
        }

        if raw.is_immutable() || destination.is_immutable() {
            if raw.is_immutable() && destination.is_assignable_from(raw) {
                return Ok(StrategyKind::CopyByReference);
            }
            return Err(Error::conversion(raw, destination, "no converter registered").into());
        }

        let fields = |kind: TypeKind| matches!(kind, TypeKind::Struct | TypeKind::Map);
        if raw.kind().is_container() && destination.kind().is_container() {
            self.container(raw, declared, destination)
        } else if fields(raw.kind())
            && fields(destination.kind())
            && (raw.kind() == TypeKind::Struct || destination.kind() == TypeKind::Struct)
        {
            let plan = self.plans.plan_for(key)?;
            let mapper = self.provider.get_or_build(&plan)?;
            if key.is_destination_provided() {
                Ok(StrategyKind::MapInPlace { mapper })
            } else {
                Ok(StrategyKind::InstantiateAndMap {
                    mapper,
                    object_factory: Arc::clone(self.object_factory),
                })
            }
        } else {
            Err(Error::mismatch(destination, raw).into())
        }
    }

    fn container(
        &self,
        raw: &TypeDescriptor,
        declared: &TypeDescriptor,
        destination: &TypeDescriptor,
    ) -> Result<StrategyKind> {
        let source_is_map = raw.kind() == TypeKind::Map;
        let destination_is_map = destination.kind() == TypeKind::Map;
        if source_is_map != destination_is_map {
            return Err(Error::mismatch(destination, raw).into());
        }

        let object = self.types.value_of(crate::constants::KIND_OBJECT)?;
        let source_element = declared
            .contained_type()
            .or_else(|| raw.contained_type())
            .unwrap_or(&object)
            .clone();
        let destination_element = destination.contained_type().unwrap_or(&object).clone();
        let destination_kind = match destination.kind() {
            TypeKind::Collection => TypeKind::List,
            kind => kind,
        };

        Ok(StrategyKind::MapContainer {
            source_element,
            destination_element,
            destination_kind,
        })
    }
}
