//! Entry points that derive strategy keys and run strategies

use std::sync::Arc;

use tracing::trace;

use super::factory::FactoryInner;
use crate::error::{Error, Result};
use crate::metadata::{TypeDescriptor, TypeFactory};
use crate::runtime::{Converter, MappingContext, NestedMapper, ObjectFactory, Value};
use crate::strategy::{MappingStrategy, MappingStrategyKey, StrategyKind};

/// Maps values between registered shapes
///
/// Cheap to clone; every clone shares its factory's caches.
#[derive(Debug, Clone)]
pub struct MapperFacade {
    inner: Arc<FactoryInner>,
}

impl MapperFacade {
    pub(super) const fn new(inner: Arc<FactoryInner>) -> Self { Self { inner } }

    /// Map `source` into a new value of the type expression `destination_type`
    ///
    /// The source type is the runtime type of `source`.
    pub fn map(&self, source: &Value, destination_type: &str) -> Result<Value> {
        let source_type = source.runtime_type(&self.inner.types)?;
        let destination_type = self.inner.types.parse(destination_type)?;
        self.map_with_context(source, &source_type, &destination_type, &mut self.new_context())
    }

    /// Map `source`, declared as `source_type`, into a new `destination_type`
    pub fn map_as(&self, source: &Value, source_type: &str, destination_type: &str) -> Result<Value> {
        let source_type = self.inner.types.parse(source_type)?;
        let destination_type = self.inner.types.parse(destination_type)?;
        self.map_with_context(source, &source_type, &destination_type, &mut self.new_context())
    }

    /// Map `source` into the existing `destination`, typed by its runtime type
    pub fn map_onto(&self, source: &Value, destination: &mut Value) -> Result<()> {
        let source_type = source.runtime_type(&self.inner.types)?;
        let destination_type = destination.runtime_type(&self.inner.types)?;
        self.populate(source, &source_type, destination, &destination_type)
    }

    /// Map `source` into the existing `destination`, which must be a `destination_type`
    pub fn map_onto_as(
        &self,
        source: &Value,
        source_type: &str,
        destination: &mut Value,
        destination_type: &str,
    ) -> Result<()> {
        let source_type = self.inner.types.parse(source_type)?;
        let destination_type = self.inner.types.parse(destination_type)?;
        let actual = destination.runtime_type(&self.inner.types)?;
        if !destination_type.is_assignable_from(&actual) {
            return Err(Error::mismatch(&destination_type, &actual).into());
        }
        self.populate(source, &source_type, destination, &destination_type)
    }

    /// Map within an existing context, as nested mappings do
    pub fn map_with_context(
        &self,
        source: &Value,
        source_type: &TypeDescriptor,
        destination_type: &TypeDescriptor,
        context: &mut MappingContext,
    ) -> Result<Value> {
        self.map_value(source, source_type, destination_type, None, context)
    }

    /// The strategy a call with these types would use, resolving it if needed
    pub fn strategy_for(
        &self,
        source: &Value,
        source_type: &TypeDescriptor,
        destination_type: &TypeDescriptor,
        destination_provided: bool,
    ) -> Result<Arc<MappingStrategy>> {
        let key = MappingStrategyKey::new(
            source.runtime_type(&self.inner.types)?,
            source_type.clone(),
            destination_type.clone(),
            destination_provided,
        );
        self.inner.resolve_strategy(&key)
    }

    /// A context honouring the configured depth limit
    pub fn new_context(&self) -> MappingContext { MappingContext::new(self.inner.config.max_depth) }

    fn populate(
        &self,
        source: &Value,
        source_type: &TypeDescriptor,
        destination: &mut Value,
        destination_type: &TypeDescriptor,
    ) -> Result<()> {
        let mut context = self.new_context();
        *destination = self.map_value(
            source,
            source_type,
            destination_type,
            Some(destination.clone()),
            &mut context,
        )?;
        Ok(())
    }

    fn map_value(
        &self,
        source: &Value,
        source_type: &TypeDescriptor,
        destination_type: &TypeDescriptor,
        destination: Option<Value>,
        context: &mut MappingContext,
    ) -> Result<Value> {
        if source.is_null() {
            return Ok(destination.unwrap_or_default());
        }
        if destination.is_none()
            && let Some(mapped) = context.mapped_object(source, destination_type)
        {
            trace!(destination = %destination_type, "Reusing mapped object");
            return Ok(mapped.clone());
        }

        let strategy = self.strategy_for(source, source_type, destination_type, destination.is_some())?;
        // only structural mapping counts towards the depth limit
        let structural = !matches!(
            strategy.kind(),
            StrategyKind::CopyByReference | StrategyKind::UseConverter(_)
        );
        if structural {
            context.enter(destination_type)?;
        }
        let mapped = strategy.map(source, destination, self, context);
        if structural {
            context.exit();
        }
        let mapped = mapped?;

        context.cache_mapped_object(source, destination_type, &mapped);
        Ok(mapped)
    }
}

impl NestedMapper for MapperFacade {
    fn map_nested(
        &self,
        source: &Value,
        source_type: &TypeDescriptor,
        destination_type: &TypeDescriptor,
        context: &mut MappingContext,
    ) -> Result<Value> {
        self.map_value(source, source_type, destination_type, None, context)
    }

    fn find_converter(
        &self,
        source: &TypeDescriptor,
        destination: &TypeDescriptor,
        id: Option<&str>,
    ) -> Option<Arc<dyn Converter>> {
        self.inner.converters.find(source, destination, id)
    }

    fn object_factory(&self) -> &dyn ObjectFactory { self.inner.object_factory.as_ref() }

    fn types(&self) -> &TypeFactory { &self.inner.types }

    fn map_nulls(&self) -> bool { self.inner.config.map_nulls }
}
