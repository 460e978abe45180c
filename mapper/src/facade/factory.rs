//! Owner of every shared service a facade uses

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::mapper_facade::MapperFacade;
use crate::config::MapperConfig;
use crate::error::{Error, Result};
use crate::mapping::{ClassMap, ClassMapBuilder, MappingPlan};
use crate::metadata::{RawKind, TypeDescriptor, TypeFactory};
use crate::property::PropertyResolver;
use crate::runtime::{
    Converter, ConverterRegistry, DefaultObjectFactory, FromStringConverter,
    InterpretingMapperProvider, MapperProvider, ObjectFactory, ToStringConverter,
};
use crate::strategy::{
    MappingStrategy, MappingStrategyKey, PlanSource, StrategyCache, StrategyResolver,
};
use crate::support;

type ClassMapKey = (TypeDescriptor, TypeDescriptor);

pub(super) struct FactoryInner {
    pub(super) config:         MapperConfig,
    pub(super) types:          Arc<TypeFactory>,
    pub(super) resolver:       Arc<PropertyResolver>,
    pub(super) class_maps:     DashMap<ClassMapKey, Arc<ClassMap>>,
    pub(super) converters:     ConverterRegistry,
    pub(super) object_factory: Arc<dyn ObjectFactory>,
    pub(super) provider:       Arc<dyn MapperProvider>,
    pub(super) cache:          StrategyCache,
}

impl fmt::Debug for FactoryInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryInner")
            .field("config", &self.config)
            .field("class_maps", &self.class_maps.len())
            .field("converters", &self.converters)
            .field("cached_strategies", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl FactoryInner {
    pub(super) fn resolve_strategy(&self, key: &MappingStrategyKey) -> Result<Arc<MappingStrategy>> {
        self.cache.resolve_or_compute(key, |key| {
            StrategyResolver {
                types:          &self.types,
                converters:     &self.converters,
                plans:          self,
                provider:       self.provider.as_ref(),
                object_factory: &self.object_factory,
            }
            .resolve(key)
        })
    }

    fn registered_plan(&self, source: &TypeDescriptor, destination: &TypeDescriptor) -> Option<MappingPlan> {
        if let Some(class_map) = self.class_maps.get(&(source.clone(), destination.clone())) {
            return Some(class_map.plan_a_to_b());
        }
        self.class_maps
            .get(&(destination.clone(), source.clone()))
            .map(|class_map| class_map.plan_b_to_a())
    }
}

impl PlanSource for FactoryInner {
    fn plan_for(&self, key: &MappingStrategyKey) -> Result<MappingPlan> {
        let raw = key.raw_source_type();
        let declared = key.source_type();
        let destination = key.destination_type();

        let registered = self
            .registered_plan(raw, destination)
            .or_else(|| self.registered_plan(declared, destination));
        if let Some(plan) = registered {
            return Ok(plan);
        }

        if !self.config.auto_class_maps {
            return Err(Error::unknown("class map", format!("{raw} -> {destination}")).into());
        }

        // a bare runtime container carries no type arguments; the declared one may
        let source = if raw.name() == declared.name() { declared } else { raw };
        let class_map = ClassMapBuilder::new(Arc::clone(&self.resolver), source.clone(), destination.clone())
            .by_default()?
            .build();
        debug!(class_map = %class_map, "Generated default class map");
        let class_map = Arc::clone(
            self.class_maps
                .entry((source.clone(), destination.clone()))
                .or_insert_with(|| Arc::new(class_map))
                .value(),
        );
        Ok(class_map.plan_a_to_b())
    }
}

/// Builder for a [`MapperFactory`] with substitute collaborators
pub struct MapperFactoryBuilder {
    config:         MapperConfig,
    object_factory: Arc<dyn ObjectFactory>,
    provider:       Arc<dyn MapperProvider>,
}

impl MapperFactoryBuilder {
    /// Use `config`
    #[must_use]
    pub fn config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    /// Create destinations with `object_factory`
    #[must_use]
    pub fn object_factory(mut self, object_factory: impl ObjectFactory + 'static) -> Self {
        self.object_factory = Arc::new(object_factory);
        self
    }

    /// Compile plans with `provider`
    #[must_use]
    pub fn mapper_provider(mut self, provider: impl MapperProvider + 'static) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Build the factory, applying the configured tracing level
    ///
    /// The tracing level is global to the process, see
    /// [`MapperConfig::tracing_level`].
    pub fn build(self) -> MapperFactory {
        if let Some(level) = self.config.tracing_level {
            support::set_tracing_level(level);
        }

        let types = Arc::new(TypeFactory::new());
        let resolver = Arc::new(PropertyResolver::new(
            Arc::clone(&types),
            self.config.name_matching,
        ));
        let converters = ConverterRegistry::new();
        converters.register(ToStringConverter);
        converters.register(FromStringConverter);

        debug!(config = ?self.config, "Built mapper factory");
        MapperFactory {
            inner: Arc::new(FactoryInner {
                config: self.config,
                types,
                resolver,
                class_maps: DashMap::new(),
                converters,
                object_factory: self.object_factory,
                provider: self.provider,
                cache: StrategyCache::new(),
            }),
        }
    }
}

impl Default for MapperFactoryBuilder {
    fn default() -> Self {
        Self {
            config:         MapperConfig::default(),
            object_factory: Arc::new(DefaultObjectFactory),
            provider:       Arc::new(InterpretingMapperProvider::new()),
        }
    }
}

impl fmt::Debug for MapperFactoryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperFactoryBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Registry of shapes, class maps and converters, and source of facades
///
/// Configuration changes after strategies were cached invalidate the
/// strategy cache, so the next mapping call resolves against the new state.
#[derive(Debug, Clone)]
pub struct MapperFactory {
    inner: Arc<FactoryInner>,
}

impl Default for MapperFactory {
    fn default() -> Self { Self::builder().build() }
}

impl MapperFactory {
    /// Builder with the default collaborators
    pub fn builder() -> MapperFactoryBuilder { MapperFactoryBuilder::default() }

    /// Factory with default collaborators and `config`
    pub fn new(config: MapperConfig) -> Self { Self::builder().config(config).build() }

    /// The active configuration
    pub fn config(&self) -> &MapperConfig { &self.inner.config }

    /// Shapes known to this factory
    pub fn types(&self) -> &Arc<TypeFactory> { &self.inner.types }

    /// Property resolver using the configured name matching
    pub fn resolver(&self) -> &Arc<PropertyResolver> { &self.inner.resolver }

    /// Register a shape
    pub fn register_kind(&self, raw: RawKind) -> Result<()> { self.inner.types.register(raw) }

    /// Start a class map between two type expressions
    pub fn class_map(&self, a: &str, b: &str) -> Result<ClassMapBuilder> {
        Ok(ClassMapBuilder::new(
            Arc::clone(&self.inner.resolver),
            self.inner.types.parse(a)?,
            self.inner.types.parse(b)?,
        ))
    }

    /// Register a class map, replacing any for the same pair
    pub fn register_class_map(&self, class_map: ClassMap) {
        debug!(class_map = %class_map, "Registered class map");
        self.inner.class_maps.insert(
            (class_map.a_type().clone(), class_map.b_type().clone()),
            Arc::new(class_map),
        );
        self.configuration_changed();
    }

    /// The class map registered or generated for `a` and `b`, in that order
    pub fn registered_class_map(&self, a: &TypeDescriptor, b: &TypeDescriptor) -> Option<Arc<ClassMap>> {
        self.inner
            .class_maps
            .get(&(a.clone(), b.clone()))
            .map(|class_map| Arc::clone(class_map.value()))
    }

    /// Register a converter looked up by shape pair
    pub fn register_converter(&self, converter: impl Converter + 'static) {
        self.inner.converters.register(converter);
        self.configuration_changed();
    }

    /// Register a converter that field maps name by `id`
    pub fn register_converter_with_id(&self, id: &str, converter: impl Converter + 'static) -> Result<()> {
        self.inner.converters.register_with_id(id, converter)?;
        self.configuration_changed();
        Ok(())
    }

    /// Number of strategies resolved and cached so far
    pub fn cached_strategies(&self) -> usize { self.inner.cache.len() }

    /// A facade sharing this factory's state
    pub fn facade(&self) -> MapperFacade { MapperFacade::new(Arc::clone(&self.inner)) }

    fn configuration_changed(&self) { self.inner.cache.invalidate_all(); }
}
