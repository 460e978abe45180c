//! Default compiled-mapper provider: interprets plans over [`Value`]s
//!
//! For each directed field the source path is walked first. A null or missing
//! intermediate hop skips the field; a missing tail reads as null. The value is
//! converted when the field names a converter, otherwise mapped through the
//! nested mapper, then written along the destination path, creating
//! intermediate destination values on the way.

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, trace};

use super::collaborators::{CompiledMapper, MapperProvider, NestedMapper};
use super::context::MappingContext;
use super::value::Value;
use crate::error::{Error, Result};
use crate::mapping::{DirectedField, MappingPlan};
use crate::metadata::Property;

/// Builds an [`InterpretedMapper`] per plan
#[derive(Debug, Default)]
pub struct InterpretingMapperProvider {
    built: AtomicUsize,
}

impl InterpretingMapperProvider {
    /// New provider
    pub fn new() -> Self { Self::default() }

    /// Number of mappers built so far
    pub fn built(&self) -> usize { self.built.load(Ordering::Relaxed) }
}

impl MapperProvider for InterpretingMapperProvider {
    fn get_or_build(&self, plan: &MappingPlan) -> Result<Arc<dyn CompiledMapper>> {
        self.built.fetch_add(1, Ordering::Relaxed);
        debug!(
            source = %plan.source_type(),
            destination = %plan.destination_type(),
            fields = plan.fields().len(),
            "Building interpreted mapper"
        );
        Ok(Arc::new(InterpretedMapper { plan: plan.clone() }))
    }
}

/// Executes one plan by walking property paths at runtime
#[derive(Debug, Clone)]
pub struct InterpretedMapper {
    plan: MappingPlan,
}

impl InterpretedMapper {
    /// The plan this mapper executes
    pub const fn plan(&self) -> &MappingPlan { &self.plan }

    fn map_field(
        field: &DirectedField,
        source: &Value,
        destination: &mut Value,
        nested: &dyn NestedMapper,
        context: &mut MappingContext,
    ) -> Result<()> {
        let Some(value) = read_path(source, field.source.hops()) else {
            trace!(field = %field.source, "Skipping field with null intermediate");
            return Ok(());
        };
        if value.is_null() && !nested.map_nulls() {
            return Ok(());
        }

        let source_type = field.source.value_type();
        let destination_type = field.destination.value_type();
        let mapped = if value.is_null() {
            Value::Null
        } else if let Some(id) = &field.converter_id {
            let converter = nested
                .find_converter(source_type, destination_type, Some(id))
                .ok_or_else(|| Error::unknown("converter", id))?;
            converter.convert(&value, destination_type)?
        } else {
            nested.map_nested(&value, source_type, destination_type, context)?
        };

        write_path(destination, field.destination.hops(), mapped, source, nested, context)
    }
}

impl CompiledMapper for InterpretedMapper {
    fn map_into(
        &self,
        source: &Value,
        destination: &mut Value,
        nested: &dyn NestedMapper,
        context: &mut MappingContext,
    ) -> Result<()> {
        for field in self.plan.fields() {
            Self::map_field(field, source, destination, nested, context)?;
        }
        Ok(())
    }
}

/// Read along `hops`; `None` when an intermediate hop is null or missing
fn read_path<'v>(source: &'v Value, hops: &[Property]) -> Option<Cow<'v, Value>> {
    let (tail, path) = hops.split_last()?;
    let mut current = source;
    for hop in path {
        match current.read(hop.accessor()) {
            Some(Cow::Borrowed(next)) if !next.is_null() => current = next,
            _ => return None,
        }
    }
    Some(
        current
            .read(tail.accessor())
            .unwrap_or(Cow::Owned(Value::Null)),
    )
}

/// Write along `hops`, instantiating null or missing intermediates
fn write_path(
    destination: &mut Value,
    hops: &[Property],
    value: Value,
    source: &Value,
    nested: &dyn NestedMapper,
    context: &mut MappingContext,
) -> Result<()> {
    let Some((tail, path)) = hops.split_last() else {
        return Ok(());
    };
    let mut current = destination;
    for hop in path {
        let missing = current
            .read(hop.accessor())
            .is_none_or(|existing| existing.is_null());
        if missing {
            let created = nested
                .object_factory()
                .new_instance(hop.value_type(), source, context)?;
            current.write(hop.accessor(), created)?;
        }
        current = current
            .slot_mut(hop.accessor())
            .ok_or_else(|| Error::mismatch(hop.value_type(), "an unaddressable value"))?;
    }
    current.write(tail.accessor(), value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;
    use crate::mapping::ClassMapBuilder;
    use crate::metadata::{RawKind, TypeDescriptor, TypeFactory};
    use crate::property::{NameMatching, PropertyResolver};
    use crate::runtime::{Converter, DefaultObjectFactory, ObjectFactory, ToStringConverter};

    struct CloningMapper {
        types:     Arc<TypeFactory>,
        map_nulls: bool,
    }

    impl NestedMapper for CloningMapper {
        fn map_nested(
            &self,
            source: &Value,
            _source_type: &TypeDescriptor,
            _destination_type: &TypeDescriptor,
            _context: &mut MappingContext,
        ) -> Result<Value> {
            Ok(source.clone())
        }

        fn find_converter(
            &self,
            _source: &TypeDescriptor,
            _destination: &TypeDescriptor,
            id: Option<&str>,
        ) -> Option<Arc<dyn Converter>> {
            (id == Some("text")).then(|| Arc::new(ToStringConverter) as Arc<dyn Converter>)
        }

        fn object_factory(&self) -> &dyn ObjectFactory { &DefaultObjectFactory }

        fn types(&self) -> &TypeFactory { &self.types }

        fn map_nulls(&self) -> bool { self.map_nulls }
    }

    fn setup() -> (Arc<PropertyResolver>, MappingPlan) {
        let types = Arc::new(TypeFactory::new());
        types
            .register(RawKind::structure("Name").field("first", "String").field("last", "String"))
            .unwrap();
        types
            .register(
                RawKind::structure("Person")
                    .field("name", "Name")
                    .field("age", "i64"),
            )
            .unwrap();
        types
            .register(
                RawKind::structure("PersonDto")
                    .field("names", "Map<String, String>")
                    .field("age", "String"),
            )
            .unwrap();
        let resolver = Arc::new(PropertyResolver::new(Arc::clone(&types), NameMatching::Exact));
        let class_map = ClassMapBuilder::new(
            Arc::clone(&resolver),
            types.value_of("Person").unwrap(),
            types.value_of("PersonDto").unwrap(),
        )
        .field("name.first", "names['first']")
        .unwrap()
        .field("name.last", "names['last']")
        .unwrap()
        .field_with_converter("age", "age", "text")
        .unwrap()
        .build();
        (resolver, class_map.plan_a_to_b())
    }

    #[test]
    fn test_plan_creates_intermediate_destinations() {
        let (resolver, plan) = setup();
        let provider = InterpretingMapperProvider::new();
        let mapper = provider.get_or_build(&plan).unwrap();
        let nested = CloningMapper {
            types:     Arc::clone(resolver.types()),
            map_nulls: true,
        };

        let person = Value::object("Person")
            .with("name", Value::object("Name").with("first", "Chuck").with("last", "Testa"))
            .with("age", 42_i64);
        let mut dto = Value::object("PersonDto");
        mapper
            .map_into(&person, &mut dto, &nested, &mut MappingContext::new(8))
            .unwrap();

        assert_eq!(
            serde_json::Value::from(&dto),
            serde_json::json!({"names": {"first": "Chuck", "last": "Testa"}, "age": "42"})
        );
        assert_eq!(provider.built(), 1);
    }

    #[test]
    fn test_null_intermediate_skips_and_map_nulls_is_respected() {
        let (resolver, plan) = setup();
        let mapper = InterpretingMapperProvider::new().get_or_build(&plan).unwrap();
        let person = Value::object("Person").with("age", Value::Null);

        let skip_nulls = CloningMapper {
            types:     Arc::clone(resolver.types()),
            map_nulls: false,
        };
        let mut dto = Value::object("PersonDto");
        mapper
            .map_into(&person, &mut dto, &skip_nulls, &mut MappingContext::new(8))
            .unwrap();
        assert_eq!(dto, Value::object("PersonDto"));

        let write_nulls = CloningMapper {
            types:     Arc::clone(resolver.types()),
            map_nulls: true,
        };
        let mut dto = Value::object("PersonDto");
        mapper
            .map_into(&person, &mut dto, &write_nulls, &mut MappingContext::new(8))
            .unwrap();
        assert_eq!(dto, Value::object("PersonDto").with("age", Value::Null));
    }
}
