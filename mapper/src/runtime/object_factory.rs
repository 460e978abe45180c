//! Default creation of destination values

use std::collections::BTreeMap;

use super::collaborators::ObjectFactory;
use super::context::MappingContext;
use super::value::Value;
use crate::error::{Error, Result};
use crate::metadata::{TypeDescriptor, TypeKind};

/// Creates empty structs and containers from their descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultObjectFactory;

impl ObjectFactory for DefaultObjectFactory {
    fn new_instance(
        &self,
        destination: &TypeDescriptor,
        _source: &Value,
        _context: &mut MappingContext,
    ) -> Result<Value> {
        match destination.kind() {
            TypeKind::Struct => Ok(Value::object(destination.name())),
            TypeKind::Map => Ok(Value::Map(BTreeMap::new())),
            TypeKind::List | TypeKind::Collection => Ok(Value::List(Vec::new())),
            TypeKind::Set => Ok(Value::Set(Vec::new())),
            TypeKind::Array => Ok(Value::Array(Vec::new())),
            kind => Err(Error::instantiation(
                destination,
                format!("{kind} kinds have no empty instance"),
            )
            .into()),
        }
    }
}
