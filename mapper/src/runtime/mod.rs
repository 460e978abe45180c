//! Runtime collaborators: values, context, converters, instantiation and
//! the default plan interpreter

mod collaborators;
mod context;
mod converter;
mod interpreter;
mod object_factory;
mod value;

pub use collaborators::{CompiledMapper, Converter, MapperProvider, NestedMapper, ObjectFactory};
pub use context::MappingContext;
pub use converter::{ConverterRegistry, FromStringConverter, PassThroughConverter, ToStringConverter};
pub use interpreter::{InterpretedMapper, InterpretingMapperProvider};
pub use object_factory::DefaultObjectFactory;
pub use value::{ObjectValue, Value};
