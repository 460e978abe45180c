//! # Shape Mapper
//!
//! Structural mapping between independently defined shapes. Shapes are
//! registered as raw kinds; the mapper resolves, once per source and
//! destination pair, how fields and elements correspond and caches that
//! resolution for every later call.
//!
//! # Usage
//!
//! ```no_run
//! use shape_mapper::{MapperConfig, MapperFactory, RawKind, Value};
//!
//! # fn main() -> shape_mapper::Result<()> {
//! let factory = MapperFactory::new(MapperConfig::default());
//! factory.register_kind(RawKind::structure("Name").field("first", "String").field("last", "String"))?;
//! factory.register_kind(RawKind::structure("Person").field("name", "Name"))?;
//! factory.register_kind(RawKind::structure("PersonDto").field("names", "Map<String, String>"))?;
//!
//! let class_map = factory
//!     .class_map("Person", "PersonDto")?
//!     .field("name.first", "names['first']")?
//!     .field("name.last", "names['last']")?
//!     .build();
//! factory.register_class_map(class_map);
//!
//! let person = Value::object("Person")
//!     .with("name", Value::object("Name").with("first", "Chuck").with("last", "Testa"));
//! let dto = factory.facade().map(&person, "PersonDto")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Layers
//!
//! - [`metadata`]: raw kinds, interned type descriptors, properties and nested paths
//! - [`property`]: path expressions and the property resolver
//! - [`mapping`]: class maps, their builder and default matching
//! - [`strategy`]: strategy keys, resolution and the strategy cache
//! - [`runtime`]: dynamic values and the collaborators strategies drive
//! - [`facade`]: the factory and facade callers use
//!
//! Events are emitted with `tracing`; [`support`] installs an optional file
//! subscriber whose level can change at runtime.

mod config;
mod constants;
mod error;

pub mod facade;
pub mod mapping;
pub mod metadata;
pub mod property;
pub mod runtime;
pub mod strategy;
pub mod support;

pub use config::MapperConfig;
pub use error::{Error, Result};
pub use facade::{MapperFacade, MapperFactory, MapperFactoryBuilder};
pub use metadata::{RawKind, TypeDescriptor, TypeFactory};
pub use property::NameMatching;
pub use runtime::Value;
