//! Type and property metadata
//!
//! Shapes are described by raw kinds registered with a [`TypeFactory`], which
//! interns [`TypeDescriptor`]s. Properties describe how to reach a value
//! inside a shape; [`NestedProperty`] keeps chained hops flat.

mod nested_property;
mod property;
mod property_builder;
mod raw_kind;
mod type_descriptor;
mod type_factory;
mod type_kind;
pub mod type_parser;

pub use nested_property::{NestedProperty, PropertyRef, collapse};
pub use property::{Accessor, MapKey, Property};
pub use property_builder::PropertyBuilder;
pub use raw_kind::{FieldDecl, RawKind};
pub use type_descriptor::TypeDescriptor;
pub use type_factory::TypeFactory;
pub use type_kind::TypeKind;
