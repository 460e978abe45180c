//! Structural category of a raw kind
//!
//! Every registered kind carries one of these; the category drives capability
//! queries on properties (is it a list? a map key?) and strategy selection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Structural category of a kind, as declared at registration
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "PascalCase")]
#[strum(serialize_all = "PascalCase")]
pub enum TypeKind {
    /// Fixed-position sequence (`Array<T>`)
    Array,
    /// Kind of the `class` placeholder property
    Class,
    /// Abstract supertype of lists and sets
    Collection,
    /// Closed set of named constants
    Enum,
    /// Ordered, index-addressable sequence
    List,
    /// Keyed entries (`Map<K, V>`)
    Map,
    /// Top of the hierarchy
    Object,
    /// Scalars like `bool`, `i64`, `f64`
    Primitive,
    /// Unordered, duplicate-free collection
    Set,
    /// Text
    String,
    /// Named fields
    Struct,
}

impl TypeKind {
    /// Values of immutable kinds may be shared rather than copied
    pub const fn is_immutable(self) -> bool {
        matches!(self, Self::Primitive | Self::String | Self::Enum | Self::Class)
    }

    /// Kinds whose values hold other values addressed by index or key
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            Self::Array | Self::Collection | Self::List | Self::Map | Self::Set
        )
    }

    /// Lists, sets and their abstract supertype
    pub const fn is_collection(self) -> bool {
        matches!(self, Self::Collection | Self::List | Self::Set)
    }

    /// Kinds that expose declared fields as properties
    pub const fn has_fields(self) -> bool { matches!(self, Self::Struct) }
}
