//! Default-field suggestors
//!
//! When the default pass finds no same-named property on the other shape, it
//! offers the unmatched name to each suggestor in order. The first proposal
//! that names an unmapped property of the other shape is taken.

use std::fmt;

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::metadata::TypeDescriptor;

/// Proposes a destination name for an unmatched source property
pub trait DefaultFieldSuggestor: Send + Sync {
    /// Suggest a name on the other shape, or `None` to pass
    fn suggest(&self, name: &str, value_type: &TypeDescriptor) -> Option<String>;
}

impl<F> DefaultFieldSuggestor for F
where
    F: Fn(&str, &TypeDescriptor) -> Option<String> + Send + Sync,
{
    fn suggest(&self, name: &str, value_type: &TypeDescriptor) -> Option<String> {
        self(name, value_type)
    }
}

/// Naming conventions understood by [`CaseConventionSuggestor`]
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaseConvention {
    /// `user_name`
    Snake,
    /// `userName`
    Camel,
    /// `UserName`
    Pascal,
    /// `user-name`
    Kebab,
    /// `USER_NAME`
    ShoutySnake,
}

impl CaseConvention {
    /// Rewrite `name` in this convention
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Snake => name.to_snake_case(),
            Self::Camel => name.to_lower_camel_case(),
            Self::Pascal => name.to_upper_camel_case(),
            Self::Kebab => name.to_kebab_case(),
            Self::ShoutySnake => name.to_shouty_snake_case(),
        }
    }
}

/// Suggests the same name rewritten in another case convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseConventionSuggestor {
    convention: CaseConvention,
}

impl CaseConventionSuggestor {
    /// Suggest names in `convention`
    pub const fn new(convention: CaseConvention) -> Self { Self { convention } }
}

impl DefaultFieldSuggestor for CaseConventionSuggestor {
    fn suggest(&self, name: &str, _value_type: &TypeDescriptor) -> Option<String> {
        let converted = self.convention.apply(name);
        (converted != name).then_some(converted)
    }
}

/// Whether [`PrefixSuggestor`] adds or removes its prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixMode {
    /// `name` becomes `{prefix}name`
    Add,
    /// `{prefix}name` becomes `name`
    Strip,
}

/// Suggests the name with a fixed prefix added or removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixSuggestor {
    prefix: String,
    mode:   PrefixMode,
}

impl PrefixSuggestor {
    /// Suggest `{prefix}name` for every `name`
    pub fn add(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            mode:   PrefixMode::Add,
        }
    }

    /// Suggest `name` for every `{prefix}name`
    pub fn strip(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            mode:   PrefixMode::Strip,
        }
    }
}

impl DefaultFieldSuggestor for PrefixSuggestor {
    fn suggest(&self, name: &str, _value_type: &TypeDescriptor) -> Option<String> {
        match self.mode {
            PrefixMode::Add => Some(format!("{}{name}", self.prefix)),
            PrefixMode::Strip => name
                .strip_prefix(self.prefix.as_str())
                .filter(|rest| !rest.is_empty())
                .map(ToString::to_string),
        }
    }
}

impl fmt::Debug for dyn DefaultFieldSuggestor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("DefaultFieldSuggestor") }
}
