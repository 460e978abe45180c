//! Dynamic values mapped by the runtime
//!
//! Struct values are reference counted: cloning one shares it, and the shared
//! allocation is the identity the mapping context uses to reuse results.
//! Writes go through copy-on-write.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::constants::{
    KIND_ARRAY, KIND_BOOL, KIND_F64, KIND_I64, KIND_LIST, KIND_MAP, KIND_OBJECT, KIND_SET, KIND_STRING,
};
use crate::error::{Error, Result};
use crate::metadata::{Accessor, TypeDescriptor, TypeFactory};

/// A struct value: its shape name and named fields
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    /// Raw kind name of the value
    pub shape:  String,
    /// Field values by name
    pub fields: BTreeMap<String, Value>,
}

/// A dynamically shaped value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// `bool`
    Bool(bool),
    /// `i64`
    Int(i64),
    /// `f64`
    Float(f64),
    /// `String`
    Str(String),
    /// Constant of an enum kind
    Enum {
        /// Enum kind name
        shape:    String,
        /// Constant name
        constant: String,
    },
    /// Ordered sequence
    List(Vec<Value>),
    /// Duplicate-free collection, in insertion order
    Set(Vec<Value>),
    /// Fixed-position sequence
    Array(Vec<Value>),
    /// String-keyed entries
    Map(BTreeMap<String, Value>),
    /// Struct value
    Object(Arc<ObjectValue>),
}

impl Value {
    /// An empty struct value of `shape`
    pub fn object(shape: impl Into<String>) -> Self {
        Self::Object(Arc::new(ObjectValue {
            shape:  shape.into(),
            fields: BTreeMap::new(),
        }))
    }

    /// Set a field of a struct value, builder style
    ///
    /// Has no effect on values that are not structs.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Self>) -> Self {
        if let Self::Object(object) = &mut self {
            Arc::make_mut(object).fields.insert(field.into(), value.into());
        }
        self
    }

    /// A map value from `(key, value)` pairs
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// True for `Null`
    pub const fn is_null(&self) -> bool { matches!(self, Self::Null) }

    /// String contents, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Field of a struct value
    pub fn field(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Object(object) => object.fields.get(name),
            _ => None,
        }
    }

    /// Elements of a list, set or array
    pub fn elements(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) | Self::Set(items) | Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Identity of a shared struct value, stable while the value is alive
    pub fn identity(&self) -> Option<usize> {
        match self {
            Self::Object(object) => Some(Arc::as_ptr(object).addr()),
            _ => None,
        }
    }

    /// Runtime shape of the value
    ///
    /// Containers report their raw kind; element types are not inferred.
    pub fn runtime_type(&self, types: &TypeFactory) -> Result<TypeDescriptor> {
        match self {
            Self::Null => types.value_of(KIND_OBJECT),
            Self::Bool(_) => types.value_of(KIND_BOOL),
            Self::Int(_) => types.value_of(KIND_I64),
            Self::Float(_) => types.value_of(KIND_F64),
            Self::Str(_) => types.value_of(KIND_STRING),
            Self::Enum { shape, .. } => types.value_of(shape),
            Self::List(_) => types.value_of(KIND_LIST),
            Self::Set(_) => types.value_of(KIND_SET),
            Self::Array(_) => types.value_of(KIND_ARRAY),
            Self::Map(_) => types.value_of(KIND_MAP),
            Self::Object(object) => types.value_of(&object.shape),
        }
    }

    /// Read the value an accessor addresses; `None` if absent
    pub fn read(&self, accessor: &Accessor) -> Option<Cow<'_, Self>> {
        match (self, accessor) {
            (Self::Object(object), Accessor::Field(name)) => object.fields.get(name).map(Cow::Borrowed),
            (Self::Object(object), Accessor::Class) => Some(Cow::Owned(Self::Str(object.shape.clone()))),
            (Self::Map(entries), Accessor::Key(key)) => entries.get(&key.entry_key()).map(Cow::Borrowed),
            (Self::List(items) | Self::Array(items) | Self::Set(items), Accessor::Index(index)) => {
                items.get(*index).map(Cow::Borrowed)
            }
            _ => None,
        }
    }

    /// Mutable access to an existing slot
    pub fn slot_mut(&mut self, accessor: &Accessor) -> Option<&mut Self> {
        match (self, accessor) {
            (Self::Object(object), Accessor::Field(name)) => Arc::make_mut(object).fields.get_mut(name),
            (Self::Map(entries), Accessor::Key(key)) => entries.get_mut(&key.entry_key()),
            (Self::List(items) | Self::Array(items), Accessor::Index(index)) => items.get_mut(*index),
            _ => None,
        }
    }

    /// Write `value` where the accessor points, growing sequences with nulls
    ///
    /// Fails with a structural mismatch when the accessor does not apply to
    /// this value.
    pub fn write(&mut self, accessor: &Accessor, value: Self) -> Result<()> {
        match (&mut *self, accessor) {
            (Self::Object(object), Accessor::Field(name)) => {
                Arc::make_mut(object).fields.insert(name.clone(), value);
                Ok(())
            }
            (Self::Map(entries), Accessor::Key(key)) => {
                entries.insert(key.entry_key(), value);
                Ok(())
            }
            (Self::List(items) | Self::Array(items), Accessor::Index(index)) => {
                if let Some(slot) = items.get_mut(*index) {
                    *slot = value;
                    return Ok(());
                }
                let grow_by = (index - items.len()).saturating_add(1);
                items
                    .try_reserve(grow_by)
                    .map_err(|e| Error::cannot(&format!("grow sequence to index {index}"), e))?;
                items.resize(*index, Self::Null);
                items.push(value);
                Ok(())
            }
            (target, accessor) => Err(Error::mismatch(
                format!("a value addressable by '{}'", accessor.segment()),
                target.variant_name(),
            )
            .into()),
        }
    }

    const fn variant_name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool(_) => "Bool",
            Self::Int(_) => "Int",
            Self::Float(_) => "Float",
            Self::Str(_) => "Str",
            Self::Enum { .. } => "Enum",
            Self::List(_) => "List",
            Self::Set(_) => "Set",
            Self::Array(_) => "Array",
            Self::Map(_) => "Map",
            Self::Object(_) => "Object",
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self { Self::Bool(value) }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self { Self::Int(value) }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self { Self::Float(value) }
}

impl From<String> for Value {
    fn from(value: String) -> Self { Self::Str(value) }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self { Self::Str(value.to_string()) }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self { Self::List(items) }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Int(n) => Self::from(*n),
            Value::Float(n) => serde_json::Number::from_f64(*n).map_or(Self::Null, Self::Number),
            Value::Str(s) => Self::String(s.clone()),
            Value::Enum { constant, .. } => Self::String(constant.clone()),
            Value::List(items) | Value::Set(items) | Value::Array(items) => {
                Self::Array(items.iter().map(Self::from).collect())
            }
            Value::Map(entries) => Self::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), Self::from(value)))
                    .collect(),
            ),
            Value::Object(object) => Self::Object(
                object
                    .fields
                    .iter()
                    .map(|(key, value)| (key.clone(), Self::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::metadata::MapKey;

    #[test]
    fn test_builder_and_json_view() {
        let person = Value::object("Person").with(
            "name",
            Value::object("Name").with("first", "Chuck").with("last", "Testa"),
        );
        assert_eq!(
            serde_json::Value::from(&person),
            json!({"name": {"first": "Chuck", "last": "Testa"}})
        );
    }

    #[test]
    fn test_read_and_write_through_accessors() {
        let mut names = Value::map([("first", "Chuck")]);
        let first = Accessor::Key(MapKey::Str("first".into()));
        let last = Accessor::Key(MapKey::Str("last".into()));

        assert_eq!(names.read(&first).unwrap().as_str(), Some("Chuck"));
        assert!(names.read(&last).is_none());
        names.write(&last, "Testa".into()).unwrap();
        assert_eq!(names.read(&last).unwrap().as_str(), Some("Testa"));

        let mut list = Value::List(Vec::new());
        list.write(&Accessor::Index(2), Value::Int(7)).unwrap();
        assert_eq!(list, Value::List(vec![Value::Null, Value::Null, Value::Int(7)]));

        let error = Value::Int(1).write(&first, Value::Null).unwrap_err();
        assert!(!error.current_context().is_configuration());
    }

    #[test]
    fn test_unreachable_index_is_an_error() {
        let mut list = Value::List(vec![Value::Int(1)]);
        let far = Accessor::Index(usize::MAX);
        assert!(list.write(&far, Value::Int(2)).is_err());
        assert!(list.write(&Accessor::Index(usize::try_from(i64::MAX).unwrap()), Value::Int(2)).is_err());
        assert_eq!(list, Value::List(vec![Value::Int(1)]));
    }

    #[test]
    fn test_class_placeholder_reads_shape_name() {
        let name = Value::object("Name");
        assert_eq!(
            name.read(&Accessor::Class).unwrap().into_owned(),
            Value::Str("Name".into())
        );
    }

    #[test]
    fn test_clones_share_identity_until_written() {
        let original = Value::object("Name").with("first", "Chuck");
        let mut copy = original.clone();
        assert_eq!(original.identity(), copy.identity());

        copy.write(&Accessor::Field("first".into()), "Bob".into()).unwrap();
        assert_ne!(original.identity(), copy.identity());
        assert_eq!(original.field("first").unwrap().as_str(), Some("Chuck"));
    }
}
