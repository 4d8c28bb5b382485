//! Entity capability contract.
//!
//! # Responsibility
//! - Define what a type must expose to be kept in an entity store.
//! - Provide the value type used by field-equality search.
//!
//! # Invariants
//! - `id()` is `None` until a store assigns one.
//! - `field()` never fails: unknown names and absent values are `None`.
//! - `FIELDS` lists every name `field()` can answer, without duplicates.

use crate::model::business::TimeOfDay;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-issued identifier. Starts at 1 and is never reused.
pub type EntityId = u64;

/// Field value compared by `find_by_field`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    Time(TimeOfDay),
    Id(EntityId),
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Time(value) => write!(f, "{value}"),
            Self::Id(value) => write!(f, "#{value}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<TimeOfDay> for FieldValue {
    fn from(value: TimeOfDay) -> Self {
        Self::Time(value)
    }
}

/// Capability every storable type implements.
///
/// Replaces runtime accessor lookup: the compiler guarantees `set_id` exists,
/// and `field` answers named reads for `find_by_field`.
pub trait Entity: Clone {
    /// Short type label used in logs and errors.
    const KIND: &'static str;
    /// Names accepted by [`Entity::field`].
    const FIELDS: &'static [&'static str];

    fn id(&self) -> Option<EntityId>;
    fn set_id(&mut self, id: EntityId);

    /// Reads one named field.
    ///
    /// Returns `None` when `name` is not a field of this type or when the
    /// field holds no value.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// Structural problems that make a type unusable as a store entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    EmptyKind,
    NoFields,
    BlankFieldName,
    DuplicateField(&'static str),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKind => write!(f, "entity kind label is empty"),
            Self::NoFields => write!(f, "entity declares no readable fields"),
            Self::BlankFieldName => write!(f, "entity declares a blank field name"),
            Self::DuplicateField(name) => write!(f, "entity declares field `{name}` twice"),
        }
    }
}

impl Error for SchemaError {}

/// Checks the declared shape of `T` once, before any store for it exists.
pub fn check_schema<T: Entity>() -> Result<(), SchemaError> {
    if T::KIND.trim().is_empty() {
        return Err(SchemaError::EmptyKind);
    }
    if T::FIELDS.is_empty() {
        return Err(SchemaError::NoFields);
    }

    for (index, name) in T::FIELDS.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(SchemaError::BlankFieldName);
        }
        if T::FIELDS[..index].contains(name) {
            return Err(SchemaError::DuplicateField(*name));
        }
    }

    Ok(())
}
