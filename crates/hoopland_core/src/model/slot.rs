use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A list entry that is either a readable record or a value kept verbatim
/// (`null`, a non-object, or an object without a usable `id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slot<T> {
    Record(T),
    Opaque(Value),
}

impl<T: DeserializeOwned> Slot<T> {
    pub fn from_value(value: &Value) -> Self {
        match T::deserialize(value) {
            Ok(record) => Self::Record(record),
            Err(_) => Self::Opaque(value.clone()),
        }
    }

    pub fn list_from(value: Option<&Value>) -> Vec<Self> {
        value
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Self::from_value).collect())
            .unwrap_or_default()
    }
}

impl<T> Slot<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Self::Record(record) => Some(record),
            Self::Opaque(_) => None,
        }
    }

    pub fn into_record(self) -> Option<T> {
        match self {
            Self::Record(record) => Some(record),
            Self::Opaque(_) => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }
}

impl<T> From<T> for Slot<T> {
    fn from(record: T) -> Self {
        Self::Record(record)
    }
}
