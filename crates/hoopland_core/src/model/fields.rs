use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Reads typed fields out of a raw record object.
///
/// A field whose value has the wrong JSON type reads as `None` and stays in
/// the leftover map, so it is written back exactly as it was loaded.
pub(crate) struct RecordFields {
    raw: Map<String, Value>,
    taken: Vec<&'static str>,
}

impl RecordFields {
    pub(crate) fn new(raw: Map<String, Value>) -> Self {
        Self {
            raw,
            taken: Vec::new(),
        }
    }

    pub(crate) fn typed<T: DeserializeOwned>(&mut self, key: &'static str) -> Option<T> {
        let parsed = T::deserialize(self.raw.get(key)?).ok()?;
        self.taken.push(key);
        Some(parsed)
    }

    /// Keys that were not read into a typed field, in their original order.
    pub(crate) fn into_extra(self) -> Map<String, Value> {
        let taken = self.taken;
        self.raw
            .into_iter()
            .filter(|(key, _)| !taken.contains(&key.as_str()))
            .collect()
    }
}

/// Drops a raw copy of `key` once the typed field for it has been set.
pub(crate) fn clear_raw(extra: &mut Map<String, Value>, key: &str) {
    extra.retain(|k, _| k != key);
}
