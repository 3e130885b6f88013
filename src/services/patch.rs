use serde::{Deserialize, Deserializer};

/// Three-state patch value for a partially-updatable field: the field was
/// absent from the request (`Keep`), explicitly null (`Clear`), or supplied
/// with a value (`Set`).
///
/// Deserialization relies on `#[serde(default)]` at the containing struct:
/// a missing field never reaches `deserialize`, so it stays `Keep`; a
/// present field maps null to `Clear` and anything else to `Set`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldPatch<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldPatch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => FieldPatch::Set(value),
            None => FieldPatch::Clear,
        })
    }
}

/// A partial update against one item. Only supplied fields change; `name`
/// and `done` are two-state because neither can be cleared.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: FieldPatch<String>,
    pub quantity: FieldPatch<f64>,
    pub unit: FieldPatch<String>,
    pub done: Option<bool>,
}
