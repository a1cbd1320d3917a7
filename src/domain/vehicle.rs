use serde::{Deserialize, Deserializer, Serialize};

/// Reads an explicit `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A vehicle listed by the external catalog.
///
/// Every field is optional on the wire. Missing or `null` values fall back
/// to their defaults so a sparse catalog record still renders.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Vehicle {
    #[serde(deserialize_with = "null_as_default")]
    pub vehicle_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub vehicle_no: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vehicle_desc: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vehicle_type_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub driver_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub driver_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub helper_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub helper_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub length: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub width: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub height: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub volume: f64,
}
