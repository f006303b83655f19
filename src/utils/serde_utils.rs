use serde::{Deserialize, Deserializer};
use serde_json::Value;


pub fn is_null_or_none(value: &Option<Value>) -> bool {
    match value {
        None => true,
        Some(v) => v.is_null(),
    }
}

pub fn option_is_empty<T>(value: &Option<T>) -> bool {
    value.is_none()
}

pub fn vec_is_empty<T>(v: &Vec<T>) -> bool {
    v.is_empty()
}

/// Cloudflare sends `null` for absent lists and strings; treat it as the type's default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
