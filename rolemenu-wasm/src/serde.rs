// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::de::DeserializeOwned;
use serde::ser::Serialize;
use serde_wasm_bindgen::{Error, Serializer};
use wasm_bindgen::JsValue;

/// Serialize any struct into JavaScript values.
///
/// Note that this will NOT serialize into a JSON string but an actual JavaScript object. Maps
/// become plain objects so the tree widget can consume them directly.
pub fn serialize_to_js<T>(value: &T) -> Result<JsValue, Error>
where
    T: Serialize + ?Sized,
{
    let serializer = Serializer::new()
        .serialize_large_number_types_as_bigints(true)
        .serialize_maps_as_objects(true);
    value.serialize(&serializer)
}

/// Deserialize a JavaScript value into any struct.
pub fn deserialize_from_js<T>(value: JsValue) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    serde_wasm_bindgen::from_value(value)
}
