// SPDX-FileCopyrightText: 2023 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Parameter payloads for cloud calls.
//!
//! Parameters are a plain JSON object. Two built-in value types are
//! recognized by their `__type` tag: geographic coordinates ([`GeoPoint`]),
//! which may be passed freely, and references to persisted server-side
//! entities ([`EntityRef`]), which are rejected client-side before any
//! request is sent.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A cloud call parameter payload.
pub type Params = serde_json::Map<String, Value>;

/// A geographic coordinate pair.
///
/// Encodes as `{"__type": "GeoPoint", "latitude": .., "longitude": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__type")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<GeoPoint> for Value {
    fn from(point: GeoPoint) -> Self {
        json!({
            "__type": "GeoPoint",
            "latitude": point.latitude,
            "longitude": point.longitude,
        })
    }
}

/// A reference to a persisted server-side entity.
///
/// Encodes as `{"__type": "Pointer", "className": .., "objectId": ..}`.
/// Such values are not allowed in call parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "__type", rename = "Pointer", rename_all = "camelCase")]
pub struct EntityRef {
    pub class_name: String,
    pub object_id: String,
}

impl EntityRef {
    pub fn new(class_name: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            object_id: object_id.into(),
        }
    }
}

impl From<EntityRef> for Value {
    fn from(entity_ref: EntityRef) -> Self {
        json!({
            "__type": "Pointer",
            "className": entity_ref.class_name,
            "objectId": entity_ref.object_id,
        })
    }
}

/// A call parameter payload contained an entity reference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Entity references are not allowed in call parameters (key \"{key}\")")]
pub struct EntityRefError {
    /// The top-level parameter key under which the reference was found.
    pub key: String,
}

/// Validates that a payload contains no entity references.
///
/// This is a synchronous tree walk; callers run it before a request is
/// constructed, so an offending payload fails without any network attempt.
pub fn reject_entity_refs(params: &Params) -> Result<(), EntityRefError> {
    for (key, value) in params {
        if contains_entity_ref(value) {
            return Err(EntityRefError { key: key.clone() });
        }
    }
    Ok(())
}

fn contains_entity_ref(value: &Value) -> bool {
    match value {
        Value::Object(object) => {
            if let Some(Value::String(tag)) = object.get("__type") {
                if tag == "Pointer" || tag == "Object" {
                    return true;
                }
            }
            object.values().any(contains_entity_ref)
        }
        Value::Array(values) => values.iter().any(contains_entity_ref),
        _ => false,
    }
}
