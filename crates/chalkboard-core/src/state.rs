//! Persisted drawing state.

use crate::camera::Viewport;
use crate::elements::Element;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Errors while decoding a persisted record.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid state: {0}")]
    Invalid(String),
}

/// The record stored per document id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport_hint: Option<Viewport>,
}

impl PersistedState {
    pub fn new(elements: Vec<Element>, viewport_hint: Option<Viewport>) -> Self {
        Self {
            elements,
            viewport_hint,
        }
    }

    /// Decode a record, dropping elements that fail to parse.
    ///
    /// Only a record that is not an object, or whose `elements` is not an
    /// array, is an error. The result is already sanitized.
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(mut map) = value else {
            return Err(StateError::Invalid("record is not an object".to_string()));
        };

        let elements = match map.remove("elements") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .filter_map(|(index, item)| match serde_json::from_value::<Element>(item) {
                    Ok(element) => Some(element),
                    Err(e) => {
                        log::warn!("Dropping unreadable element #{}: {}", index, e);
                        None
                    }
                })
                .collect(),
            Some(_) => {
                return Err(StateError::Invalid("elements is not an array".to_string()));
            }
        };

        let viewport_hint = match map.remove("viewportHint") {
            None | Some(Value::Null) => None,
            Some(hint) => match serde_json::from_value::<Viewport>(hint) {
                Ok(viewport) => Some(viewport),
                Err(e) => {
                    log::warn!("Ignoring unreadable viewport hint: {}", e);
                    None
                }
            },
        };

        Ok(Self::new(elements, viewport_hint).sanitized())
    }

    /// Encode the record as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Drop invalid or duplicate elements and clamp the viewport hint.
    pub fn sanitized(self) -> Self {
        let mut seen = HashSet::new();
        let elements = self
            .elements
            .into_iter()
            .filter(|element| {
                if !element.is_valid() {
                    log::warn!("Dropping invalid element {}", element.id());
                    return false;
                }
                if !seen.insert(element.id()) {
                    log::warn!("Dropping duplicate element {}", element.id());
                    return false;
                }
                true
            })
            .collect();
        let viewport_hint = self
            .viewport_hint
            .map(|v| Viewport::sanitized(v.x, v.y, v.scale));
        Self {
            elements,
            viewport_hint,
        }
    }
}
