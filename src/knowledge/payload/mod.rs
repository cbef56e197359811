
use serde_json::{Map, Value};
use tracing::debug;

use super::entity::{KnowledgeCollection, KnowledgeEntity};
use crate::{PortalError, Result};

/// Shape of the `/api/knowledge` response body after unwrapping an optional
/// `{ "data": ... }` envelope
#[derive(Debug)]
enum KnowledgePayload {
    List(Vec<Value>),
    Keyed(Map<String, Value>),
}

impl KnowledgePayload {
    fn classify(body: Value) -> Result<Self> {
        let entries = match body {
            Value::Object(mut envelope) if envelope.contains_key("data") => {
                envelope.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        };

        match entries {
            Value::Array(items) => Ok(Self::List(items)),
            Value::Object(map) => Ok(Self::Keyed(map)),
            other => Err(PortalError::Payload(format!(
                "expected an array or object of knowledge entries, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn into_collection(self) -> KnowledgeCollection {
        let items: Vec<Value> = match self {
            Self::List(items) => items,
            Self::Keyed(map) => map.into_iter().map(|(_, v)| v).collect(),
        };

        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<KnowledgeEntity>(item) {
                Ok(entity) if !entity.id.is_empty() => Some(entity),
                Ok(_) => {
                    debug!("Skipping knowledge entry without an id");
                    None
                }
                Err(e) => {
                    debug!("Skipping malformed knowledge entry: {}", e);
                    None
                }
            })
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a knowledge collection response.
///
/// Accepts a bare array of entities, a `{ "data": [...] }` envelope, or an
/// object keyed by id (bare or enveloped). Individual entries that are
/// malformed or lack an id are skipped.
#[inline]
pub fn parse_collection(body: &str) -> Result<KnowledgeCollection> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| PortalError::Payload(format!("invalid JSON: {}", e)))?;

    Ok(KnowledgePayload::classify(value)?.into_collection())
}
