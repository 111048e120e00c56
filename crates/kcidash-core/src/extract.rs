//! Best-effort extraction of short display strings from `misc` JSON blobs.

use serde_json::{Map, Value};
use std::borrow::Cow;

/// Placeholder used when a value cannot be extracted.
pub const UNKNOWN_STRING: &str = "unknown";

/// Pulls the failure reason and the platform out of per-row metadata.
///
/// Both operations are total: missing or malformed input yields
/// [`UNKNOWN_STRING`] instead of an error.
pub trait MessageExtractor: Send + Sync {
    fn error_message(&self, misc: Option<&Value>) -> String;
    fn platform(&self, environment_misc: Option<&Value>) -> String;
}

/// Reads `error_msg` from the test `misc` and `platform` from the
/// environment `misc`. Accepts objects or JSON documents stored as strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiscExtractor;

impl MessageExtractor for MiscExtractor {
    fn error_message(&self, misc: Option<&Value>) -> String {
        string_field(misc, "error_msg")
    }

    fn platform(&self, environment_misc: Option<&Value>) -> String {
        string_field(environment_misc, "platform")
    }
}

fn string_field(blob: Option<&Value>, key: &str) -> String {
    blob.and_then(as_object)
        .and_then(|obj| match obj.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_else(|| UNKNOWN_STRING.to_string())
}

fn as_object(v: &Value) -> Option<Cow<'_, Map<String, Value>>> {
    match v {
        Value::Object(obj) => Some(Cow::Borrowed(obj)),
        Value::String(raw) if !raw.trim().is_empty() => {
            match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(obj)) => Some(Cow::Owned(obj)),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(error = %e, "unparseable misc blob, using placeholder");
                    None
                }
            }
        }
        _ => None,
    }
}
