use serde_json::Value;
use thiserror::Error;

use crate::sanitize::sanitize;
use crate::types::NormalizedError;

/// Reserved prefix the validator puts on its own field names.
pub const KEY_MARKER: char = '#';

/// Canonical name of the human-readable field that may carry markup.
pub const MESSAGE_KEY: &str = "message";

#[derive(Error, Debug)]
pub enum NormalizeError {
	#[error("malformed error record: expected an object, got {0}")]
	NotAnObject(&'static str),
}

/// Strips one leading reserved marker from a validator key.
pub fn canonical_key(key: &str) -> &str {
	key.strip_prefix(KEY_MARKER).unwrap_or(key)
}

pub fn normalize(raw: &Value) -> Result<NormalizedError, NormalizeError> {
	let record = raw
		.as_object()
		.ok_or_else(|| NormalizeError::NotAnObject(json_kind(raw)))?;

	let mut normalized = NormalizedError::new();
	for (key, value) in record {
		let key = canonical_key(key);
		let value = match value {
			Value::String(text) if key == MESSAGE_KEY => Value::String(sanitize(text)),
			other => other.clone(),
		};
		normalized.insert(key.to_string(), value);
	}

	Ok(normalized)
}

/// Normalizes every record, failing on the first one that is not a mapping.
pub fn normalize_all(raw: &[Value]) -> Result<Vec<NormalizedError>, NormalizeError> {
	raw.iter().map(normalize).collect()
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
