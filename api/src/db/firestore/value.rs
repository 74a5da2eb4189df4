//! Conversion between plain JSON and the typed value encoding used by the
//! Firestore REST API, where every value is wrapped in an object naming its
//! type (`{"stringValue": "..."}`, `{"mapValue": {"fields": {...}}}`, ...).

use serde_json::{json, Map, Value};

/// Firestore types with no plain JSON form. These are kept as the typed value
/// itself, such as `{"timestampValue": "..."}`, and written back unchanged,
/// so that rewriting a document does not turn them into strings or maps.
const PASS_THROUGH_TYPES: [&str; 4] = [
	"timestampValue",
	"referenceValue",
	"bytesValue",
	"geoPointValue",
];

/// Whether an object is a typed value kept from a decoded document
fn is_pass_through(fields: &Map<String, Value>) -> bool {
	fields.len() == 1 &&
		fields
			.keys()
			.next()
			.is_some_and(|kind| PASS_THROUGH_TYPES.contains(&kind.as_str()))
}

/// Encodes a JSON value into a Firestore value
pub fn encode(value: &Value) -> Value {
	match value {
		Value::Null => json!({ "nullValue": null }),
		Value::Bool(boolean) => json!({ "booleanValue": boolean }),
		Value::Number(number) => {
			if let Some(integer) = number.as_i64() {
				// 64 bit integers are sent as strings to avoid precision loss
				json!({ "integerValue": integer.to_string() })
			} else {
				json!({ "doubleValue": number.as_f64() })
			}
		}
		Value::String(string) => json!({ "stringValue": string }),
		Value::Array(values) => json!({
			"arrayValue": { "values": values.iter().map(encode).collect::<Vec<_>>() }
		}),
		Value::Object(fields) if is_pass_through(fields) => value.clone(),
		Value::Object(fields) => json!({ "mapValue": { "fields": encode_fields(fields) } }),
	}
}

/// Encodes the fields of a document
pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
	fields
		.iter()
		.map(|(name, value)| (name.clone(), encode(value)))
		.collect()
}

/// Decodes a Firestore value into plain JSON. Timestamps, references, bytes
/// and geo points come back as their typed value. Returns an error naming the
/// offending type when the value is not a known encoding.
pub fn decode(value: &Value) -> Result<Value, String> {
	let object = value
		.as_object()
		.ok_or_else(|| format!("expected a typed value, found `{value}`"))?;
	let (kind, inner) = object
		.iter()
		.next()
		.ok_or_else(|| "empty typed value".to_string())?;

	Ok(match kind.as_str() {
		"nullValue" => Value::Null,
		"booleanValue" => Value::Bool(inner.as_bool().unwrap_or_default()),
		"integerValue" => {
			let integer = match inner {
				Value::String(string) => string
					.parse::<i64>()
					.map_err(|err| format!("invalid integerValue `{string}`: {err}"))?,
				Value::Number(number) => number
					.as_i64()
					.ok_or_else(|| format!("invalid integerValue `{number}`"))?,
				other => return Err(format!("invalid integerValue `{other}`")),
			};
			Value::from(integer)
		}
		"doubleValue" => match inner {
			Value::Number(number) => Value::Number(number.clone()),
			// NaN and the infinities are sent as strings and have no JSON form
			_ => Value::Null,
		},
		"stringValue" => inner.clone(),
		kind if PASS_THROUGH_TYPES.contains(&kind) => json!({ kind: inner }),
		"arrayValue" => Value::Array(
			inner
				.get("values")
				.and_then(Value::as_array)
				.map(|values| values.iter().map(decode).collect::<Result<Vec<_>, _>>())
				.transpose()?
				.unwrap_or_default(),
		),
		"mapValue" => Value::Object(
			inner
				.get("fields")
				.and_then(Value::as_object)
				.map(decode_fields)
				.transpose()?
				.unwrap_or_default(),
		),
		unknown => return Err(format!("unknown value type `{unknown}`")),
	})
}

/// Decodes the fields of a document
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, String> {
	fields
		.iter()
		.map(|(name, value)| Ok((name.clone(), decode(value)?)))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn encodes_nested_documents() {
		let encoded = encode(&json!({
			"PrnNumber": "12345",
			"courses": [{ "classNumber": 4, "fee": 1.5 }],
			"active": true,
		}));
		assert_eq!(
			encoded,
			json!({
				"mapValue": { "fields": {
					"PrnNumber": { "stringValue": "12345" },
					"courses": { "arrayValue": { "values": [
						{ "mapValue": { "fields": {
							"classNumber": { "integerValue": "4" },
							"fee": { "doubleValue": 1.5 },
						} } }
					] } },
					"active": { "booleanValue": true },
				} }
			})
		);
	}

	#[test]
	fn decodes_what_firestore_returns() {
		let decoded = decode_fields(
			json!({
				"email": { "stringValue": "jane@x.com" },
				"lastLogin": { "timestampValue": "2024-05-01T10:00:00.123Z" },
				"courses": { "arrayValue": {} },
				"profile": { "mapValue": {} },
				"age": { "integerValue": "14" },
				"nothing": { "nullValue": null },
			})
			.as_object()
			.unwrap(),
		)
		.unwrap();

		assert_eq!(
			Value::Object(decoded),
			json!({
				"email": "jane@x.com",
				"lastLogin": { "timestampValue": "2024-05-01T10:00:00.123Z" },
				"courses": [],
				"profile": {},
				"age": 14,
				"nothing": null,
			})
		);
	}

	#[test]
	fn rewriting_a_course_list_keeps_field_types() {
		let stored = json!({
			"courses": { "arrayValue": { "values": [
				{ "mapValue": { "fields": {
					"courseName": { "stringValue": "Drones" },
					"classNumber": { "integerValue": "2" },
					"startDate": { "timestampValue": "2024-05-01T10:00:00Z" },
					"trainer": { "referenceValue": "projects/academy/databases/(default)/documents/trainers/sam" },
					"certificate": { "bytesValue": "aGVsbG8=" },
					"venue": { "geoPointValue": { "latitude": 18.52, "longitude": 73.85 } },
				} } }
			] } }
		});
		let stored = stored.as_object().unwrap();

		let decoded = decode_fields(stored).unwrap();
		assert_eq!(
			decoded["courses"][0]["startDate"],
			json!({ "timestampValue": "2024-05-01T10:00:00Z" })
		);
		assert_eq!(&encode_fields(&decoded), stored);
	}

	#[test]
	fn rejects_unknown_types() {
		assert!(decode(&json!({ "mysteryValue": 1 })).is_err());
		assert!(decode(&json!("bare")).is_err());
		assert!(decode(&json!({ "integerValue": "four" })).is_err());
	}
}
