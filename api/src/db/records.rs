//! Helpers for reading loosely shaped documents. Records written by older
//! versions of the site do not always agree on field names or types, so
//! every read goes through these instead of trusting the stored JSON.

use serde_json::Value;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use super::{Document, Fields};

/// The first of the given fields that holds a non-empty string
pub fn first_string(fields: &Fields, names: &[&str]) -> Option<String> {
	names.iter().find_map(|name| {
		fields
			.get(*name)
			.and_then(Value::as_str)
			.map(str::trim)
			.filter(|value| !value.is_empty())
			.map(str::to_string)
	})
}

/// Reads a field that is either a string or a number as a string. Numeric
/// identifiers such as PRNs and class numbers were stored both ways.
pub fn string_or_number(fields: &Fields, name: &str) -> Option<String> {
	match fields.get(name)? {
		Value::String(string) => Some(string.clone()),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

/// Reads an RFC 3339 timestamp, either as a string or as a typed timestamp
/// from the document database. Anything else is treated as missing.
pub fn timestamp(fields: &Fields, name: &str) -> Option<OffsetDateTime> {
	let value = match fields.get(name)? {
		Value::String(value) => value.as_str(),
		Value::Object(typed) => typed.get("timestampValue")?.as_str()?,
		_ => return None,
	};
	OffsetDateTime::parse(value, &Rfc3339).ok()
}

/// Formats a timestamp the way it is written to documents
pub fn format_timestamp(value: OffsetDateTime) -> Value {
	value
		.format(&Rfc3339)
		.map(Value::String)
		.unwrap_or(Value::Null)
}

/// The whole document as a JSON value, with its ID included as `id`
pub fn document_to_value(document: &Document) -> Value {
	let mut fields = document.fields.clone();
	fields
		.entry("id")
		.or_insert_with(|| Value::String(document.id.clone()));
	Value::Object(fields)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn fields(value: Value) -> Fields {
		value.as_object().cloned().unwrap()
	}

	#[test]
	fn first_string_skips_blank_and_non_string_values() {
		let fields = fields(json!({ "name": "  ", "fullName": 4, "displayName": "Jane" }));
		assert_eq!(
			first_string(&fields, &["name", "fullName", "displayName"]),
			Some("Jane".to_string())
		);
		assert_eq!(first_string(&fields, &["missing"]), None);
	}

	#[test]
	fn numbers_are_read_as_strings() {
		let fields = fields(json!({ "PrnNumber": 12345, "other": "12" }));
		assert_eq!(string_or_number(&fields, "PrnNumber"), Some("12345".into()));
		assert_eq!(string_or_number(&fields, "other"), Some("12".into()));
	}

	#[test]
	fn timestamps_round_trip() {
		let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
		let fields = fields(json!({ "lastLogin": format_timestamp(now), "bad": "yesterday" }));
		assert_eq!(timestamp(&fields, "lastLogin"), Some(now));
		assert_eq!(timestamp(&fields, "bad"), None);

		let typed = self::fields(json!({
			"createdAt": { "timestampValue": "2023-11-14T22:13:20Z" }
		}));
		assert_eq!(timestamp(&typed, "createdAt"), Some(now));
	}
}
