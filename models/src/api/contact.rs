use serde::{Deserialize, Serialize};

/// Body of `POST /api/send-email`, submitted by the contact form. Fields are
/// optional on the wire so that a missing field is reported with the same
/// message as an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEmailRequest {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub message: Option<String>,
}

/// `{ message }`, returned by the forwarding endpoints on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
	pub message: String,
}

/// `{ error }`, returned by the forwarding endpoints on failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessageResponse {
	pub error: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_fields_deserialize_as_none() {
		let request: SendEmailRequest =
			serde_json::from_str(r#"{"name":"Jane"}"#).unwrap();
		assert_eq!(request.name.as_deref(), Some("Jane"));
		assert_eq!(request.email, None);
		assert_eq!(request.message, None);
	}
}
