use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Body of `POST /api/registrations`, the public course registration form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub phone: String,
	#[serde(default)]
	pub course_name: String,
	#[serde(default)]
	pub school: Option<String>,
	#[serde(default)]
	pub grade: Option<String>,
}

/// Response of `POST /api/registrations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
	pub id: String,
}

/// A stored registration, as listed to admins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
	pub id: String,
	pub name: String,
	pub email: String,
	pub phone: String,
	pub course_name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub school: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub grade: Option<String>,
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub submitted_at: Option<OffsetDateTime>,
}

/// Response of `GET /api/admin/registrations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRegistrationsResponse {
	pub registrations: Vec<Registration>,
}
