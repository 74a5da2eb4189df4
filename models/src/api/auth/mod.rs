use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use typed_builder::TypedBuilder;

use crate::Role;

/// Body of `POST /api/auth/login`. The user picks the role they are logging
/// in as on the login page, and that role has to match the one they are
/// registered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
	/// The email the account was created with
	#[builder(setter(into))]
	pub email: String,
	/// The password of the account. Verified by the auth provider and never
	/// stored by the API
	#[builder(setter(into))]
	pub password: String,
	/// The role the user selected while logging in
	pub role: Role,
}

/// Response of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
	/// The role the user was authenticated as
	pub role: Role,
	/// Where the client should navigate to next, `/{role}-dashboard`
	pub redirect: String,
	/// Signed token identifying the session. Also set as the `session` cookie
	pub access_token: String,
}

/// Response of `GET /api/auth/session`, describing the current session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
	/// The email of the logged in user
	pub email: String,
	/// The role the session was authenticated as
	pub role: Role,
	/// When the session stops being valid
	#[serde(with = "time::serde::rfc3339")]
	pub expires_at: OffsetDateTime,
}

/// Profile shown on a dashboard once the route guard lets the user through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
	/// The role of the dashboard
	pub role: Role,
	/// The email of the logged in user
	pub email: String,
	/// The display name from the role record, if it has one
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// The full role record as stored, for the dashboard to render
	pub profile: serde_json::Value,
}

#[cfg(test)]
mod tests {
	use serde_test::{assert_de_tokens, Token};

	use super::*;

	#[test]
	fn login_request_uses_camel_case_and_lowercase_role() {
		assert_de_tokens(
			&LoginRequest::builder()
				.email("jane@x.com")
				.password("hunter42")
				.role(Role::Student)
				.build(),
			&[
				Token::Struct {
					name: "LoginRequest",
					len: 3,
				},
				Token::Str("email"),
				Token::Str("jane@x.com"),
				Token::Str("password"),
				Token::Str("hunter42"),
				Token::Str("role"),
				Token::UnitVariant {
					name: "Role",
					variant: "student",
				},
				Token::StructEnd,
			],
		);
	}

	#[test]
	fn login_response_fields() {
		let response = LoginResponse {
			role: Role::Admin,
			redirect: Role::Admin.dashboard_path(),
			access_token: "token".to_string(),
		};
		let json = serde_json::to_value(&response).unwrap();
		assert_eq!(json["redirect"], "/admin-dashboard");
		assert_eq!(json["accessToken"], "token");
		assert_eq!(json["role"], "admin");
	}
}
