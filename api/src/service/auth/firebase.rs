use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use time::Duration;

use super::{AuthProvider, AuthProviderError, ProviderSession};
use crate::prelude::*;

/// Base URL of the identity toolkit REST API
pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Lifetime of an ID token when the provider does not say otherwise
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::hours(1);

/// An [`AuthProvider`] backed by Firebase email/password accounts
#[derive(Debug, Clone)]
pub struct FirebaseAuth {
	client: Client,
	api_key: String,
	base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInWithPasswordRequest<'a> {
	email: &'a str,
	password: &'a str,
	return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInWithPasswordResponse {
	local_id: String,
	email: String,
	id_token: String,
	/// Seconds, sent as a string
	expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
	error: ErrorResponseBody,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseBody {
	message: String,
}

impl FirebaseAuth {
	pub fn new(client: Client, api_key: String, base_url: Option<String>) -> Self {
		Self {
			client,
			api_key,
			base_url: base_url.unwrap_or_else(|| IDENTITY_TOOLKIT_URL.to_string()),
		}
	}
}

/// Maps the error message of the identity toolkit onto a credential failure.
/// Messages look like `CODE` or `CODE : human readable details`.
pub fn map_error_message(message: &str) -> AuthProviderError {
	let code = message
		.split(':')
		.next()
		.unwrap_or_default()
		.trim();

	match code {
		"INVALID_LOGIN_CREDENTIALS" => AuthProviderError::InvalidCredential,
		"EMAIL_NOT_FOUND" => AuthProviderError::UserNotFound,
		"INVALID_PASSWORD" => AuthProviderError::WrongPassword,
		"INVALID_EMAIL" => AuthProviderError::InvalidEmail,
		"TOO_MANY_ATTEMPTS_TRY_LATER" => AuthProviderError::TooManyRequests,
		_ => AuthProviderError::Other(message.to_string()),
	}
}

fn map_transport_error(error: reqwest::Error) -> AuthProviderError {
	if error.is_connect() || error.is_timeout() || error.is_request() {
		AuthProviderError::NetworkFailure(error.to_string())
	} else {
		AuthProviderError::Other(error.to_string())
	}
}

#[async_trait]
impl AuthProvider for FirebaseAuth {
	#[instrument(skip(self, password))]
	async fn sign_in(
		&self,
		email: &str,
		password: &str,
	) -> Result<ProviderSession, AuthProviderError> {
		let response = self
			.client
			.post(format!("{}/accounts:signInWithPassword", self.base_url))
			.query(&[("key", &self.api_key)])
			.json(&SignInWithPasswordRequest {
				email,
				password,
				return_secure_token: true,
			})
			.send()
			.await
			.map_err(map_transport_error)?;

		if !response.status().is_success() {
			let status = response.status();
			let error = response
				.json::<ErrorResponse>()
				.await
				.map_err(map_transport_error)?;
			debug!(
				"Sign in rejected with status {}: {}",
				status, error.error.message
			);
			return Err(map_error_message(&error.error.message));
		}

		let body = response
			.json::<SignInWithPasswordResponse>()
			.await
			.map_err(map_transport_error)?;

		Ok(ProviderSession {
			uid: body.local_id,
			email: body.email,
			id_token: body.id_token,
			expires_in: body
				.expires_in
				.and_then(|seconds| seconds.parse::<i64>().ok())
				.map(Duration::seconds)
				.unwrap_or(DEFAULT_TOKEN_LIFETIME),
		})
	}

	/// ID tokens cannot be revoked individually through the REST API. Once the
	/// server side session is gone the token is never used again, so there is
	/// nothing to send.
	async fn sign_out(&self, session: &ProviderSession) -> Result<(), AuthProviderError> {
		trace!("Dropping provider session for `{}`", session.uid);
		Ok(())
	}
}
