use async_trait::async_trait;
use time::Duration;

use crate::prelude::*;

/// A signed in session with the auth provider, as returned by a successful
/// credential check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSession {
	/// The provider's ID for the account
	pub uid: String,
	/// The email as the provider knows it
	pub email: String,
	/// The provider's token for this sign in
	pub id_token: String,
	/// How long the provider token is valid for
	pub expires_in: Duration,
}

/// The ways in which a credential check can fail
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthProviderError {
	#[error("invalid login credentials")]
	InvalidCredential,
	#[error("no account exists for this email")]
	UserNotFound,
	#[error("wrong password")]
	WrongPassword,
	#[error("badly formatted email")]
	InvalidEmail,
	#[error("too many sign in attempts")]
	TooManyRequests,
	#[error("unable to reach the auth provider: {0}")]
	NetworkFailure(String),
	#[error("{0}")]
	Other(String),
}

impl AuthProviderError {
	/// The user facing error for this failure
	pub fn into_error_type(self) -> ErrorType {
		match self {
			Self::InvalidCredential => ErrorType::InvalidCredential,
			Self::UserNotFound => ErrorType::UserNotFound,
			Self::WrongPassword => ErrorType::WrongPassword,
			Self::InvalidEmail => ErrorType::InvalidEmail,
			Self::TooManyRequests => ErrorType::TooManyRequests,
			Self::NetworkFailure(_) => ErrorType::NetworkFailure,
			Self::Other(message) => ErrorType::AuthProvider(message),
		}
	}
}

/// The hosted service that owns accounts and verifies credentials
#[async_trait]
pub trait AuthProvider: Send + Sync {
	/// Verifies an email and password, starting a provider session
	async fn sign_in(&self, email: &str, password: &str)
		-> Result<ProviderSession, AuthProviderError>;

	/// Ends a provider session. Signing out of a session that has already
	/// ended is not an error.
	async fn sign_out(&self, session: &ProviderSession) -> Result<(), AuthProviderError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn credential_failures_map_one_to_one() {
		assert_eq!(
			AuthProviderError::WrongPassword.into_error_type().message(),
			"Incorrect password"
		);
		assert_eq!(
			AuthProviderError::NetworkFailure("timed out".into()).into_error_type(),
			ErrorType::NetworkFailure
		);
		assert_eq!(
			AuthProviderError::Other("USER_DISABLED".into()).into_error_type(),
			ErrorType::AuthProvider("USER_DISABLED".into())
		);
	}
}
