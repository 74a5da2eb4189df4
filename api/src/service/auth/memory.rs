use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use time::Duration;
use tokio::sync::RwLock;

use super::{AuthProvider, AuthProviderError, ProviderSession};
use crate::prelude::*;

/// Lifetime of the sessions handed out by [`MemoryAuth`]
const SESSION_LIFETIME: Duration = Duration::hours(1);

/// An [`AuthProvider`] with a fixed set of accounts, used for local
/// development and in tests. It keeps track of the sessions it has handed out
/// so that callers can check that a denied login left nothing signed in.
#[derive(Debug, Default)]
pub struct MemoryAuth {
	/// Email to (uid, password)
	accounts: HashMap<String, (String, String)>,
	active_sessions: RwLock<HashSet<String>>,
}

impl MemoryAuth {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an account. The uid is derived from the email so that it stays
	/// the same across restarts.
	pub fn with_account(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
		let email = email.into();
		let uid = slugify(&email);
		self.accounts.insert(email, (uid, password.into()));
		self
	}

	/// Number of sessions that were signed in and not yet signed out
	pub async fn active_session_count(&self) -> usize {
		self.active_sessions.read().await.len()
	}
}

#[async_trait]
impl AuthProvider for MemoryAuth {
	async fn sign_in(
		&self,
		email: &str,
		password: &str,
	) -> Result<ProviderSession, AuthProviderError> {
		if !email.contains('@') {
			return Err(AuthProviderError::InvalidEmail);
		}
		let (uid, expected) = self
			.accounts
			.get(email)
			.ok_or(AuthProviderError::UserNotFound)?;
		if expected != password {
			return Err(AuthProviderError::WrongPassword);
		}

		let id_token = Uuid::new_v4().simple().to_string();
		self.active_sessions.write().await.insert(id_token.clone());

		Ok(ProviderSession {
			uid: uid.clone(),
			email: email.to_string(),
			id_token,
			expires_in: SESSION_LIFETIME,
		})
	}

	async fn sign_out(&self, session: &ProviderSession) -> Result<(), AuthProviderError> {
		self.active_sessions.write().await.remove(&session.id_token);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn sessions_are_tracked_until_sign_out() {
		let auth = MemoryAuth::new().with_account("jane@x.com", "hunter22");

		assert_eq!(
			auth.sign_in("jane@x.com", "nope").await,
			Err(AuthProviderError::WrongPassword)
		);
		assert_eq!(
			auth.sign_in("ghost@x.com", "hunter22").await,
			Err(AuthProviderError::UserNotFound)
		);
		assert_eq!(auth.active_session_count().await, 0);

		let session = auth.sign_in("jane@x.com", "hunter22").await.unwrap();
		assert_eq!(auth.active_session_count().await, 1);

		auth.sign_out(&session).await.unwrap();
		auth.sign_out(&session).await.unwrap();
		assert_eq!(auth.active_session_count().await, 0);
	}
}
