use std::collections::HashMap;

use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::ProviderSession;
use crate::{db::Collection, models::AccessTokenData, prelude::*};

/// A logged in user, as resolved from an access token. Handlers get this
/// passed in explicitly through the session extractors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
	pub login_id: Uuid,
	/// The auth provider's uid of the account
	pub uid: String,
	pub email: String,
	pub role: Role,
	/// The collection of the role record the login resolved to
	pub record_collection: Collection,
	/// The ID of that role record
	pub record_id: String,
	pub expires_at: OffsetDateTime,
}

impl Session {
	/// Fails with [`ErrorType::Unauthorized`] unless the session has the role
	pub fn require(&self, role: Role) -> Result<(), ErrorType> {
		if self.role == role {
			Ok(())
		} else {
			debug!(
				"Session `{}` with role {} denied {} access",
				self.login_id, self.role, role
			);
			Err(ErrorType::Unauthorized)
		}
	}
}

/// What a protected page does with the session of the current request. The
/// page is checking for as long as the session extractor has not resolved;
/// there is no timeout on that, since resolving is a local lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
	/// There is a session and it has the page's role
	Authorized(Session),
	/// There is no session, or it belongs to another role. Holds the page to
	/// go to instead.
	Redirecting(&'static str),
}

impl GuardState {
	/// Decides what happens to a request for a page that requires `role`
	pub fn resolve(session: Option<Session>, role: Role) -> Self {
		match session {
			Some(session) if session.role == role => GuardState::Authorized(session),
			_ => GuardState::Redirecting(constants::LOGIN_PATH),
		}
	}
}

#[derive(Debug, Clone)]
struct StoredSession {
	session: Session,
	provider: ProviderSession,
}

/// The sessions of every user currently logged in. Sessions are kept in
/// memory, so a restart logs everyone out.
#[derive(Debug)]
pub struct SessionStore {
	jwt_secret: String,
	sessions: RwLock<HashMap<Uuid, StoredSession>>,
}

impl SessionStore {
	pub fn new(jwt_secret: impl Into<String>) -> Self {
		Self {
			jwt_secret: jwt_secret.into(),
			sessions: RwLock::new(HashMap::new()),
		}
	}

	/// Starts a session for a login that passed the access gate and returns
	/// it together with its signed access token. The session lives as long
	/// as the provider's token.
	#[instrument(skip(self, provider), fields(uid = %provider.uid))]
	pub async fn create(
		&self,
		provider: ProviderSession,
		role: Role,
		record_collection: Collection,
		record_id: String,
	) -> Result<(Session, String), ErrorType> {
		let now = OffsetDateTime::now_utc();
		let session = Session {
			login_id: Uuid::new_v4(),
			uid: provider.uid.clone(),
			email: provider.email.clone(),
			role,
			record_collection,
			record_id,
			expires_at: now + provider.expires_in,
		};

		let access_token = AccessTokenData::new(
			session.uid.clone(),
			session.login_id,
			role,
			now,
			session.expires_at,
		)
		.to_string(&self.jwt_secret)?;

		let mut sessions = self.sessions.write().await;
		prune(&mut sessions, now);
		sessions.insert(
			session.login_id,
			StoredSession {
				session: session.clone(),
				provider,
			},
		);
		drop(sessions);
		info!("Created session `{}` as {}", session.login_id, role);

		Ok((session, access_token))
	}

	/// Looks up the session an access token belongs to. Tokens that are
	/// tampered with, expired, or whose session was removed resolve to
	/// nothing.
	pub async fn resolve(&self, access_token: &str) -> Option<Session> {
		let data = AccessTokenData::parse(access_token, &self.jwt_secret)
			.inspect_err(|err| trace!("Rejected access token: {}", err))
			.ok()?;

		let session = self
			.sessions
			.read()
			.await
			.get(&data.jti)
			.map(|stored| stored.session.clone())?;

		if session.expires_at <= OffsetDateTime::now_utc() {
			self.remove(session.login_id).await;
			return None;
		}
		if session.uid != data.sub || session.role != data.role {
			warn!("Access token for session `{}` does not match it", session.login_id);
			return None;
		}

		Some(session)
	}

	/// Ends a session, returning the provider session it held
	pub async fn remove(&self, login_id: Uuid) -> Option<ProviderSession> {
		self.sessions
			.write()
			.await
			.remove(&login_id)
			.map(|stored| stored.provider)
	}

	/// Drops every session that has expired. Sessions nobody logs out of
	/// would otherwise be kept forever.
	pub async fn prune_expired(&self) -> usize {
		prune(&mut *self.sessions.write().await, OffsetDateTime::now_utc())
	}

	pub async fn active_count(&self) -> usize {
		self.sessions.read().await.len()
	}
}

fn prune(sessions: &mut HashMap<Uuid, StoredSession>, now: OffsetDateTime) -> usize {
	let before = sessions.len();
	sessions.retain(|_, stored| stored.session.expires_at > now);
	let pruned = before - sessions.len();
	if pruned > 0 {
		debug!("Dropped {} expired sessions", pruned);
	}
	pruned
}

#[cfg(test)]
mod tests {
	use time::Duration;

	use super::*;

	fn provider_session(expires_in: Duration) -> ProviderSession {
		ProviderSession {
			uid: "uid-1".into(),
			email: "jane@x.com".into(),
			id_token: "token".into(),
			expires_in,
		}
	}

	#[tokio::test]
	async fn tokens_resolve_until_the_session_is_removed() {
		let store = SessionStore::new("secret");
		let (session, token) = store
			.create(
				provider_session(Duration::hours(1)),
				Role::Student,
				Collection::Students,
				"s1".into(),
			)
			.await
			.unwrap();

		assert_eq!(store.resolve(&token).await, Some(session.clone()));
		assert!(store.resolve("not-a-token").await.is_none());

		let provider = store.remove(session.login_id).await.unwrap();
		assert_eq!(provider.id_token, "token");
		assert!(store.resolve(&token).await.is_none());
		assert_eq!(store.active_count().await, 0);
	}

	#[tokio::test]
	async fn tokens_from_another_store_do_not_resolve() {
		let store = SessionStore::new("secret");
		let other = SessionStore::new("secret");
		let (_, token) = other
			.create(
				provider_session(Duration::hours(1)),
				Role::Admin,
				Collection::Admins,
				"a1".into(),
			)
			.await
			.unwrap();

		assert!(store.resolve(&token).await.is_none());
	}

	#[tokio::test]
	async fn expired_sessions_are_dropped() {
		let store = SessionStore::new("secret");
		for index in 0..100 {
			store
				.create(
					provider_session(Duration::seconds(-1)),
					Role::Student,
					Collection::Students,
					format!("s{index}"),
				)
				.await
				.unwrap();
		}
		// Every login drops the sessions that expired before it
		assert_eq!(store.active_count().await, 1);

		let (_, token) = store
			.create(
				provider_session(Duration::hours(1)),
				Role::Student,
				Collection::Students,
				"live".into(),
			)
			.await
			.unwrap();
		assert_eq!(store.active_count().await, 1);

		assert_eq!(store.prune_expired().await, 0);
		assert!(store.resolve(&token).await.is_some());
	}

	#[tokio::test]
	async fn sweep_drops_sessions_nobody_logs_in_after() {
		let store = SessionStore::new("secret");
		store
			.create(
				provider_session(Duration::seconds(-1)),
				Role::Trainer,
				Collection::Trainers,
				"t1".into(),
			)
			.await
			.unwrap();

		assert_eq!(store.prune_expired().await, 1);
		assert_eq!(store.active_count().await, 0);
	}

	#[test]
	fn guard_redirects_other_roles_to_login() {
		let session = Session {
			login_id: Uuid::new_v4(),
			uid: "uid".into(),
			email: "sam@x.com".into(),
			role: Role::Trainer,
			record_collection: Collection::Trainers,
			record_id: "t1".into(),
			expires_at: OffsetDateTime::now_utc() + Duration::hours(1),
		};

		assert_eq!(
			GuardState::resolve(Some(session.clone()), Role::Trainer),
			GuardState::Authorized(session.clone())
		);
		assert_eq!(
			GuardState::resolve(Some(session.clone()), Role::Admin),
			GuardState::Redirecting("/login")
		);
		assert_eq!(
			GuardState::resolve(None, Role::Trainer),
			GuardState::Redirecting("/login")
		);
		assert!(session.require(Role::Trainer).is_ok());
		assert_eq!(session.require(Role::Student), Err(ErrorType::Unauthorized));
	}
}
