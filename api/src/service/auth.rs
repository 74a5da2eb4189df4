//! The access gate. A login only gets a session if the auth provider accepts
//! the credentials, exactly one role collection holds a record for the email,
//! and that role is the one the user picked.

mod firebase;
mod memory;
mod provider;

use time::OffsetDateTime;

pub use self::{firebase::*, memory::*, provider::*};
use super::{Session, SessionStore};
use crate::{
	db::{self, Collection, DocumentStore, RoleRecord},
	prelude::*,
};

/// A login that made it through the access gate
#[derive(Debug, Clone)]
pub struct Authenticated {
	pub session: Session,
	pub access_token: String,
	/// The dashboard the user should be sent to
	pub redirect: String,
	pub record: RoleRecord,
}

/// Logs a user in as `asserted_role`. Every failure after the credential
/// check signs the provider session back out, so a denied login never leaves
/// anything signed in.
#[instrument(skip(store, provider, sessions, password))]
pub async fn authenticate(
	store: &dyn DocumentStore,
	provider: &dyn AuthProvider,
	sessions: &SessionStore,
	email: &str,
	password: &str,
	asserted_role: Role,
) -> Result<Authenticated, ErrorType> {
	let email = email.trim();
	if email.is_empty() || password.is_empty() {
		return Err(ErrorType::WrongParameters);
	}

	let provider_session = provider
		.sign_in(email, password)
		.await
		.inspect_err(|err| debug!("Credentials for `{}` rejected: {}", email, err))
		.map_err(AuthProviderError::into_error_type)?;

	let record = match resolve_role_record(store, email, asserted_role).await {
		Ok(record) => record,
		Err(error) => {
			sign_out(provider, &provider_session).await;
			return Err(error);
		}
	};

	if let Err(err) = db::update_last_login(store, &record, OffsetDateTime::now_utc()).await {
		warn!("Unable to update last login of `{}`: {}", record.id, err);
	}

	let (session, access_token) = match sessions
		.create(
			provider_session.clone(),
			asserted_role,
			record.collection,
			record.id.clone(),
		)
		.await
	{
		Ok(created) => created,
		Err(error) => {
			sign_out(provider, &provider_session).await;
			return Err(error);
		}
	};

	info!("`{}` logged in as {}", email, asserted_role);
	Ok(Authenticated {
		session,
		access_token,
		redirect: asserted_role.dashboard_path(),
		record,
	})
}

/// Finds the single role record of an email and checks it against the
/// role the user picked.
///
/// Collections are probed in [`Collection::ROLE_LOOKUP_ORDER`] and the first
/// match decides the role. The role collections other than the matched one
/// are then probed again: an email with records under two roles is a
/// conflict no matter which role was picked, so that check runs before the
/// roles are compared. Probes are sequential on purpose.
#[instrument(skip(store))]
pub async fn resolve_role_record(
	store: &dyn DocumentStore,
	email: &str,
	asserted_role: Role,
) -> Result<RoleRecord, ErrorType> {
	let mut found = None;
	for collection in Collection::ROLE_LOOKUP_ORDER {
		if let Some(record) = db::find_role_record_by_email(store, collection, email).await? {
			found = Some(record);
			break;
		}
	}

	let Some(record) = found else {
		debug!("No role record found for `{}`", email);
		return Err(ErrorType::NotRegistered);
	};
	let registered = record.role();

	for other in registered.others() {
		let conflicting =
			db::find_role_record_by_email(store, Collection::for_role(other), email).await?;
		if let Some(conflicting) = conflicting {
			warn!(
				"`{}` has records in both `{}` and `{}`",
				email, record.collection, conflicting.collection
			);
			return Err(ErrorType::RoleConflict);
		}
	}

	if registered != asserted_role {
		return Err(ErrorType::RoleMismatch {
			registered,
			asserted: asserted_role,
		});
	}

	Ok(record)
}

/// Ends a session and signs it out of the auth provider
#[instrument(skip(provider, sessions))]
pub async fn logout(provider: &dyn AuthProvider, sessions: &SessionStore, login_id: Uuid) {
	match sessions.remove(login_id).await {
		Some(provider_session) => sign_out(provider, &provider_session).await,
		None => debug!("Session `{}` was already gone", login_id),
	}
}

async fn sign_out(provider: &dyn AuthProvider, session: &ProviderSession) {
	if let Err(err) = provider.sign_out(session).await {
		error!("Unable to sign `{}` out of the auth provider: {}", session.uid, err);
	}
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

	use async_trait::async_trait;
	use serde_json::{json, Value};

	use super::*;
	use crate::db::{DatabaseError, Document, Fields, MemoryStore, LAST_LOGIN_FIELD};

	const PASSWORD: &str = "correct-horse";

	/// Counts the queries made against the wrapped store, and fails queries or
	/// writes on demand
	#[derive(Default)]
	struct CountingStore {
		inner: MemoryStore,
		queries: AtomicUsize,
		fail_queries: AtomicBool,
		fail_writes: AtomicBool,
	}

	fn unavailable() -> DatabaseError {
		DatabaseError::UnexpectedStatus {
			status: 503,
			body: "unavailable".into(),
		}
	}

	#[async_trait]
	impl DocumentStore for CountingStore {
		async fn get(
			&self,
			collection: Collection,
			id: &str,
		) -> Result<Option<Document>, DatabaseError> {
			self.inner.get(collection, id).await
		}

		async fn find_by_field(
			&self,
			collection: Collection,
			field: &str,
			value: &Value,
		) -> Result<Vec<Document>, DatabaseError> {
			self.queries.fetch_add(1, Ordering::SeqCst);
			if self.fail_queries.load(Ordering::SeqCst) {
				return Err(unavailable());
			}
			self.inner.find_by_field(collection, field, value).await
		}

		async fn list(&self, collection: Collection) -> Result<Vec<Document>, DatabaseError> {
			self.inner.list(collection).await
		}

		async fn insert(
			&self,
			collection: Collection,
			fields: Fields,
		) -> Result<String, DatabaseError> {
			self.inner.insert(collection, fields).await
		}

		async fn update_fields(
			&self,
			collection: Collection,
			id: &str,
			fields: Fields,
		) -> Result<(), DatabaseError> {
			if self.fail_writes.load(Ordering::SeqCst) {
				return Err(unavailable());
			}
			self.inner.update_fields(collection, id, fields).await
		}

		async fn delete(&self, collection: Collection, id: &str) -> Result<(), DatabaseError> {
			self.inner.delete(collection, id).await
		}
	}

	struct Fixture {
		store: CountingStore,
		auth: MemoryAuth,
		sessions: SessionStore,
	}

	impl Fixture {
		/// `records` lists the collections holding a record for each email
		async fn new(records: &[(&str, &[Collection])]) -> Self {
			let store = CountingStore::default();
			let mut auth = MemoryAuth::new();
			for (email, collections) in records {
				auth = auth.with_account(*email, PASSWORD);
				for collection in *collections {
					store
						.inner
						.put(
							*collection,
							format!("{}-{}", collection, email),
							json!({ "email": email, "name": "Jane" })
								.as_object()
								.cloned()
								.unwrap(),
						)
						.await;
				}
			}
			Self {
				store,
				auth,
				sessions: SessionStore::new("test-secret"),
			}
		}

		async fn login(&self, email: &str, password: &str, role: Role) -> Result<Authenticated, ErrorType> {
			authenticate(&self.store, &self.auth, &self.sessions, email, password, role).await
		}

		async fn assert_nothing_signed_in(&self) {
			assert_eq!(self.auth.active_session_count().await, 0);
			assert_eq!(self.sessions.active_count().await, 0);
		}
	}

	#[tokio::test]
	async fn single_matching_record_logs_in_with_its_role() {
		for role in Role::ALL {
			let fixture = Fixture::new(&[("jane@x.com", &[Collection::for_role(role)])]).await;

			let login = fixture.login("jane@x.com", PASSWORD, role).await.unwrap();
			assert_eq!(login.session.role, role);
			assert_eq!(login.redirect, role.dashboard_path());
			assert_eq!(fixture.sessions.resolve(&login.access_token).await, Some(login.session));
		}
	}

	#[tokio::test]
	async fn student_login_redirects_to_student_dashboard() {
		let fixture = Fixture::new(&[("jane@x.com", &[Collection::Students])]).await;

		let login = fixture
			.login("jane@x.com", PASSWORD, Role::Student)
			.await
			.unwrap();
		assert_eq!(login.redirect, "/student-dashboard");
		assert_eq!(login.record.collection, Collection::Students);
	}

	#[tokio::test]
	async fn unknown_email_is_not_registered_and_signed_out() {
		let fixture = Fixture::new(&[("jane@x.com", &[])]).await;

		for role in Role::ALL {
			let error = fixture.login("jane@x.com", PASSWORD, role).await.unwrap_err();
			assert_eq!(error, ErrorType::NotRegistered);
			assert!(error.message().starts_with("User not found in system"));
		}
		fixture.assert_nothing_signed_in().await;
	}

	#[tokio::test]
	async fn other_role_is_reported_and_signed_out() {
		let fixture = Fixture::new(&[("sam@x.com", &[Collection::Trainers])]).await;

		let error = fixture
			.login("sam@x.com", PASSWORD, Role::Student)
			.await
			.unwrap_err();
		assert_eq!(
			error,
			ErrorType::RoleMismatch {
				registered: Role::Trainer,
				asserted: Role::Student,
			}
		);
		assert!(error.message().starts_with("You are registered as Trainer, not Student"));
		fixture.assert_nothing_signed_in().await;
	}

	#[tokio::test]
	async fn records_under_two_roles_conflict_for_any_role() {
		let fixture = Fixture::new(&[(
			"jane@x.com",
			&[Collection::Students, Collection::Trainers],
		)])
		.await;

		for role in Role::ALL {
			assert_eq!(
				fixture.login("jane@x.com", PASSWORD, role).await.unwrap_err(),
				ErrorType::RoleConflict
			);
		}
		fixture.assert_nothing_signed_in().await;
	}

	#[tokio::test]
	async fn trainer_and_admin_records_conflict() {
		let fixture = Fixture::new(&[(
			"root@x.com",
			&[Collection::Trainers, Collection::Admins],
		)])
		.await;

		assert_eq!(
			fixture.login("root@x.com", PASSWORD, Role::Admin).await.unwrap_err(),
			ErrorType::RoleConflict
		);
		fixture.assert_nothing_signed_in().await;
	}

	#[tokio::test]
	async fn wrong_password_fails_before_any_lookup() {
		let fixture = Fixture::new(&[("jane@x.com", &[Collection::Students])]).await;

		let error = fixture
			.login("jane@x.com", "wrong", Role::Student)
			.await
			.unwrap_err();
		assert_eq!(error, ErrorType::WrongPassword);
		assert_eq!(error.message(), "Incorrect password");
		assert_eq!(fixture.store.queries.load(Ordering::SeqCst), 0);
		fixture.assert_nothing_signed_in().await;
	}

	#[tokio::test]
	async fn empty_credentials_are_rejected() {
		let fixture = Fixture::new(&[("jane@x.com", &[Collection::Students])]).await;

		assert_eq!(
			fixture.login("  ", PASSWORD, Role::Student).await.unwrap_err(),
			ErrorType::WrongParameters
		);
		assert_eq!(
			fixture.login("jane@x.com", "", Role::Student).await.unwrap_err(),
			ErrorType::WrongParameters
		);
	}

	#[tokio::test]
	async fn repeated_logins_have_the_same_outcome() {
		let fixture = Fixture::new(&[
			("jane@x.com", &[Collection::Students]),
			("sam@x.com", &[Collection::Trainers]),
		])
		.await;

		for _ in 0..2 {
			assert!(fixture.login("jane@x.com", PASSWORD, Role::Student).await.is_ok());
			assert!(matches!(
				fixture.login("sam@x.com", PASSWORD, Role::Admin).await,
				Err(ErrorType::RoleMismatch { .. })
			));
		}
		assert_eq!(fixture.sessions.active_count().await, 2);
	}

	#[tokio::test]
	async fn legacy_form_records_log_in_as_students() {
		let fixture = Fixture::new(&[("old@x.com", &[Collection::Renewals])]).await;

		let login = fixture.login("old@x.com", PASSWORD, Role::Student).await.unwrap();
		assert_eq!(login.record.collection, Collection::Renewals);
		assert_eq!(login.redirect, "/student-dashboard");
	}

	#[tokio::test]
	async fn last_login_is_stamped_on_success() {
		let fixture = Fixture::new(&[("root@x.com", &[Collection::Admins])]).await;

		let login = fixture.login("root@x.com", PASSWORD, Role::Admin).await.unwrap();
		let document = fixture
			.store
			.get(Collection::Admins, &login.record.id)
			.await
			.unwrap()
			.unwrap();
		assert!(document.fields.contains_key(LAST_LOGIN_FIELD));
	}

	#[tokio::test]
	async fn failed_last_login_write_does_not_block_login() {
		let fixture = Fixture::new(&[("jane@x.com", &[Collection::Students])]).await;
		fixture.store.fail_writes.store(true, Ordering::SeqCst);

		let login = fixture
			.login("jane@x.com", PASSWORD, Role::Student)
			.await
			.unwrap();
		assert_eq!(login.redirect, "/student-dashboard");
		assert_eq!(fixture.sessions.active_count().await, 1);

		let document = fixture
			.store
			.get(Collection::Students, &login.record.id)
			.await
			.unwrap()
			.unwrap();
		assert!(!document.fields.contains_key(LAST_LOGIN_FIELD));
	}

	#[tokio::test]
	async fn failed_role_lookup_signs_out() {
		let fixture = Fixture::new(&[("jane@x.com", &[Collection::Students])]).await;
		fixture.store.fail_queries.store(true, Ordering::SeqCst);

		let error = fixture
			.login("jane@x.com", PASSWORD, Role::Student)
			.await
			.unwrap_err();
		assert!(matches!(error, ErrorType::InternalServerError(_)));
		fixture.assert_nothing_signed_in().await;
	}

	#[tokio::test]
	async fn logout_ends_both_sessions() {
		let fixture = Fixture::new(&[("jane@x.com", &[Collection::Students])]).await;
		let login = fixture.login("jane@x.com", PASSWORD, Role::Student).await.unwrap();

		logout(&fixture.auth, &fixture.sessions, login.session.login_id).await;

		assert!(fixture.sessions.resolve(&login.access_token).await.is_none());
		fixture.assert_nothing_signed_in().await;
	}
}
