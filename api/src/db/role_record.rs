use serde_json::Value;
use time::OffsetDateTime;

use super::{
	records::{first_string, format_timestamp, timestamp},
	Collection,
	DatabaseError,
	Document,
	DocumentStore,
	Fields,
};
use crate::prelude::*;

/// Field holding the email on every role record
pub const EMAIL_FIELD: &str = "email";
/// Field updated on every successful login
pub const LAST_LOGIN_FIELD: &str = "lastLogin";

/// A user's record in one of the collections probed during login
#[derive(Debug, Clone, PartialEq)]
pub struct RoleRecord {
	pub id: String,
	/// The collection the record was found in. Decides the user's role.
	pub collection: Collection,
	pub email: String,
	pub name: Option<String>,
	pub last_login: Option<OffsetDateTime>,
	/// Every field of the record as stored
	pub fields: Fields,
}

impl RoleRecord {
	/// Validates a document read from a role collection. Documents without an
	/// email never match a login, so they are rejected here.
	pub fn from_document(collection: Collection, document: Document) -> Option<Self> {
		let email = document.str_field(EMAIL_FIELD)?.to_string();
		Some(Self {
			name: first_string(&document.fields, &["name", "fullName", "displayName"]),
			last_login: timestamp(&document.fields, LAST_LOGIN_FIELD),
			id: document.id,
			collection,
			email,
			fields: document.fields,
		})
	}

	/// The role this record grants
	pub fn role(&self) -> Role {
		// Only role and legacy form collections are ever probed for records
		self.collection.role().unwrap_or(Role::Student)
	}
}

/// Finds the record for an email in a single collection. When a collection
/// holds several records for the same email, the first one is used.
#[instrument(skip(store))]
pub async fn find_role_record_by_email(
	store: &dyn DocumentStore,
	collection: Collection,
	email: &str,
) -> Result<Option<RoleRecord>, DatabaseError> {
	let documents = store
		.find_by_field(collection, EMAIL_FIELD, &Value::String(email.to_string()))
		.await?;

	Ok(documents
		.into_iter()
		.find_map(|document| RoleRecord::from_document(collection, document)))
}

/// Stamps the time of the latest login on a record
#[instrument(skip(store, record), fields(collection = %record.collection, id = %record.id))]
pub async fn update_last_login(
	store: &dyn DocumentStore,
	record: &RoleRecord,
	at: OffsetDateTime,
) -> Result<(), DatabaseError> {
	let mut fields = Fields::new();
	fields.insert(LAST_LOGIN_FIELD.to_string(), format_timestamp(at));
	store
		.update_fields(record.collection, &record.id, fields)
		.await
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::db::MemoryStore;

	#[tokio::test]
	async fn records_without_email_are_skipped() {
		let store = MemoryStore::new();
		store
			.put(
				Collection::Trainers,
				"a",
				json!({ "email": 42 }).as_object().cloned().unwrap(),
			)
			.await;
		store
			.put(
				Collection::Trainers,
				"b",
				json!({ "email": "sam@x.com", "fullName": "Sam" })
					.as_object()
					.cloned()
					.unwrap(),
			)
			.await;

		let record = find_role_record_by_email(&store, Collection::Trainers, "sam@x.com")
			.await
			.unwrap()
			.unwrap();
		assert_eq!(record.id, "b");
		assert_eq!(record.name.as_deref(), Some("Sam"));
		assert_eq!(record.role(), Role::Trainer);
	}

	#[tokio::test]
	async fn last_login_is_written_as_timestamp() {
		let store = MemoryStore::new();
		store
			.put(
				Collection::Admins,
				"root",
				json!({ "email": "root@x.com" }).as_object().cloned().unwrap(),
			)
			.await;
		let record = find_role_record_by_email(&store, Collection::Admins, "root@x.com")
			.await
			.unwrap()
			.unwrap();
		assert_eq!(record.last_login, None);

		let at = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
		update_last_login(&store, &record, at).await.unwrap();

		let record = find_role_record_by_email(&store, Collection::Admins, "root@x.com")
			.await
			.unwrap()
			.unwrap();
		assert_eq!(record.last_login, Some(at));
	}
}
