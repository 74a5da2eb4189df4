//! The document store that holds every record of the academy, and the query
//! functions the services use on top of it.
//!
//! All records live in a hosted document database. The [`DocumentStore`]
//! trait is the only way the rest of the API talks to it, so that the
//! services can run against the [`MemoryStore`] in development and tests.

mod blog;
mod firestore;
mod memory;
mod records;
mod registration;
mod role_record;
mod student;

use std::{
	fmt::{Display, Formatter},
	sync::Arc,
};

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use self::{
	blog::*,
	firestore::FirestoreStore,
	memory::MemoryStore,
	records::*,
	registration::*,
	role_record::*,
	student::*,
};
use crate::prelude::*;

/// The fields of a document, as a JSON object
pub type Fields = Map<String, Value>;

/// The collections the academy stores documents in
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
	Students,
	Trainers,
	Admins,
	/// Course registration forms. Also probed during login, since older
	/// student accounts only ever had a registration record.
	Registrations,
	/// Course renewal forms. Probed during login like registrations.
	Renewals,
	Blogs,
}

impl Collection {
	/// The order in which collections are searched for an email during login.
	/// The first collection with a match decides the user's role.
	pub const ROLE_LOOKUP_ORDER: [Collection; 5] = [
		Collection::Students,
		Collection::Trainers,
		Collection::Admins,
		Collection::Registrations,
		Collection::Renewals,
	];

	pub const ALL: [Collection; 6] = [
		Collection::Students,
		Collection::Trainers,
		Collection::Admins,
		Collection::Registrations,
		Collection::Renewals,
		Collection::Blogs,
	];

	/// The name of the collection in the document database
	pub fn as_str(&self) -> &'static str {
		match self {
			Collection::Students => "students",
			Collection::Trainers => "trainers",
			Collection::Admins => "admins",
			Collection::Registrations => "registrations",
			Collection::Renewals => "renewals",
			Collection::Blogs => "blogs",
		}
	}

	/// Looks up a collection by its name in the document database
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL
			.into_iter()
			.find(|collection| collection.as_str() == name)
	}

	/// The collection that holds the role records of the given role
	pub fn for_role(role: Role) -> Self {
		match role {
			Role::Student => Collection::Students,
			Role::Trainer => Collection::Trainers,
			Role::Admin => Collection::Admins,
		}
	}

	/// The role a record in this collection resolves to during login. The
	/// legacy form collections resolve to students.
	pub fn role(&self) -> Option<Role> {
		match self {
			Collection::Students | Collection::Registrations | Collection::Renewals => {
				Some(Role::Student)
			}
			Collection::Trainers => Some(Role::Trainer),
			Collection::Admins => Some(Role::Admin),
			Collection::Blogs => None,
		}
	}
}

impl Display for Collection {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// A document as read from the store
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
	/// The ID of the document within its collection
	pub id: String,
	/// The fields of the document
	pub fields: Fields,
}

impl Document {
	/// Reads a string field, ignoring values of any other type
	pub fn str_field(&self, name: &str) -> Option<&str> {
		self.fields.get(name).and_then(Value::as_str)
	}
}

/// Errors raised by a [`DocumentStore`]
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
	#[error("document `{collection}/{id}` does not exist")]
	NotFound { collection: Collection, id: String },
	#[error("request to the document database failed: {0}")]
	Request(#[from] reqwest::Error),
	#[error("document database responded with status {status}: {body}")]
	UnexpectedStatus { status: u16, body: String },
	#[error("malformed document in `{collection}`: {reason}")]
	Malformed {
		collection: Collection,
		reason: String,
	},
	#[error("unable to read seed data: {0}")]
	Seed(#[from] std::io::Error),
	#[error("invalid JSON: {0}")]
	Json(#[from] serde_json::Error),
}

/// The operations the API needs from the document database. Queries are
/// equality filters on a single field, and writes either replace top level
/// fields or whole documents. There are no transactions: two writers
/// updating the same field race and the last write wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
	/// Gets a document by its ID, or `None` if it does not exist
	async fn get(&self, collection: Collection, id: &str)
		-> Result<Option<Document>, DatabaseError>;

	/// Finds every document in the collection whose `field` equals `value`
	async fn find_by_field(
		&self,
		collection: Collection,
		field: &str,
		value: &Value,
	) -> Result<Vec<Document>, DatabaseError>;

	/// Lists every document in the collection
	async fn list(&self, collection: Collection) -> Result<Vec<Document>, DatabaseError>;

	/// Creates a new document with a generated ID and returns the ID
	async fn insert(&self, collection: Collection, fields: Fields)
		-> Result<String, DatabaseError>;

	/// Replaces the given top level fields of an existing document. Fields
	/// that are not mentioned are left untouched. Arrays are replaced as a
	/// whole.
	async fn update_fields(
		&self,
		collection: Collection,
		id: &str,
		fields: Fields,
	) -> Result<(), DatabaseError>;

	/// Deletes a document. Deleting a document that does not exist is not an
	/// error.
	async fn delete(&self, collection: Collection, id: &str) -> Result<(), DatabaseError>;
}

/// Creates the document store described by the config
#[instrument(skip_all)]
pub async fn connect(
	config: &DatabaseConfig,
	http: &reqwest::Client,
) -> Result<Arc<dyn DocumentStore>, DatabaseError> {
	let store: Arc<dyn DocumentStore> = match config {
		DatabaseConfig::Firestore {
			project_id,
			api_key,
			access_token,
			database_id,
		} => {
			info!("Using Firestore project `{}`", project_id);
			Arc::new(FirestoreStore::new(
				http.clone(),
				project_id,
				database_id.as_deref(),
				api_key.clone(),
				access_token.clone(),
			))
		}
		DatabaseConfig::Memory { seed_file } => {
			let store = match seed_file {
				Some(path) => {
					info!("Seeding in-memory document store from `{}`", path);
					MemoryStore::from_seed_file(path).await?
				}
				None => MemoryStore::new(),
			};
			warn!("Using an in-memory document store. Data will not survive a restart");
			Arc::new(store)
		}
	};

	Ok(store)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn legacy_collections_resolve_to_students() {
		assert_eq!(Collection::Registrations.role(), Some(Role::Student));
		assert_eq!(Collection::Renewals.role(), Some(Role::Student));
		assert_eq!(Collection::Blogs.role(), None);
	}

	#[test]
	fn lookup_order_starts_with_role_collections() {
		assert_eq!(
			&Collection::ROLE_LOOKUP_ORDER[..3],
			&Role::ALL.map(Collection::for_role)[..]
		);
	}

	#[test]
	fn collection_names_round_trip() {
		for collection in Collection::ALL {
			assert_eq!(Collection::from_name(collection.as_str()), Some(collection));
		}
		assert_eq!(Collection::from_name("users"), None);
	}
}
