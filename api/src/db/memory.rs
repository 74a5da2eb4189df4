use std::{
	collections::{BTreeMap, HashMap},
	path::Path,
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::{fs, sync::RwLock};

use super::{Collection, DatabaseError, Document, DocumentStore, Fields};
use crate::prelude::*;

/// A document store that keeps everything in memory. Used for local
/// development and in tests. Documents are kept ordered by ID so that
/// listings are stable.
#[derive(Debug, Default)]
pub struct MemoryStore {
	collections: RwLock<HashMap<Collection, BTreeMap<String, Fields>>>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads documents from a JSON file of the form
	/// `{ "<collection>": { "<id>": { ...fields } } }`. Unknown collection
	/// names are rejected so that typos in the seed file are caught early.
	pub async fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
		let content = fs::read_to_string(path).await?;
		Self::from_seed(serde_json::from_str(&content)?)
	}

	/// Same as [`MemoryStore::from_seed_file`], from an already parsed value
	pub fn from_seed(seed: BTreeMap<String, BTreeMap<String, Fields>>) -> Result<Self, DatabaseError> {
		let mut collections = HashMap::new();
		for (name, documents) in seed {
			let collection = Collection::from_name(&name).ok_or_else(|| {
				DatabaseError::Json(serde::de::Error::custom(format!(
					"unknown collection `{name}` in seed data"
				)))
			})?;
			collections.insert(collection, documents);
		}
		Ok(Self {
			collections: RwLock::new(collections),
		})
	}

	/// Inserts or replaces a document with a known ID
	pub async fn put(&self, collection: Collection, id: impl Into<String>, fields: Fields) {
		self.collections
			.write()
			.await
			.entry(collection)
			.or_default()
			.insert(id.into(), fields);
	}
}

#[async_trait]
impl DocumentStore for MemoryStore {
	async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, DatabaseError> {
		Ok(self
			.collections
			.read()
			.await
			.get(&collection)
			.and_then(|documents| documents.get(id))
			.map(|fields| Document {
				id: id.to_string(),
				fields: fields.clone(),
			}))
	}

	async fn find_by_field(
		&self,
		collection: Collection,
		field: &str,
		value: &Value,
	) -> Result<Vec<Document>, DatabaseError> {
		Ok(self
			.collections
			.read()
			.await
			.get(&collection)
			.map(|documents| {
				documents
					.iter()
					.filter(|(_, fields)| fields.get(field) == Some(value))
					.map(|(id, fields)| Document {
						id: id.clone(),
						fields: fields.clone(),
					})
					.collect()
			})
			.unwrap_or_default())
	}

	async fn list(&self, collection: Collection) -> Result<Vec<Document>, DatabaseError> {
		Ok(self
			.collections
			.read()
			.await
			.get(&collection)
			.map(|documents| {
				documents
					.iter()
					.map(|(id, fields)| Document {
						id: id.clone(),
						fields: fields.clone(),
					})
					.collect()
			})
			.unwrap_or_default())
	}

	async fn insert(&self, collection: Collection, fields: Fields) -> Result<String, DatabaseError> {
		let id = Uuid::new_v4().simple().to_string();
		self.put(collection, id.clone(), fields).await;
		trace!("Inserted document `{}/{}`", collection, id);
		Ok(id)
	}

	async fn update_fields(
		&self,
		collection: Collection,
		id: &str,
		fields: Fields,
	) -> Result<(), DatabaseError> {
		let mut collections = self.collections.write().await;
		let document = collections
			.get_mut(&collection)
			.and_then(|documents| documents.get_mut(id))
			.ok_or_else(|| DatabaseError::NotFound {
				collection,
				id: id.to_string(),
			})?;
		document.extend(fields);
		Ok(())
	}

	async fn delete(&self, collection: Collection, id: &str) -> Result<(), DatabaseError> {
		if let Some(documents) = self.collections.write().await.get_mut(&collection) {
			documents.remove(id);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn fields(value: Value) -> Fields {
		match value {
			Value::Object(map) => map,
			_ => panic!("fields must be an object"),
		}
	}

	#[tokio::test]
	async fn find_by_field_matches_exact_values() {
		let store = MemoryStore::new();
		store
			.put(Collection::Students, "a", fields(json!({ "email": "jane@x.com" })))
			.await;
		store
			.put(Collection::Students, "b", fields(json!({ "email": "JANE@x.com" })))
			.await;

		let found = store
			.find_by_field(Collection::Students, "email", &json!("jane@x.com"))
			.await
			.unwrap();
		assert_eq!(found.len(), 1);
		assert_eq!(found[0].id, "a");

		let none = store
			.find_by_field(Collection::Trainers, "email", &json!("jane@x.com"))
			.await
			.unwrap();
		assert!(none.is_empty());
	}

	#[tokio::test]
	async fn update_fields_merges_top_level_and_replaces_arrays() {
		let store = MemoryStore::new();
		store
			.put(
				Collection::Students,
				"a",
				fields(json!({ "name": "Jane", "courses": [1, 2, 3] })),
			)
			.await;

		store
			.update_fields(Collection::Students, "a", fields(json!({ "courses": [4] })))
			.await
			.unwrap();

		let document = store.get(Collection::Students, "a").await.unwrap().unwrap();
		assert_eq!(document.fields["name"], "Jane");
		assert_eq!(document.fields["courses"], json!([4]));
	}

	#[tokio::test]
	async fn update_of_missing_document_fails() {
		let store = MemoryStore::new();
		let result = store
			.update_fields(Collection::Admins, "ghost", Fields::new())
			.await;
		assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
	}

	#[test]
	fn seed_rejects_unknown_collections() {
		let seed = serde_json::from_value(json!({ "users": { "a": {} } })).unwrap();
		assert!(MemoryStore::from_seed(seed).is_err());
	}
}
