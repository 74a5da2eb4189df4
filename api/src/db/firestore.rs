mod value;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{Collection, DatabaseError, Document, DocumentStore, Fields};
use crate::prelude::*;

/// Number of documents requested per page when listing a collection
const LIST_PAGE_SIZE: u32 = 300;

/// A [`DocumentStore`] backed by the Firestore REST API
#[derive(Debug, Clone)]
pub struct FirestoreStore {
	client: Client,
	/// `https://firestore.googleapis.com/v1/projects/{project}/databases/{db}/documents`
	documents_url: String,
	api_key: Option<String>,
	access_token: Option<String>,
}

/// A document as returned by the REST API
#[derive(Debug, Deserialize)]
struct FirestoreDocument {
	/// Full resource name, ending in `/{collection}/{id}`
	name: String,
	#[serde(default)]
	fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
	#[serde(default)]
	documents: Vec<FirestoreDocument>,
	next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunQueryResponseItem {
	document: Option<FirestoreDocument>,
}

impl FirestoreStore {
	pub fn new(
		client: Client,
		project_id: &str,
		database_id: Option<&str>,
		api_key: Option<String>,
		access_token: Option<String>,
	) -> Self {
		Self {
			client,
			documents_url: format!(
				"https://firestore.googleapis.com/v1/projects/{}/databases/{}/documents",
				project_id,
				database_id.unwrap_or("(default)")
			),
			api_key,
			access_token,
		}
	}

	/// Adds the credentials to a request
	fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
		let request = match &self.api_key {
			Some(key) => request.query(&[("key", key)]),
			None => request,
		};
		match &self.access_token {
			Some(token) => request.bearer_auth(token),
			None => request,
		}
	}

	fn document_url(&self, collection: Collection, id: &str) -> String {
		format!("{}/{}/{}", self.documents_url, collection, id)
	}

	fn into_document(
		collection: Collection,
		document: FirestoreDocument,
	) -> Result<Document, DatabaseError> {
		let id = document
			.name
			.rsplit('/')
			.next()
			.unwrap_or_default()
			.to_string();
		let fields = value::decode_fields(&document.fields)
			.map_err(|reason| DatabaseError::Malformed { collection, reason })?;
		Ok(Document { id, fields })
	}
}

/// Turns a non-success response into an error, keeping the body for the logs
async fn check_status(response: Response) -> Result<Response, DatabaseError> {
	if response.status().is_success() {
		return Ok(response);
	}
	let status = response.status().as_u16();
	let body = response.text().await.unwrap_or_default();
	Err(DatabaseError::UnexpectedStatus { status, body })
}

#[async_trait]
impl DocumentStore for FirestoreStore {
	#[instrument(skip(self))]
	async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>, DatabaseError> {
		let response = self
			.authorize(self.client.get(self.document_url(collection, id)))
			.send()
			.await?;

		if response.status() == StatusCode::NOT_FOUND {
			return Ok(None);
		}

		let document = check_status(response)
			.await?
			.json::<FirestoreDocument>()
			.await?;
		Self::into_document(collection, document).map(Some)
	}

	#[instrument(skip(self, value))]
	async fn find_by_field(
		&self,
		collection: Collection,
		field: &str,
		value: &Value,
	) -> Result<Vec<Document>, DatabaseError> {
		let query = json!({
			"structuredQuery": {
				"from": [{ "collectionId": collection.as_str() }],
				"where": {
					"fieldFilter": {
						"field": { "fieldPath": field },
						"op": "EQUAL",
						"value": value::encode(value),
					}
				}
			}
		});

		let items = check_status(
			self.authorize(
				self.client
					.post(format!("{}:runQuery", self.documents_url))
					.json(&query),
			)
			.send()
			.await?,
		)
		.await?
		.json::<Vec<RunQueryResponseItem>>()
		.await?;

		// Items without a document only carry the read time
		items
			.into_iter()
			.filter_map(|item| item.document)
			.map(|document| Self::into_document(collection, document))
			.collect()
	}

	#[instrument(skip(self))]
	async fn list(&self, collection: Collection) -> Result<Vec<Document>, DatabaseError> {
		let mut documents = Vec::new();
		let mut page_token: Option<String> = None;

		loop {
			let mut request = self
				.client
				.get(format!("{}/{}", self.documents_url, collection))
				.query(&[("pageSize", LIST_PAGE_SIZE.to_string())]);
			if let Some(token) = &page_token {
				request = request.query(&[("pageToken", token)]);
			}

			let page = check_status(self.authorize(request).send().await?)
				.await?
				.json::<ListDocumentsResponse>()
				.await?;

			for document in page.documents {
				documents.push(Self::into_document(collection, document)?);
			}

			match page.next_page_token {
				Some(token) if !token.is_empty() => page_token = Some(token),
				_ => break,
			}
		}

		Ok(documents)
	}

	#[instrument(skip(self, fields))]
	async fn insert(&self, collection: Collection, fields: Fields) -> Result<String, DatabaseError> {
		let document = check_status(
			self.authorize(
				self.client
					.post(format!("{}/{}", self.documents_url, collection))
					.json(&json!({ "fields": value::encode_fields(&fields) })),
			)
			.send()
			.await?,
		)
		.await?
		.json::<FirestoreDocument>()
		.await?;

		Ok(Self::into_document(collection, document)?.id)
	}

	#[instrument(skip(self, fields))]
	async fn update_fields(
		&self,
		collection: Collection,
		id: &str,
		fields: Fields,
	) -> Result<(), DatabaseError> {
		let mask = fields
			.keys()
			.map(|field| ("updateMask.fieldPaths", field.as_str()))
			.chain([("currentDocument.exists", "true")])
			.collect::<Vec<_>>();

		let response = self
			.authorize(
				self.client
					.patch(self.document_url(collection, id))
					.query(&mask)
					.json(&json!({ "fields": value::encode_fields(&fields) })),
			)
			.send()
			.await?;

		if response.status() == StatusCode::NOT_FOUND {
			return Err(DatabaseError::NotFound {
				collection,
				id: id.to_string(),
			});
		}
		check_status(response).await?;
		Ok(())
	}

	#[instrument(skip(self))]
	async fn delete(&self, collection: Collection, id: &str) -> Result<(), DatabaseError> {
		check_status(
			self.authorize(self.client.delete(self.document_url(collection, id)))
				.send()
				.await?,
		)
		.await?;
		Ok(())
	}
}
