use models::api::blog::Blog;
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

/// A record from the `blogs` collection
#[derive(Debug, Clone, PartialEq)]
pub struct BlogRecord {
	pub id: String,
	pub title: String,
	pub content: String,
	pub image_url: Option<String>,
	pub author: Option<String>,
	pub created_at: Option<OffsetDateTime>,
}

impl BlogRecord {
	/// Posts without a title are skipped when listing, the same way the
	/// public blog page never rendered them.
	pub fn from_document(document: Document) -> Option<Self> {
		Some(Self {
			title: first_string(&document.fields, &["title"])?,
			content: first_string(&document.fields, &["content", "body"]).unwrap_or_default(),
			image_url: first_string(&document.fields, &["imageUrl", "image"]),
			author: first_string(&document.fields, &["author"]),
			created_at: timestamp(&document.fields, "createdAt"),
			id: document.id,
		})
	}
}

impl From<BlogRecord> for Blog {
	fn from(record: BlogRecord) -> Self {
		Blog {
			id: record.id,
			title: record.title,
			content: record.content,
			image_url: record.image_url,
			author: record.author,
			created_at: record.created_at,
		}
	}
}

/// Every blog post, newest first. Posts without a creation time go last.
pub async fn list_blogs(store: &dyn DocumentStore) -> Result<Vec<BlogRecord>, DatabaseError> {
	let mut blogs = store
		.list(Collection::Blogs)
		.await?
		.into_iter()
		.filter_map(BlogRecord::from_document)
		.collect::<Vec<_>>();
	blogs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
	Ok(blogs)
}

pub async fn get_blog_by_id(
	store: &dyn DocumentStore,
	id: &str,
) -> Result<Option<BlogRecord>, DatabaseError> {
	Ok(store
		.get(Collection::Blogs, id)
		.await?
		.and_then(BlogRecord::from_document))
}

#[instrument(skip(store, content))]
pub async fn create_blog(
	store: &dyn DocumentStore,
	title: &str,
	content: &str,
	image_url: Option<&str>,
	author: Option<&str>,
	created_at: OffsetDateTime,
) -> Result<String, DatabaseError> {
	let mut fields = Fields::new();
	fields.insert("title".into(), Value::String(title.to_string()));
	fields.insert("content".into(), Value::String(content.to_string()));
	if let Some(image_url) = image_url {
		fields.insert("imageUrl".into(), Value::String(image_url.to_string()));
	}
	if let Some(author) = author {
		fields.insert("author".into(), Value::String(author.to_string()));
	}
	fields.insert("createdAt".into(), format_timestamp(created_at));

	store.insert(Collection::Blogs, fields).await
}

#[instrument(skip(store))]
pub async fn delete_blog(store: &dyn DocumentStore, id: &str) -> Result<(), DatabaseError> {
	store.delete(Collection::Blogs, id).await
}
