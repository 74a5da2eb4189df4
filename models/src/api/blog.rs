use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Body of `POST /api/generate-blog`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateBlogRequest {
	#[serde(default)]
	pub prompt: Option<String>,
}

/// `{ generated }`, the text returned by the generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateBlogResponse {
	pub generated: String,
}

/// Body of `POST /api/blogs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
	pub title: String,
	pub content: String,
	#[serde(default)]
	pub image_url: Option<String>,
	#[serde(default)]
	pub author: Option<String>,
}

/// A blog post as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
	pub id: String,
	pub title: String,
	pub content: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub author: Option<String>,
	#[serde(
		default,
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none"
	)]
	pub created_at: Option<OffsetDateTime>,
}

/// Response of `POST /api/blogs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBlogResponse {
	pub id: String,
}

/// Response of `GET /api/blogs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBlogsResponse {
	pub blogs: Vec<Blog>,
}
