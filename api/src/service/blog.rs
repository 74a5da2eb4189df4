use models::api::blog::{Blog, CreateBlogRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::Session;
use crate::{
	db::{self, DocumentStore},
	prelude::*,
	utils::validator,
};

/// Used when no system prompt is configured
const DEFAULT_SYSTEM_PROMPT: &str = "You write engaging, accurate blog posts for a robotics \
	academy that teaches school students. Write in plain language, use short sections with \
	headings, and end with a call to action to join a course.";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
	model: &'a str,
	messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
	role: &'a str,
	content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
	#[serde(default)]
	choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
	message: ChatCompletionMessage,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
	#[serde(default)]
	content: Option<String>,
}

/// Asks the text generation service for a blog post about `prompt`
#[instrument(skip(client, config))]
pub async fn generate_blog(
	client: &Client,
	config: &TextGenerationConfig,
	prompt: &str,
) -> Result<String, ErrorType> {
	let prompt = validator::required(prompt).ok_or(ErrorType::WrongParameters)?;

	let response = client
		.post(format!(
			"{}/chat/completions",
			config.base_url.trim_end_matches('/')
		))
		.bearer_auth(&config.api_key)
		.json(&ChatCompletionRequest {
			model: &config.model,
			messages: [
				ChatMessage {
					role: "system",
					content: config
						.system_prompt
						.as_deref()
						.unwrap_or(DEFAULT_SYSTEM_PROMPT),
				},
				ChatMessage {
					role: "user",
					content: prompt,
				},
			],
		})
		.send()
		.await?;

	if !response.status().is_success() {
		let status = response.status();
		let body = response.text().await.unwrap_or_default();
		error!("Text generation failed with status {}: {}", status, body);
		return Err(ErrorType::server_error(format!(
			"text generation responded with {}",
			status
		)));
	}

	response
		.json::<ChatCompletionResponse>()
		.await?
		.choices
		.into_iter()
		.find_map(|choice| choice.message.content)
		.map(|content| content.trim().to_string())
		.filter(|content| !content.is_empty())
		.ok_or_else(|| ErrorType::server_error("text generation returned no content"))
}

pub async fn list_blogs(store: &dyn DocumentStore) -> Result<Vec<Blog>, ErrorType> {
	Ok(db::list_blogs(store)
		.await?
		.into_iter()
		.map(Blog::from)
		.collect())
}

pub async fn get_blog(store: &dyn DocumentStore, id: &str) -> Result<Blog, ErrorType> {
	db::get_blog_by_id(store, id)
		.await?
		.map(Blog::from)
		.ok_or(ErrorType::ResourceDoesNotExist)
}

/// Publishes a blog post. Posts are credited to the given author, or to the
/// admin publishing it.
#[instrument(skip(store, request), fields(title = %request.title))]
pub async fn create_blog(
	store: &dyn DocumentStore,
	request: &CreateBlogRequest,
	published_by: &Session,
) -> Result<String, ErrorType> {
	let (Some(title), Some(content)) = (
		validator::required(&request.title),
		validator::required(&request.content),
	) else {
		return Err(ErrorType::WrongParameters);
	};
	let author = request
		.author
		.as_deref()
		.and_then(validator::required)
		.unwrap_or(&published_by.email);

	let id = db::create_blog(
		store,
		title,
		content,
		request.image_url.as_deref().and_then(validator::required),
		Some(author),
		OffsetDateTime::now_utc(),
	)
	.await?;
	info!("Published blog `{}`", id);
	Ok(id)
}

pub async fn delete_blog(store: &dyn DocumentStore, id: &str) -> Result<(), ErrorType> {
	if db::get_blog_by_id(store, id).await?.is_none() {
		return Err(ErrorType::ResourceDoesNotExist);
	}
	db::delete_blog(store, id).await?;
	Ok(())
}
