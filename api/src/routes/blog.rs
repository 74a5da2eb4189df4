use axum::{
	extract::{rejection::JsonRejection, Path, State},
	routing::{get, post},
	Json,
	Router,
};
use models::api::{
	blog::{
		Blog,
		CreateBlogRequest,
		CreateBlogResponse,
		GenerateBlogRequest,
		GenerateBlogResponse,
		ListBlogsResponse,
	},
	contact::MessageResponse,
};

use super::{forwarding_error, ForwardingResult};
use crate::{
	prelude::*,
	service,
	utils::extractors::{AuthenticatedSession, JsonBody, MaybeSession},
};

pub fn setup_routes() -> Router<AppState> {
	Router::new()
		.route("/generate-blog", post(generate_blog))
		.route("/blogs", get(list_blogs).post(create_blog))
		.route("/blogs/:id", get(get_blog).delete(delete_blog))
}

/// Drafts a blog post with the text generation service. Admins only, since
/// every call is paid for. Answers with `{ generated }` or `{ error }`.
#[instrument(skip(state, session, request))]
async fn generate_blog(
	State(state): State<AppState>,
	MaybeSession(session): MaybeSession,
	request: Result<Json<GenerateBlogRequest>, JsonRejection>,
) -> ForwardingResult<GenerateBlogResponse> {
	session
		.ok_or(ErrorType::Unauthorized)
		.and_then(|session| session.require(Role::Admin))
		.map_err(|error| forwarding_error(error, ""))?;

	let Json(request) = request.map_err(|_| forwarding_error(ErrorType::WrongParameters, ""))?;
	let generated = service::generate_blog(
		&state.http,
		&state.config.text_generation,
		request.prompt.as_deref().unwrap_or_default(),
	)
	.await
	.map_err(|error| forwarding_error(error, "Failed to generate blog"))?;

	Ok(Json(GenerateBlogResponse { generated }))
}

async fn list_blogs(
	State(state): State<AppState>,
) -> Result<ApiSuccessResponse<ListBlogsResponse>, ErrorType> {
	let blogs = service::list_blogs(state.database.as_ref()).await?;
	Ok(ApiSuccessResponse::ok(ListBlogsResponse { blogs }))
}

async fn get_blog(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<ApiSuccessResponse<Blog>, ErrorType> {
	service::get_blog(state.database.as_ref(), &id)
		.await
		.map(ApiSuccessResponse::ok)
}

#[instrument(skip(state, session, request))]
async fn create_blog(
	State(state): State<AppState>,
	AuthenticatedSession(session): AuthenticatedSession,
	JsonBody(request): JsonBody<CreateBlogRequest>,
) -> Result<ApiSuccessResponse<CreateBlogResponse>, ErrorType> {
	session.require(Role::Admin)?;
	let id = service::create_blog(state.database.as_ref(), &request, &session).await?;
	Ok(ApiSuccessResponse {
		status_code: 201,
		body: CreateBlogResponse { id },
	})
}

#[instrument(skip(state, session))]
async fn delete_blog(
	State(state): State<AppState>,
	AuthenticatedSession(session): AuthenticatedSession,
	Path(id): Path<String>,
) -> Result<ApiSuccessResponse<MessageResponse>, ErrorType> {
	session.require(Role::Admin)?;
	service::delete_blog(state.database.as_ref(), &id).await?;
	Ok(ApiSuccessResponse::ok(MessageResponse {
		message: "Blog deleted".to_string(),
	}))
}
