use axum::{
	http::{header, HeaderValue, Method, StatusCode},
	Json,
	Router,
};
use models::api::contact::ErrorMessageResponse;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};

use crate::prelude::*;

mod auth;
mod blog;
mod contact;
mod dashboard;
mod media;
mod registration;
mod student;

/// Result of the endpoints that answer with a bare `{ error }` body instead
/// of the usual envelope, which the site's contact form and blog editor
/// expect
type ForwardingResult<T> = Result<Json<T>, (StatusCode, Json<ErrorMessageResponse>)>;

/// Turns an error into a `{ error }` body. Internal errors are logged and
/// replaced with `server_message`, since their details are not for clients.
fn forwarding_error(
	error: ErrorType,
	server_message: &str,
) -> (StatusCode, Json<ErrorMessageResponse>) {
	let status = StatusCode::from_u16(error.default_status_code())
		.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
	let message = match &error {
		ErrorType::InternalServerError(err) => {
			error!("{}: {:?}", server_message, err);
			server_message.to_string()
		}
		_ => error.message(),
	};
	(status, Json(ErrorMessageResponse { error: message }))
}

/// Sets up every route of the API. Dashboards are served at the root; every
/// other endpoint lives under `/api`.
#[instrument(skip(state))]
pub fn setup_routes(state: &AppState) -> Router {
	let api_router = Router::new()
		.merge(auth::setup_routes())
		.merge(student::setup_routes())
		.merge(contact::setup_routes())
		.merge(blog::setup_routes())
		.merge(media::setup_routes())
		.merge(registration::setup_routes());

	Router::new()
		.merge(dashboard::setup_routes())
		.nest("/api", api_router)
		.layer(cors_layer(&state.config.allowed_origins))
		.layer(TraceLayer::new_for_http())
		.with_state(state.clone())
}

/// Browsers may call the API from the configured origins, with cookies. When
/// none are configured any origin may call it, without cookies.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
	let layer = CorsLayer::new()
		.allow_methods([Method::GET, Method::POST, Method::DELETE])
		.allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

	if allowed_origins.is_empty() {
		return layer.allow_origin(Any);
	}

	let origins = allowed_origins
		.iter()
		.filter_map(|origin| {
			origin
				.parse::<HeaderValue>()
				.inspect_err(|_| warn!("Ignoring invalid allowed origin `{}`", origin))
				.ok()
		})
		.collect::<Vec<_>>();
	layer.allow_origin(origins).allow_credentials(true)
}
