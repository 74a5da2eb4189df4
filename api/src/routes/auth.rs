use axum::{extract::State, routing::{get, post}, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use models::api::{
	auth::{LoginRequest, LoginResponse, SessionResponse},
	contact::MessageResponse,
};
use time::OffsetDateTime;

use crate::{
	prelude::*,
	service,
	utils::extractors::{AuthenticatedSession, JsonBody},
};

pub fn setup_routes() -> Router<AppState> {
	Router::new()
		.route("/auth/login", post(login))
		.route("/auth/logout", post(logout))
		.route("/auth/session", get(session))
}

/// Logs in as the role picked on the login page. The access token is both
/// returned and set as a cookie, for API clients and browsers respectively.
#[instrument(skip(state, jar, request), fields(email = %request.email, role = %request.role))]
async fn login(
	State(state): State<AppState>,
	jar: CookieJar,
	JsonBody(request): JsonBody<LoginRequest>,
) -> Result<(CookieJar, ApiSuccessResponse<LoginResponse>), ErrorType> {
	let login = service::authenticate(
		state.database.as_ref(),
		state.auth.as_ref(),
		&state.sessions,
		&request.email,
		&request.password,
		request.role,
	)
	.await?;

	let max_age = login.session.expires_at - OffsetDateTime::now_utc();
	let cookie = Cookie::build((constants::SESSION_COOKIE, login.access_token.clone()))
		.path("/")
		.http_only(true)
		.secure(state.config.environment == RunningEnvironment::Production)
		.same_site(SameSite::Lax)
		.max_age(max_age)
		.build();

	Ok((
		jar.add(cookie),
		ApiSuccessResponse::ok(LoginResponse {
			role: login.session.role,
			redirect: login.redirect,
			access_token: login.access_token,
		}),
	))
}

#[instrument(skip(state, jar))]
async fn logout(
	State(state): State<AppState>,
	jar: CookieJar,
	AuthenticatedSession(session): AuthenticatedSession,
) -> (CookieJar, ApiSuccessResponse<MessageResponse>) {
	service::logout(state.auth.as_ref(), &state.sessions, session.login_id).await;
	(
		jar.remove(Cookie::build(constants::SESSION_COOKIE).path("/")),
		ApiSuccessResponse::ok(MessageResponse {
			message: "Logged out".to_string(),
		}),
	)
}

async fn session(
	AuthenticatedSession(session): AuthenticatedSession,
) -> ApiSuccessResponse<SessionResponse> {
	ApiSuccessResponse::ok(SessionResponse {
		email: session.email,
		role: session.role,
		expires_at: session.expires_at,
	})
}
