use std::marker::PhantomData;

use axum::{
	async_trait,
	extract::FromRequestParts,
	http::request::Parts,
	response::{IntoResponse, Redirect, Response},
};
use axum_extra::{
	extract::CookieJar,
	headers::{authorization::Bearer, Authorization, HeaderMapExt},
};

use crate::{
	prelude::*,
	service::{GuardState, Session},
};

/// The access token of a request, from the session cookie or else the
/// `Authorization: Bearer` header
fn access_token(parts: &Parts) -> Option<String> {
	CookieJar::from_headers(&parts.headers)
		.get(constants::SESSION_COOKIE)
		.map(|cookie| cookie.value().to_string())
		.or_else(|| {
			parts
				.headers
				.typed_get::<Authorization<Bearer>>()
				.map(|header| header.token().to_string())
		})
}

/// The session of the request, if it has one
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeSession {
	type Rejection = ErrorType;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let Some(token) = access_token(parts) else {
			return Ok(Self(None));
		};
		Ok(Self(state.sessions.resolve(&token).await))
	}
}

/// The session of the request. Requests without one are rejected with
/// [`ErrorType::Unauthorized`].
#[derive(Debug, Clone)]
pub struct AuthenticatedSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedSession {
	type Rejection = ErrorType;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let MaybeSession(session) = MaybeSession::from_request_parts(parts, state).await?;
		session.map(Self).ok_or(ErrorType::Unauthorized)
	}
}

/// A page that only one role may see
pub trait GuardedPage: Send + Sync + 'static {
	const ROLE: Role;
}

pub struct StudentPage;
pub struct TrainerPage;
pub struct AdminPage;

impl GuardedPage for StudentPage {
	const ROLE: Role = Role::Student;
}

impl GuardedPage for TrainerPage {
	const ROLE: Role = Role::Trainer;
}

impl GuardedPage for AdminPage {
	const ROLE: Role = Role::Admin;
}

/// The guard of a page only `P::ROLE` may see. Extracting it decides whether
/// the page is shown; a request that is not allowed is redirected to the
/// login page before the handler runs.
#[derive(Debug, Clone)]
pub struct RoleGuard<P>(pub Session, pub PhantomData<P>);

/// Sends a guarded request to where [`GuardState::Redirecting`] points
#[derive(Debug)]
pub struct GuardRedirect(pub &'static str);

impl IntoResponse for GuardRedirect {
	fn into_response(self) -> Response {
		Redirect::to(self.0).into_response()
	}
}

#[async_trait]
impl<P> FromRequestParts<AppState> for RoleGuard<P>
where
	P: GuardedPage,
{
	type Rejection = GuardRedirect;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let session = match access_token(parts) {
			Some(token) => state.sessions.resolve(&token).await,
			None => None,
		};

		match GuardState::resolve(session, P::ROLE) {
			GuardState::Authorized(session) => Ok(Self(session, PhantomData)),
			GuardState::Redirecting(to) => {
				trace!("Redirecting request for {} page to `{}`", P::ROLE, to);
				Err(GuardRedirect(to))
			}
		}
	}
}
