use axum::{
	extract::State,
	routing::{get, post},
	Router,
};
use models::api::registration::{
	ListRegistrationsResponse,
	RegistrationRequest,
	RegistrationResponse,
};

use crate::{
	prelude::*,
	service,
	utils::extractors::{AuthenticatedSession, JsonBody},
};

pub fn setup_routes() -> Router<AppState> {
	Router::new()
		.route("/registrations", post(submit_registration))
		.route("/admin/registrations", get(list_registrations))
}

#[instrument(skip(state, request))]
async fn submit_registration(
	State(state): State<AppState>,
	JsonBody(request): JsonBody<RegistrationRequest>,
) -> Result<ApiSuccessResponse<RegistrationResponse>, ErrorType> {
	let id = service::submit_registration(state.database.as_ref(), &request).await?;
	Ok(ApiSuccessResponse {
		status_code: 201,
		body: RegistrationResponse { id },
	})
}

#[instrument(skip(state, session))]
async fn list_registrations(
	State(state): State<AppState>,
	AuthenticatedSession(session): AuthenticatedSession,
) -> Result<ApiSuccessResponse<ListRegistrationsResponse>, ErrorType> {
	session.require(Role::Admin)?;
	let registrations = service::list_registrations(state.database.as_ref()).await?;
	Ok(ApiSuccessResponse::ok(ListRegistrationsResponse { registrations }))
}
