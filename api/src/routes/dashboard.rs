use axum::{extract::State, routing::get, Router};
use models::api::auth::DashboardResponse;

use crate::{
	db::{self, RoleRecord},
	prelude::*,
	service::Session,
	utils::extractors::{AdminPage, GuardedPage, RoleGuard, StudentPage, TrainerPage},
};

/// The role dashboards. Requests without a session of the dashboard's role
/// are redirected to the login page.
pub fn setup_routes() -> Router<AppState> {
	Role::ALL
		.into_iter()
		.fold(Router::new(), |router, role| {
			let path = role.dashboard_path();
			match role {
				Role::Student => router.route(&path, get(dashboard::<StudentPage>)),
				Role::Trainer => router.route(&path, get(dashboard::<TrainerPage>)),
				Role::Admin => router.route(&path, get(dashboard::<AdminPage>)),
			}
		})
}

#[instrument(skip(state, session), fields(role = %session.role))]
async fn dashboard<P>(
	State(state): State<AppState>,
	RoleGuard(session, _): RoleGuard<P>,
) -> Result<ApiSuccessResponse<DashboardResponse>, ErrorType>
where
	P: GuardedPage,
{
	let record = load_role_record(&state, &session).await?;
	Ok(ApiSuccessResponse::ok(DashboardResponse {
		role: session.role,
		email: session.email,
		name: record.name.clone(),
		profile: db::document_to_value(&db::Document {
			id: record.id,
			fields: record.fields,
		}),
	}))
}

/// The role record the session was created from, as it is stored now
async fn load_role_record(state: &AppState, session: &Session) -> Result<RoleRecord, ErrorType> {
	state
		.database
		.get(session.record_collection, &session.record_id)
		.await?
		.and_then(|document| RoleRecord::from_document(session.record_collection, document))
		.ok_or_else(|| {
			warn!(
				"Role record `{}/{}` of session `{}` is gone",
				session.record_collection, session.record_id, session.login_id
			);
			ErrorType::ResourceDoesNotExist
		})
}
