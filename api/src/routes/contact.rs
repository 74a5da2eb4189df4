use axum::{
	extract::{rejection::JsonRejection, State},
	routing::post,
	Json,
	Router,
};
use models::api::contact::{MessageResponse, SendEmailRequest};

use super::{forwarding_error, ForwardingResult};
use crate::{prelude::*, service};

pub fn setup_routes() -> Router<AppState> {
	Router::new().route("/send-email", post(send_email))
}

/// Relays the contact form to the academy's inbox. Answers with
/// `{ message }` or `{ error }` instead of the usual envelope.
#[instrument(skip(state, request))]
async fn send_email(
	State(state): State<AppState>,
	request: Result<Json<SendEmailRequest>, JsonRejection>,
) -> ForwardingResult<MessageResponse> {
	let Json(request) = request.map_err(|rejection| {
		debug!("Rejected contact form: {}", rejection.body_text());
		forwarding_error(ErrorType::WrongParameters, "")
	})?;

	let message = service::validate_contact_message(&request)
		.map_err(|error| forwarding_error(error, ""))?;
	service::send_contact_email(&state.mailer, &state.config.contact, message)
		.await
		.map_err(|error| forwarding_error(error, "Failed to send email"))?;

	Ok(Json(MessageResponse {
		message: "Email sent successfully".to_string(),
	}))
}
