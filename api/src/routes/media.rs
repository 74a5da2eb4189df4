use axum::{
	extract::{DefaultBodyLimit, Multipart, State},
	routing::post,
	Router,
};
use models::api::media::UploadImageResponse;

use crate::{
	prelude::*,
	service::{self, ImageUpload},
	utils::extractors::AuthenticatedSession,
};

pub fn setup_routes() -> Router<AppState> {
	Router::new().route(
		"/media/upload",
		post(upload_image).layer(DefaultBodyLimit::max(constants::MAX_UPLOAD_SIZE + 64 * 1024)),
	)
}

/// Forwards an image to the CDN. Any logged in user may upload, since both
/// blog images and student media go through here.
#[instrument(skip(state, session, multipart), fields(uploader = %session.email))]
async fn upload_image(
	State(state): State<AppState>,
	AuthenticatedSession(session): AuthenticatedSession,
	mut multipart: Multipart,
) -> Result<ApiSuccessResponse<UploadImageResponse>, ErrorType> {
	let mut upload = None;
	while let Some(field) = multipart.next_field().await.map_err(|err| {
		debug!("Invalid multipart body: {}", err);
		ErrorType::WrongParameters
	})? {
		if field.name() != Some(constants::UPLOAD_FILE_FIELD) {
			continue;
		}
		let file_name = field.file_name().unwrap_or("upload").to_string();
		let content_type = field
			.content_type()
			.unwrap_or("application/octet-stream")
			.to_string();
		let bytes = field.bytes().await.map_err(|err| {
			debug!("Unable to read upload: {}", err);
			ErrorType::WrongParameters
		})?;
		upload = Some(ImageUpload {
			file_name,
			content_type,
			bytes: bytes.to_vec(),
		});
		break;
	}

	let upload = upload.ok_or(ErrorType::WrongParameters)?;
	let url = service::upload_image(&state.http, &state.config.media, upload).await?;
	Ok(ApiSuccessResponse::ok(UploadImageResponse { url }))
}
