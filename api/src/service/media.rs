use reqwest::{
	multipart::{Form, Part},
	Client,
};
use serde::Deserialize;

use crate::prelude::*;

#[derive(Debug, Deserialize)]
struct UploadResponse {
	secure_url: String,
}

/// An image on its way to the CDN
#[derive(Debug, Clone)]
pub struct ImageUpload {
	pub file_name: String,
	pub content_type: String,
	pub bytes: Vec<u8>,
}

impl ImageUpload {
	/// Only images are forwarded, and only up to a size limit
	pub fn validate(&self) -> Result<(), ErrorType> {
		if self.bytes.is_empty() ||
			self.bytes.len() > constants::MAX_UPLOAD_SIZE ||
			!self.content_type.starts_with("image/")
		{
			return Err(ErrorType::WrongParameters);
		}
		Ok(())
	}
}

/// Uploads an image to the CDN with the configured upload preset and returns
/// its public URL
#[instrument(skip(client, config, upload), fields(file_name = %upload.file_name, size = upload.bytes.len()))]
pub async fn upload_image(
	client: &Client,
	config: &MediaConfig,
	upload: ImageUpload,
) -> Result<String, ErrorType> {
	upload.validate()?;

	let part = Part::bytes(upload.bytes)
		.file_name(upload.file_name)
		.mime_str(&upload.content_type)?;
	let form = Form::new()
		.part(constants::UPLOAD_FILE_FIELD, part)
		.text("upload_preset", config.upload_preset.clone());

	let response = client
		.post(&config.upload_url)
		.multipart(form)
		.send()
		.await?;

	if !response.status().is_success() {
		let status = response.status();
		let body = response.text().await.unwrap_or_default();
		error!("Image upload failed with status {}: {}", status, body);
		return Err(ErrorType::server_error(format!(
			"image CDN responded with {}",
			status
		)));
	}

	let url = response.json::<UploadResponse>().await?.secure_url;
	debug!("Uploaded image to `{}`", url);
	Ok(url)
}
