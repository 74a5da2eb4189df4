use serde::{Deserialize, Serialize};

/// Response of `POST /api/media/upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
	/// Public URL of the uploaded image on the CDN
	pub url: String,
}
