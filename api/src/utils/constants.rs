pub use models::utils::constants::*;

/// Cookie the access token is kept in by browsers
pub const SESSION_COOKIE: &str = "session";

/// Multipart field holding the image of an upload
pub const UPLOAD_FILE_FIELD: &str = "file";

/// Largest image accepted for upload
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Name of the template the contact form mail is rendered with
pub const CONTACT_TEMPLATE: &str = "contact-form";
