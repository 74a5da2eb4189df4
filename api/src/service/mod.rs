//! The operations behind every endpoint. Handlers parse the request, pass
//! the parts of the [`AppState`] an operation needs, and shape the result;
//! everything in between lives here.
//!
//! [`AppState`]: crate::app::AppState

mod auth;
mod blog;
mod media;
mod notifier;
mod registration;
mod session;
mod student;

pub use self::{
	auth::*,
	blog::*,
	media::*,
	notifier::*,
	registration::*,
	session::*,
	student::*,
};
