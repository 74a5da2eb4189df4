#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::missing_docs_in_private_items)]
#![cfg_attr(
	debug_assertions,
	allow(missing_docs, clippy::missing_docs_in_private_items)
)]

//! Types shared between the academy API and its clients: the request and
//! response bodies of every endpoint, the error taxonomy shown to users, and
//! helpers for the role-templated URLs of the site.

pub mod api;
pub mod utils;

/// Commonly used types, re-exported so that a single glob import is enough in
/// most places.
pub mod prelude {
	pub use crate::{
		utils::{constants, course_path, parse_course_slug, slugify},
		ApiErrorResponse,
		ApiSuccessResponse,
		ErrorType,
		Role,
	};
}

mod error;
mod response;
mod role;

pub use self::{error::*, response::*, role::*};
