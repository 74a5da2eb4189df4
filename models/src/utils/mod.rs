mod bools;
mod slug;

pub use self::{bools::*, slug::*};

/// All the constants used in the application.
/// Constants are used to avoid hardcoding values, since that might introduce
/// typos.
pub mod constants {
	/// Where unauthenticated users are sent when they try to open a dashboard
	pub const LOGIN_PATH: &str = "/login";
	/// Separator between the course name and the level name in a course URL
	pub const LEVEL_SEPARATOR: &str = "-level-";
}
