mod json;
mod session;

pub use self::{json::*, session::*};
