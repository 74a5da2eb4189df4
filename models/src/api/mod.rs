//! Request and response bodies for every endpoint of the API, grouped by the
//! area of the site they belong to.

pub mod auth;
pub mod blog;
pub mod contact;
pub mod media;
pub mod registration;
pub mod student;
