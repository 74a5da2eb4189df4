//! The HTTP API of the academy website: logins and the role dashboards, the
//! admin tools for student records, blogs and registrations, and the
//! forwarding endpoints for mail, text generation and image uploads.

/// The state shared by every request, and starting the server
mod app;
/// The document store and the queries made against it
mod db;
/// Token formats
mod models;
/// The HTTP routes, one module per area of the site
mod routes;
/// The operations behind the routes
mod service;
/// Config, logging, extractors and other helpers
mod utils;

/// Commonly used items, so that a single glob import is enough in most
/// modules
pub mod prelude {
	pub use models::prelude::*;
	pub use tracing::{debug, error, info, instrument, trace, warn};
	pub use uuid::Uuid;

	pub use crate::{
		app::AppState,
		utils::{config::*, constants},
	};
}

use prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let config = utils::config::parse_config()?;
	utils::logger::initialize(&config.environment)?;
	debug!(
		"Configuration read. Running environment set to {}",
		config.environment
	);

	let state = AppState::from_config(config).await?;
	app::start_server(state).await?;

	Ok(())
}
