use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tokio::{net::TcpListener, signal, task, time::interval};

use crate::{
	db::{self, DocumentStore},
	prelude::*,
	routes,
	service::{AuthProvider, FirebaseAuth, MemoryAuth, SessionStore},
	utils::{
		handlebar_registry::{self, EMAIL_TEMPLATE_FOLDER},
		mailer::Mailer,
	},
};

/// The global state of the application. Cloned into every request; every
/// field is shared.
#[derive(Clone)]
pub struct AppState {
	/// The application configuration
	pub config: Arc<AppConfig>,
	/// Where every record of the academy is kept
	pub database: Arc<dyn DocumentStore>,
	/// Verifies credentials on login
	pub auth: Arc<dyn AuthProvider>,
	/// The sessions of logged in users
	pub sessions: Arc<SessionStore>,
	pub mailer: Arc<Mailer>,
	/// Client for calls to hosted services
	pub http: Client,
}

impl AppState {
	/// Connects to everything the config points at
	#[instrument(skip_all)]
	pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
		let mut http = Client::builder().user_agent(concat!(
			env!("CARGO_PKG_NAME"),
			"/",
			env!("CARGO_PKG_VERSION")
		));
		if let Some(timeout) = config.request_timeout() {
			http = http.timeout(timeout);
		}
		let http = http.build()?;

		let database = db::connect(&config.database, &http).await?;
		debug!("Document store ready");

		let auth: Arc<dyn AuthProvider> = match &config.auth {
			AuthConfig::Firebase { api_key, base_url } => Arc::new(FirebaseAuth::new(
				http.clone(),
				api_key.clone(),
				base_url.clone(),
			)),
			AuthConfig::Memory { accounts } => {
				warn!("Using in-memory accounts. Do not use this in production");
				Arc::new(accounts.iter().fold(MemoryAuth::new(), |auth, account| {
					auth.with_account(&account.email, &account.password)
				}))
			}
		};

		let templates = handlebar_registry::initialize_handlebar_registry(EMAIL_TEMPLATE_FOLDER)?;
		let mailer = Mailer::from_config(&config.email, config.request_timeout(), templates)?;
		debug!("Mailer ready");

		Ok(Self {
			sessions: Arc::new(SessionStore::new(config.jwt_secret.clone())),
			mailer: Arc::new(mailer),
			config: Arc::new(config),
			database,
			auth,
			http,
		})
	}
}

/// How often sessions that expired without a logout are dropped
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Serves the API until the process is asked to stop
pub async fn start_server(state: AppState) -> std::io::Result<()> {
	task::spawn(sweep_expired_sessions(state.sessions.clone()));

	let listener = TcpListener::bind(state.config.bind_addr).await?;
	info!("Listening for connections on {}", state.config.bind_addr);

	axum::serve(listener, routes::setup_routes(&state))
		.with_graceful_shutdown(shutdown_signal())
		.await
}

async fn shutdown_signal() {
	if let Err(err) = signal::ctrl_c().await {
		error!("Unable to listen for shutdown signal: {}", err);
		// Never resolve, so the server keeps running
		std::future::pending::<()>().await;
	}
	info!("Shutting down");
}

async fn sweep_expired_sessions(sessions: Arc<SessionStore>) {
	let mut ticks = interval(SESSION_SWEEP_INTERVAL);
	loop {
		ticks.tick().await;
		sessions.prune_expired().await;
	}
}
