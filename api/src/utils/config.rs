use std::{
	env,
	fmt::{Display, Formatter},
	net::SocketAddr,
	time::Duration,
};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Reads the config from `config/{dev|prod}` and `APP_` environment
/// variables, the latter taking precedence. Debug builds always use the dev
/// config; release builds pick one with `APP_ENV`.
#[instrument]
pub fn parse_config() -> Result<AppConfig, ConfigError> {
	trace!("Reading config data...");

	let env = if cfg!(debug_assertions) {
		"dev".to_string()
	} else {
		env::var("APP_ENV").unwrap_or_else(|_| "prod".into())
	};

	match env.as_ref() {
		"prod" | "production" => Config::builder()
			.add_source(File::with_name("config/prod").required(false))
			.set_default("environment", "production")?,
		"dev" | "development" => Config::builder()
			.add_source(File::with_name("config/dev").required(false))
			.set_default("environment", "development")?,
		other => {
			return Err(ConfigError::Message(format!(
				"unknown running environment `{}`",
				other
			)))
		}
	}
	.add_source(Environment::with_prefix("APP").separator("_"))
	.build()?
	.try_deserialize()
}

/// The configuration of the whole API. Keys are camelCase in the config
/// files; environment variables arrive lowercased, hence the aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
	#[serde(alias = "bindaddr")]
	pub bind_addr: SocketAddr,
	pub environment: RunningEnvironment,
	/// The secret access tokens are signed with
	#[serde(alias = "jwtsecret")]
	pub jwt_secret: String,
	/// Timeout in seconds for calls to hosted services. Unset means calls
	/// wait for as long as the service takes.
	#[serde(default, alias = "requesttimeout")]
	pub request_timeout: Option<u64>,
	/// Origins allowed to call the API from a browser. Empty allows any.
	#[serde(default, alias = "allowedorigins")]
	pub allowed_origins: Vec<String>,
	pub database: DatabaseConfig,
	pub auth: AuthConfig,
	pub email: EmailConfig,
	pub contact: ContactConfig,
	#[serde(alias = "textgeneration")]
	pub text_generation: TextGenerationConfig,
	pub media: MediaConfig,
}

impl AppConfig {
	pub fn request_timeout(&self) -> Option<Duration> {
		self.request_timeout.map(Duration::from_secs)
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RunningEnvironment {
	Development,
	Production,
}

impl Display for RunningEnvironment {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			formatter,
			"{}",
			match self {
				RunningEnvironment::Development => "Development",
				RunningEnvironment::Production => "Production",
			}
		)
	}
}

/// Where the academy's documents are kept
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DatabaseConfig {
	#[serde(rename_all = "camelCase")]
	Firestore {
		#[serde(alias = "projectid")]
		project_id: String,
		#[serde(default, alias = "databaseid")]
		database_id: Option<String>,
		#[serde(default, alias = "apikey")]
		api_key: Option<String>,
		/// An OAuth token with access to the database, for servers that are
		/// not allowed through the security rules with just the API key
		#[serde(default, alias = "accesstoken")]
		access_token: Option<String>,
	},
	#[serde(rename_all = "camelCase")]
	Memory {
		#[serde(default, alias = "seedfile")]
		seed_file: Option<String>,
	},
}

/// Who verifies passwords
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AuthConfig {
	#[serde(rename_all = "camelCase")]
	Firebase {
		#[serde(alias = "apikey")]
		api_key: String,
		/// Overrides the identity toolkit URL, for the auth emulator
		#[serde(default, alias = "baseurl")]
		base_url: Option<String>,
	},
	Memory {
		#[serde(default)]
		accounts: Vec<MemoryAccount>,
	},
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryAccount {
	pub email: String,
	pub password: String,
}

/// The SMTP relay mail is sent through. Without a host, mail is rendered
/// and logged instead of sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailConfig {
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default = "default_smtp_port")]
	pub port: u16,
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub password: String,
	/// The sender of every mail, as `Name <address>`
	pub from: String,
}

fn default_smtp_port() -> u16 {
	587
}

/// Where messages from the contact form go
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactConfig {
	pub recipient: String,
	#[serde(default = "default_contact_subject")]
	pub subject: String,
}

fn default_contact_subject() -> String {
	"New contact form submission".to_string()
}

/// The OpenAI compatible service blog posts are generated with
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextGenerationConfig {
	#[serde(default = "default_text_generation_url", alias = "baseurl")]
	pub base_url: String,
	#[serde(default, alias = "apikey")]
	pub api_key: String,
	#[serde(default = "default_text_generation_model")]
	pub model: String,
	#[serde(default, alias = "systemprompt")]
	pub system_prompt: Option<String>,
}

fn default_text_generation_url() -> String {
	"https://api.openai.com/v1".to_string()
}

fn default_text_generation_model() -> String {
	"gpt-4o-mini".to_string()
}

/// The image CDN uploads are forwarded to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaConfig {
	/// The unsigned upload endpoint, such as
	/// `https://api.cloudinary.com/v1_1/{cloud}/image/upload`
	#[serde(alias = "uploadurl")]
	pub upload_url: String,
	#[serde(alias = "uploadpreset")]
	pub upload_preset: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sections_deserialize_from_camel_case_and_env_keys() {
		let config: AppConfig = serde_json::from_value(serde_json::json!({
			"bindaddr": "127.0.0.1:3000",
			"environment": "development",
			"jwtSecret": "secret",
			"database": { "type": "firestore", "projectid": "academy" },
			"auth": {
				"type": "memory",
				"accounts": [{ "email": "jane@x.com", "password": "pw" }]
			},
			"email": { "from": "Academy <noreply@academy.test>" },
			"contact": { "recipient": "office@academy.test" },
			"textGeneration": { "apiKey": "sk-test" },
			"media": { "uploadUrl": "https://cdn.test/upload", "uploadPreset": "blogs" }
		}))
		.unwrap();

		assert_eq!(config.bind_addr.port(), 3000);
		assert!(matches!(
			config.database,
			DatabaseConfig::Firestore { ref project_id, database_id: None, .. } if project_id == "academy"
		));
		assert_eq!(config.email.port, 587);
		assert!(config.email.host.is_none());
		assert_eq!(config.contact.subject, "New contact form submission");
		assert_eq!(config.text_generation.model, "gpt-4o-mini");
		assert_eq!(config.request_timeout(), None);
	}
}
