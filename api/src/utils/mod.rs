pub mod config;
pub mod constants;
pub mod extractors;
pub mod handlebar_registry;
pub mod logger;
pub mod mailer;
pub mod validator;
