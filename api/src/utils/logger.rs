use tracing::{Dispatch, Level};
use tracing_subscriber::{
	filter::{LevelFilter, Targets},
	fmt::{format::FmtSpan, Layer as FmtLayer},
	layer::SubscriberExt,
	prelude::*,
};

use crate::prelude::*;

/// Sets up the global tracing subscriber. Only events from this crate and
/// the models crate are printed, plus request spans from the HTTP trace layer.
pub fn initialize(environment: &RunningEnvironment) -> Result<(), tracing::dispatcher::SetGlobalDefaultError> {
	tracing::dispatcher::set_global_default(Dispatch::new(
		tracing_subscriber::registry().with(
			FmtLayer::new()
				.with_span_events(FmtSpan::NONE)
				.event_format(
					tracing_subscriber::fmt::format()
						.with_ansi(*environment == RunningEnvironment::Development)
						.with_file(false)
						.compact(),
				)
				.with_filter(
					Targets::new()
						.with_target(env!("CARGO_CRATE_NAME"), LevelFilter::TRACE)
						.with_target("models", LevelFilter::TRACE)
						.with_target("tower_http", LevelFilter::DEBUG),
				)
				.with_filter(LevelFilter::from_level(
					if *environment == RunningEnvironment::Development {
						Level::TRACE
					} else {
						Level::INFO
					},
				)),
		),
	))
}
