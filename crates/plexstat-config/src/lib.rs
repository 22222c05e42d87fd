// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process configuration for plexstat.
//!
//! Configuration is read once at startup from built-in defaults overlaid with
//! environment variables. Secrets (`PLEXPY_TOKEN`, `INFLUX_PASS`) may also be
//! supplied through a `*_FILE` variable pointing at a file.
//!
//! # Usage
//!
//! ```ignore
//! use plexstat_config::load_config;
//!
//! let config = load_config()?;
//! println!("Polling every {:?}", config.polling.interval);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::PlexstatConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence};

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlexstatConfig {
	pub plexpy: PlexPyConfig,
	pub influx: InfluxConfig,
	pub polling: PollingConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from defaults and the process environment.
///
/// Precedence (highest to lowest):
/// 1. Environment variables
/// 2. Built-in defaults
pub fn load_config() -> Result<PlexstatConfig, ConfigError> {
	load_from_sources(vec![Box::new(DefaultsSource), Box::new(EnvSource::process())])
}

/// Load configuration with variables resolved through `lookup`.
pub fn load_config_from<F>(lookup: F) -> Result<PlexstatConfig, ConfigError>
where
	F: Fn(&str) -> Option<String> + Send + Sync + 'static,
{
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(EnvSource::with_lookup(lookup)),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<PlexstatConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = PlexstatConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: PlexstatConfigLayer) -> Result<PlexstatConfig, ConfigError> {
	let plexpy = layer.plexpy.unwrap_or_default().finalize()?;
	let influx = layer.influx.unwrap_or_default().finalize()?;
	let polling = layer.polling.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();

	info!(
		plexpy_host = %plexpy.host,
		plexpy_port = plexpy.port,
		influx_host = %influx.host,
		influx_port = influx.port,
		influx_database = %influx.database,
		interval_ms = polling.interval.as_millis() as u64,
		group_by_resolution = polling.activity.group_by_resolution,
		"Configuration loaded"
	);

	Ok(PlexstatConfig {
		plexpy,
		influx,
		polling,
		logging,
	})
}
