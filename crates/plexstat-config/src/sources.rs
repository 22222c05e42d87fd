// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults and environment variables.

use std::sync::Arc;

use plexstat_common_config::{load_secret_with, process_env, SecretString};
use tracing::debug;

use crate::error::ConfigError;
use crate::layer::PlexstatConfigLayer;
use crate::sections::{
	InfluxConfigLayer, LoggingConfigLayer, PlexPyConfigLayer, PollingConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<PlexstatConfigLayer, ConfigError>;
}

/// Built-in defaults source. Defaults themselves are applied at finalize time.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<PlexstatConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(PlexstatConfigLayer::default())
	}
}

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Environment variable source.
///
/// Variable names follow the long-standing `PLEXPY_*` / `INFLUX_*` /
/// `UPDATE_INTERVAL_MS` convention; newer settings use `PLEXSTAT_*`.
pub struct EnvSource {
	lookup: Lookup,
}

impl EnvSource {
	/// Reads the process environment.
	pub fn process() -> Self {
		Self::with_lookup(process_env)
	}

	/// Reads variables through `lookup` instead of the process environment.
	pub fn with_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String> + Send + Sync + 'static,
	{
		Self {
			lookup: Arc::new(lookup),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		(self.lookup)(name).filter(|v| !v.trim().is_empty())
	}

	fn bool(&self, name: &str) -> Result<Option<bool>, ConfigError> {
		match self.var(name) {
			Some(v) => match v.trim().to_ascii_lowercase().as_str() {
				"true" | "1" | "yes" | "on" => Ok(Some(true)),
				"false" | "0" | "no" | "off" => Ok(Some(false)),
				_ => Err(ConfigError::InvalidValue {
					key: name.to_string(),
					message: format!("invalid boolean value '{v}'"),
				}),
			},
			None => Ok(None),
		}
	}

	fn u16(&self, name: &str) -> Result<Option<u16>, ConfigError> {
		match self.var(name) {
			Some(v) => v.trim().parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid u16 value '{v}'"),
			}),
			None => Ok(None),
		}
	}

	fn u64(&self, name: &str) -> Result<Option<u64>, ConfigError> {
		match self.var(name) {
			Some(v) => v.trim().parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid u64 value '{v}'"),
			}),
			None => Ok(None),
		}
	}

	/// `NAME_FILE` wins over `NAME`.
	fn secret(&self, name: &str) -> Result<Option<SecretString>, ConfigError> {
		load_secret_with(|n: &str| self.var(n), name).map_err(|e| ConfigError::Secret(e.to_string()))
	}

	fn load_plexpy(&self) -> Result<PlexPyConfigLayer, ConfigError> {
		Ok(PlexPyConfigLayer {
			protocol: self.var("PLEXPY_PROTOCOL"),
			host: self.var("PLEXPY_HOST"),
			port: self.u16("PLEXPY_PORT")?,
			base_path: self.var("PLEXPY_BASEURL"),
			token: self.secret("PLEXPY_TOKEN")?,
			timeout_ms: self.u64("PLEXPY_TIMEOUT_MS")?,
		})
	}

	fn load_influx(&self) -> Result<InfluxConfigLayer, ConfigError> {
		Ok(InfluxConfigLayer {
			protocol: self.var("INFLUX_PROTOCOL"),
			host: self.var("INFLUX_HOST"),
			port: self.u16("INFLUX_PORT")?,
			database: self.var("INFLUX_DB"),
			username: self.var("INFLUX_USER"),
			password: self.secret("INFLUX_PASS")?,
			timeout_ms: self.u64("INFLUX_TIMEOUT_MS")?,
		})
	}

	fn load_polling(&self) -> Result<PollingConfigLayer, ConfigError> {
		Ok(PollingConfigLayer {
			interval_ms: self.u64("UPDATE_INTERVAL_MS")?,
			group_by_resolution: self.bool("PLEXSTAT_GROUP_BY_RESOLUTION")?,
			emit_session_points: self.bool("PLEXSTAT_EMIT_SESSION_POINTS")?,
			emit_sessions_points: self.bool("PLEXSTAT_EMIT_SESSIONS_POINTS")?,
		})
	}

	fn load_logging(&self) -> LoggingConfigLayer {
		LoggingConfigLayer {
			level: self.var("PLEXSTAT_LOG"),
		}
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<PlexstatConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(PlexstatConfigLayer {
			plexpy: Some(self.load_plexpy()?),
			influx: Some(self.load_influx()?),
			polling: Some(self.load_polling()?),
			logging: Some(self.load_logging()),
		})
	}
}
