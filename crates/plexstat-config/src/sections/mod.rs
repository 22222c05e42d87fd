// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod influx;
mod logging;
mod plexpy;
mod polling;

pub use influx::{InfluxConfig, InfluxConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use plexpy::{PlexPyConfig, PlexPyConfigLayer};
pub use polling::{PollingConfig, PollingConfigLayer};

use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Lowercases and checks a URL scheme; only `http` and `https` are served.
pub(crate) fn parse_protocol(key: &str, raw: Option<String>) -> Result<String, ConfigError> {
	let protocol = raw.unwrap_or_else(|| "http".to_string()).to_ascii_lowercase();
	match protocol.as_str() {
		"http" | "https" => Ok(protocol),
		_ => Err(ConfigError::InvalidValue {
			key: key.to_string(),
			message: format!("unsupported protocol '{protocol}', expected http or https"),
		}),
	}
}

/// A zero request timeout would fail every request, so it is rejected.
pub(crate) fn parse_timeout(key: &str, raw: Option<u64>) -> Result<Duration, ConfigError> {
	match raw {
		Some(0) => Err(ConfigError::Validation(format!("{key} must be greater than zero"))),
		Some(ms) => Ok(Duration::from_millis(ms)),
		None => Ok(Duration::from_millis(DEFAULT_TIMEOUT_MS)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn protocol_defaults_to_http() {
		assert_eq!(parse_protocol("X", None).unwrap(), "http");
	}

	#[test]
	fn protocol_is_case_insensitive() {
		assert_eq!(parse_protocol("X", Some("HTTPS".to_string())).unwrap(), "https");
	}

	#[test]
	fn unknown_protocol_is_rejected() {
		let err = parse_protocol("PLEXPY_PROTOCOL", Some("ftp".to_string())).unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PLEXPY_PROTOCOL"));
	}

	#[test]
	fn timeout_defaults_to_ten_seconds() {
		assert_eq!(parse_timeout("X", None).unwrap(), Duration::from_secs(10));
		assert_eq!(parse_timeout("X", Some(250)).unwrap(), Duration::from_millis(250));
	}

	#[test]
	fn zero_timeout_is_rejected() {
		let err = parse_timeout("INFLUX_TIMEOUT_MS", Some(0)).unwrap_err();
		assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("INFLUX_TIMEOUT_MS")));
	}
}
