// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! PlexPy API connection settings.

use std::time::Duration;

use plexstat_common_config::SecretString;

use super::{parse_protocol, parse_timeout};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlexPyConfigLayer {
	pub protocol: Option<String>,
	pub host: Option<String>,
	pub port: Option<u16>,
	pub base_path: Option<String>,
	pub token: Option<SecretString>,
	pub timeout_ms: Option<u64>,
}

impl PlexPyConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.protocol.is_some() {
			self.protocol = other.protocol;
		}
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.base_path.is_some() {
			self.base_path = other.base_path;
		}
		if other.token.is_some() {
			self.token = other.token;
		}
		if other.timeout_ms.is_some() {
			self.timeout_ms = other.timeout_ms;
		}
	}

	/// The token has no default; a missing token is fatal.
	pub fn finalize(self) -> Result<PlexPyConfig, ConfigError> {
		let token = self
			.token
			.ok_or_else(|| ConfigError::MissingEnvVar("PLEXPY_TOKEN".to_string()))?;

		Ok(PlexPyConfig {
			protocol: parse_protocol("PLEXPY_PROTOCOL", self.protocol)?,
			host: self.host.unwrap_or_else(|| "localhost".to_string()),
			port: self.port.unwrap_or(8181),
			base_path: self.base_path.unwrap_or_default(),
			token,
			timeout: parse_timeout("PLEXPY_TIMEOUT_MS", self.timeout_ms)?,
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlexPyConfig {
	pub protocol: String,
	pub host: String,
	pub port: u16,
	pub base_path: String,
	pub token: SecretString,
	pub timeout: Duration,
}
