// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! InfluxDB connection settings.

use std::time::Duration;

use plexstat_common_config::SecretString;

use super::{parse_protocol, parse_timeout};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfluxConfigLayer {
	pub protocol: Option<String>,
	pub host: Option<String>,
	pub port: Option<u16>,
	pub database: Option<String>,
	pub username: Option<String>,
	pub password: Option<SecretString>,
	pub timeout_ms: Option<u64>,
}

impl InfluxConfigLayer {
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
		if other.database.is_some() {
			self.database = other.database;
		}
		if other.username.is_some() {
			self.username = other.username;
		}
		if other.password.is_some() {
			self.password = other.password;
		}
		if other.timeout_ms.is_some() {
			self.timeout_ms = other.timeout_ms;
		}
	}

	pub fn finalize(self) -> Result<InfluxConfig, ConfigError> {
		Ok(InfluxConfig {
			protocol: parse_protocol("INFLUX_PROTOCOL", self.protocol)?,
			host: self.host.unwrap_or_else(|| "localhost".to_string()),
			port: self.port.unwrap_or(8086),
			database: self.database.unwrap_or_else(|| "plex".to_string()),
			username: self.username,
			password: self.password,
			timeout: parse_timeout("INFLUX_TIMEOUT_MS", self.timeout_ms)?,
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfluxConfig {
	pub protocol: String,
	pub host: String,
	pub port: u16,
	pub database: String,
	pub username: Option<String>,
	pub password: Option<SecretString>,
	pub timeout: Duration,
}
