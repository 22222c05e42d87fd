// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Poll interval and which activity points to emit.

use std::time::Duration;

use plexstat_core::ActivityOptions;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollingConfigLayer {
	pub interval_ms: Option<u64>,
	pub group_by_resolution: Option<bool>,
	pub emit_session_points: Option<bool>,
	pub emit_sessions_points: Option<bool>,
}

impl PollingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.interval_ms.is_some() {
			self.interval_ms = other.interval_ms;
		}
		if other.group_by_resolution.is_some() {
			self.group_by_resolution = other.group_by_resolution;
		}
		if other.emit_session_points.is_some() {
			self.emit_session_points = other.emit_session_points;
		}
		if other.emit_sessions_points.is_some() {
			self.emit_sessions_points = other.emit_sessions_points;
		}
	}

	pub fn finalize(self) -> Result<PollingConfig, ConfigError> {
		let defaults = PollingConfig::default();

		let interval = match self.interval_ms {
			Some(0) => {
				return Err(ConfigError::Validation(
					"UPDATE_INTERVAL_MS must be greater than zero".to_string(),
				))
			}
			Some(ms) => Duration::from_millis(ms),
			None => defaults.interval,
		};

		Ok(PollingConfig {
			interval,
			activity: ActivityOptions {
				group_by_resolution: self
					.group_by_resolution
					.unwrap_or(defaults.activity.group_by_resolution),
				emit_per_session: self
					.emit_session_points
					.unwrap_or(defaults.activity.emit_per_session),
				emit_aggregate: self
					.emit_sessions_points
					.unwrap_or(defaults.activity.emit_aggregate),
			},
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollingConfig {
	/// Delay between the end of one cycle and the start of the next.
	pub interval: Duration,
	pub activity: ActivityOptions,
}

impl Default for PollingConfig {
	fn default() -> Self {
		Self {
			interval: Duration::from_secs(30),
			activity: ActivityOptions::default(),
		}
	}
}
