// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use crate::sections::{
	InfluxConfigLayer, LoggingConfigLayer, PlexPyConfigLayer, PollingConfigLayer,
};

/// Top-level configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlexstatConfigLayer {
	pub plexpy: Option<PlexPyConfigLayer>,
	pub influx: Option<InfluxConfigLayer>,
	pub polling: Option<PollingConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
}

impl PlexstatConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: PlexstatConfigLayer) {
		merge_option(&mut self.plexpy, other.plexpy, PlexPyConfigLayer::merge);
		merge_option(&mut self.influx, other.influx, InfluxConfigLayer::merge);
		merge_option(&mut self.polling, other.polling, PollingConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}
