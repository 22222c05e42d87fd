// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;
use serde_json::Value;

use crate::de;
use crate::point::{measurement, MetricPoint};

/// Cumulative statistics for one user from `get_users_table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStat {
	pub friendly_name: Option<String>,
	/// Total watch time in seconds.
	pub duration: i64,
	pub plays: i64,
}

#[derive(Deserialize)]
struct RawUser {
	#[serde(default, deserialize_with = "de::opt_string")]
	friendly_name: Option<String>,
	#[serde(default)]
	duration: Option<Value>,
	#[serde(default)]
	plays: Option<Value>,
}

impl UserStat {
	/// Decodes one record.
	///
	/// Users who never played anything come back with `null` totals, which
	/// count as zero. Any other non-numeric total rejects the record.
	pub fn from_record(record: &Value) -> Result<Self, String> {
		let raw = RawUser::deserialize(record).map_err(|e| e.to_string())?;

		Ok(Self {
			friendly_name: raw.friendly_name,
			duration: total(raw.duration.as_ref(), "duration")?,
			plays: total(raw.plays.as_ref(), "plays")?,
		})
	}

	pub fn to_point(&self) -> MetricPoint {
		MetricPoint::new(measurement::USERS)
			.field("duration", self.duration)
			.field("plays", self.plays)
			.tag_opt("username", self.friendly_name.clone())
	}
}

fn total(value: Option<&Value>, name: &str) -> Result<i64, String> {
	match value {
		None | Some(Value::Null) => Ok(0),
		Some(v) => de::coerce_i64(v).map_err(|e| format!("invalid {name}: {e}")),
	}
}
