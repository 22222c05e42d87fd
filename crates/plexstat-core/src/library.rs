// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;
use serde_json::Value;

use crate::de;
use crate::point::{measurement, MetricPoint};

/// One library section from `get_libraries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySection {
	pub section_name: Option<String>,
	pub section_type: Option<String>,
	pub count: i64,
}

#[derive(Deserialize)]
struct RawSection {
	#[serde(default, deserialize_with = "de::opt_string")]
	section_name: Option<String>,
	#[serde(default, deserialize_with = "de::opt_string")]
	section_type: Option<String>,
	#[serde(default)]
	count: Option<Value>,
}

impl LibrarySection {
	/// Decodes one record. A missing or non-numeric `count` rejects the record.
	pub fn from_record(record: &Value) -> Result<Self, String> {
		let raw = RawSection::deserialize(record).map_err(|e| e.to_string())?;
		let count = raw
			.count
			.as_ref()
			.ok_or_else(|| "missing count".to_string())
			.and_then(|v| de::coerce_i64(v).map_err(|e| format!("invalid count: {e}")))?;

		Ok(Self {
			section_name: raw.section_name,
			section_type: raw.section_type,
			count,
		})
	}

	pub fn to_point(&self) -> MetricPoint {
		MetricPoint::new(measurement::LIBRARY)
			.field("count", self.count)
			.tag_opt("type", self.section_type.clone())
			.tag_opt("section", self.section_name.clone())
	}
}
