// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The unit of data handed to a metrics sink.

use serde::Serialize;
use std::collections::BTreeMap;

/// Measurement names written by the aggregators.
pub mod measurement {
	pub const SESSIONS: &str = "sessions";
	pub const SESSION: &str = "session";
	pub const LIBRARY: &str = "library";
	pub const USERS: &str = "users";
}

/// A field value. Fields are stored but not indexed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
	Integer(i64),
	Float(f64),
	Boolean(bool),
}

impl From<i64> for FieldValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<u64> for FieldValue {
	fn from(value: u64) -> Self {
		Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
	}
}

impl From<f64> for FieldValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		Self::Boolean(value)
	}
}

pub type Fields = BTreeMap<String, FieldValue>;

/// Tag values may be absent; sinks drop absent tags before writing.
pub type Tags = BTreeMap<String, Option<String>>;

/// One time-series point: a measurement name, fields and tags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPoint {
	pub measurement: String,
	pub fields: Fields,
	pub tags: Tags,
}

impl MetricPoint {
	pub fn new(measurement: impl Into<String>) -> Self {
		Self {
			measurement: measurement.into(),
			fields: Fields::new(),
			tags: Tags::new(),
		}
	}

	pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
		self.fields.insert(key.into(), value.into());
		self
	}

	/// Adds the field only when a value is present.
	pub fn field_opt<V>(self, key: impl Into<String>, value: Option<V>) -> Self
	where
		V: Into<FieldValue>,
	{
		match value {
			Some(v) => self.field(key, v),
			None => self,
		}
	}

	pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.tags.insert(key.into(), Some(value.into()));
		self
	}

	/// Records the tag even when absent so the key set stays stable per measurement.
	pub fn tag_opt(mut self, key: impl Into<String>, value: Option<String>) -> Self {
		self.tags.insert(key.into(), value);
		self
	}

	pub fn field_value(&self, key: &str) -> Option<FieldValue> {
		self.fields.get(key).copied()
	}

	pub fn tag_value(&self, key: &str) -> Option<&str> {
		self.tags.get(key).and_then(|v| v.as_deref())
	}

	/// Tags with a non-empty value, in key order.
	pub fn present_tags(&self) -> impl Iterator<Item = (&str, &str)> {
		self
			.tags
			.iter()
			.filter_map(|(k, v)| v.as_deref().filter(|v| !v.is_empty()).map(|v| (k.as_str(), v)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builder_collects_fields_and_tags() {
		let point = MetricPoint::new(measurement::LIBRARY)
			.field("count", 42i64)
			.tag("type", "movie")
			.tag_opt("section", None);

		assert_eq!(point.measurement, "library");
		assert_eq!(point.field_value("count"), Some(FieldValue::Integer(42)));
		assert_eq!(point.tag_value("type"), Some("movie"));
		assert_eq!(point.tag_value("section"), None);
		assert!(point.tags.contains_key("section"));
	}

	#[test]
	fn field_opt_skips_missing_values() {
		let point = MetricPoint::new("session")
			.field_opt("progress_percent", Some(12.5))
			.field_opt::<f64>("transcode_progress", None);

		assert_eq!(point.fields.len(), 1);
	}

	#[test]
	fn present_tags_skips_absent_and_empty() {
		let point = MetricPoint::new("session")
			.tag("user", "alice")
			.tag("player", "")
			.tag_opt("title", None);

		let tags: Vec<_> = point.present_tags().collect();
		assert_eq!(tags, vec![("user", "alice")]);
	}

	#[test]
	fn oversized_counts_saturate() {
		assert_eq!(FieldValue::from(u64::MAX), FieldValue::Integer(i64::MAX));
	}
}
