// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! InfluxDB line protocol encoding.
//!
//! `measurement[,tag=value...] field=value[,field=value...]`
//!
//! No timestamp is written; the server assigns one on receipt.

use std::fmt::Write;

use plexstat_core::{FieldValue, MetricPoint};

use crate::error::{Result, WriteError};

/// Encodes one point as a single line without a trailing newline.
///
/// Absent and empty tags are dropped. Non-finite floats are dropped. A point
/// left without fields is rejected.
pub fn encode(point: &MetricPoint) -> Result<String> {
	let fields: Vec<(&str, String)> = point
		.fields
		.iter()
		.filter_map(|(key, value)| format_field(value).map(|v| (key.as_str(), v)))
		.collect();

	if fields.is_empty() {
		return Err(WriteError::EmptyPoint {
			measurement: point.measurement.clone(),
		});
	}

	let mut line = escape_measurement(&point.measurement);

	for (key, value) in point.present_tags() {
		let _ = write!(line, ",{}={}", escape_key(key), escape_key(value));
	}

	for (i, (key, value)) in fields.iter().enumerate() {
		line.push(if i == 0 { ' ' } else { ',' });
		let _ = write!(line, "{}={}", escape_key(key), value);
	}

	Ok(line)
}

fn format_field(value: &FieldValue) -> Option<String> {
	match value {
		FieldValue::Integer(i) => Some(format!("{i}i")),
		FieldValue::Float(f) if f.is_finite() => Some(f.to_string()),
		FieldValue::Float(_) => None,
		FieldValue::Boolean(b) => Some(b.to_string()),
	}
}

fn escape_measurement(raw: &str) -> String {
	escape(raw, &[',', ' '])
}

/// Tag keys, tag values and field keys share one rule.
fn escape_key(raw: &str) -> String {
	escape(raw, &[',', '=', ' '])
}

/// Line breaks cannot be escaped in line protocol, so they become spaces.
/// Backslashes are doubled so a trailing one never swallows a separator.
fn escape(raw: &str, special: &[char]) -> String {
	let mut out = String::with_capacity(raw.len());
	for c in raw.chars() {
		let c = if c == '\n' || c == '\r' { ' ' } else { c };
		if c == '\\' || special.contains(&c) {
			out.push('\\');
		}
		out.push(c);
	}
	out
}
