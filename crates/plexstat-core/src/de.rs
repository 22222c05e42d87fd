// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lenient field decoding.
//!
//! PlexPy reports most numbers as JSON strings (`"progress_percent": "45"`)
//! and a few identifiers as numbers, so optional fields accept either.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
	Int(i64),
	Float(f64),
	Text(String),
	Other(IgnoredAny),
}

pub(crate) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Loose>::deserialize(deserializer)? {
		Some(Loose::Int(i)) => Some(i.to_string()),
		Some(Loose::Float(f)) => Some(f.to_string()),
		Some(Loose::Text(s)) if !s.is_empty() => Some(s),
		_ => None,
	})
}

/// Unparseable values decode as `None`.
pub(crate) fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Loose>::deserialize(deserializer)? {
		Some(Loose::Int(i)) => Some(i as f64),
		Some(Loose::Float(f)) if f.is_finite() => Some(f),
		Some(Loose::Text(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
		_ => None,
	})
}

/// Unparseable values decode as `None`.
pub(crate) fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Loose>::deserialize(deserializer)? {
		Some(Loose::Int(i)) => Some(i),
		Some(Loose::Float(f)) => float_to_i64(f),
		Some(Loose::Text(s)) => parse_i64(&s),
		_ => None,
	})
}

/// Strict integer coercion used where a bad value must reject the record.
pub(crate) fn coerce_i64(value: &Value) -> Result<i64, String> {
	match value {
		Value::Number(n) => n
			.as_i64()
			.or_else(|| n.as_f64().and_then(float_to_i64))
			.ok_or_else(|| format!("number {n} is out of range")),
		Value::String(s) => parse_i64(s).ok_or_else(|| format!("'{s}' is not a number")),
		Value::Null => Err("value is null".to_string()),
		other => Err(format!("expected a number, found {}", json_type(other))),
	}
}

pub(crate) fn json_type(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

fn parse_i64(s: &str) -> Option<i64> {
	let s = s.trim();
	s.parse::<i64>()
		.ok()
		.or_else(|| s.parse::<f64>().ok().and_then(float_to_i64))
}

fn float_to_i64(f: f64) -> Option<i64> {
	if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
		Some(f as i64)
	} else {
		None
	}
}
