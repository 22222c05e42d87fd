// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Navigation of the PlexPy response envelope.
//!
//! Every API v2 document looks like
//! `{"response": {"result": "success", "message": null, "data": ...}}`.

use serde_json::Value;

use crate::de::json_type;
use crate::error::{Result, SnapshotError};

/// Returns `response.data`, which must be present and non-null.
pub fn response_data(snapshot: &Value) -> Result<&Value> {
	let response = snapshot
		.get("response")
		.ok_or(SnapshotError::MissingField("response"))?;

	match response.get("data") {
		None | Some(Value::Null) => Err(SnapshotError::MissingField("response.data")),
		Some(data) => Ok(data),
	}
}

/// Interprets `value` as a list of records. Missing or `null` means empty.
pub(crate) fn records<'a>(value: Option<&'a Value>, path: &'static str) -> Result<&'a [Value]> {
	match value {
		None | Some(Value::Null) => Ok(&[]),
		Some(Value::Array(items)) => Ok(items),
		Some(other) => Err(SnapshotError::UnexpectedType {
			path,
			found: json_type(other),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn missing_response_is_reported() {
		let err = response_data(&json!({"data": []})).unwrap_err();
		assert_eq!(err, SnapshotError::MissingField("response"));
	}

	#[test]
	fn null_data_is_reported() {
		let err = response_data(&json!({"response": {"data": null}})).unwrap_err();
		assert_eq!(err, SnapshotError::MissingField("response.data"));
	}

	#[test]
	fn records_treats_null_as_empty() {
		assert!(records(Some(&Value::Null), "x").unwrap().is_empty());
		assert!(records(None, "x").unwrap().is_empty());
	}

	#[test]
	fn records_rejects_objects() {
		let value = json!({"not": "a list"});
		let err = records(Some(&value), "response.data").unwrap_err();
		assert_eq!(
			err,
			SnapshotError::UnexpectedType {
				path: "response.data",
				found: "object"
			}
		);
	}
}
