// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for snapshot aggregation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnapshotError>;

/// The snapshot as a whole could not be interpreted.
///
/// Treated like a fetch failure: no points are produced for that data kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
	#[error("snapshot is missing `{0}`")]
	MissingField(&'static str),

	#[error("`{path}` should be an array, found {found}")]
	UnexpectedType {
		path: &'static str,
		found: &'static str,
	},
}

/// A single record inside an otherwise valid snapshot was malformed.
///
/// The record is skipped and the rest of the batch is still aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {index} skipped: {reason}")]
pub struct RecordError {
	pub index: usize,
	pub reason: String,
}

impl RecordError {
	pub fn new(index: usize, reason: impl Into<String>) -> Self {
		Self {
			index,
			reason: reason.into(),
		}
	}
}
