// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outcome of one collection cycle.

use chrono::{DateTime, Utc};
use plexstat_core::DataKind;
use serde::Serialize;
use uuid::Uuid;

/// What happened to one data kind during a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindReport {
	pub kind: DataKind,
	/// Points produced by aggregation.
	pub points: usize,
	pub written: usize,
	pub failed_writes: usize,
	/// Records dropped as malformed.
	pub skipped_records: usize,
	/// Fetch or snapshot failure; no points are produced when set.
	pub error: Option<String>,
}

impl KindReport {
	pub(crate) fn empty(kind: DataKind) -> Self {
		Self {
			kind,
			points: 0,
			written: 0,
			failed_writes: 0,
			skipped_records: 0,
			error: None,
		}
	}

	pub(crate) fn failed(kind: DataKind, error: String) -> Self {
		Self {
			error: Some(error),
			..Self::empty(kind)
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
	pub cycle_id: Uuid,
	pub started_at: DateTime<Utc>,
	pub finished_at: DateTime<Utc>,
	pub kinds: Vec<KindReport>,
}

impl CycleReport {
	pub fn kind(&self, kind: DataKind) -> Option<&KindReport> {
		self.kinds.iter().find(|r| r.kind == kind)
	}

	/// True when any data kind failed to fetch or parse.
	pub fn has_fetch_failure(&self) -> bool {
		self.kinds.iter().any(|r| r.error.is_some())
	}

	pub fn points_written(&self) -> usize {
		self.kinds.iter().map(|r| r.written).sum()
	}

	pub fn failed_writes(&self) -> usize {
		self.kinds.iter().map(|r| r.failed_writes).sum()
	}

	pub fn duration_ms(&self) -> i64 {
		(self.finished_at - self.started_at).num_milliseconds()
	}
}
