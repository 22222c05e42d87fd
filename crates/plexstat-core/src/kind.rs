// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three kinds of data polled every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
	Activity,
	Libraries,
	Users,
}

impl DataKind {
	/// The PlexPy API command that returns this kind of data.
	pub fn command(&self) -> &'static str {
		match self {
			Self::Activity => "get_activity",
			Self::Libraries => "get_libraries",
			Self::Users => "get_users_table",
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Activity => "activity",
			Self::Libraries => "libraries",
			Self::Users => "users",
		}
	}
}

impl fmt::Display for DataKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
