// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// A single point could not be written.
#[derive(Debug, Error)]
pub enum WriteError {
	#[error("point for measurement '{measurement}' has no encodable fields")]
	EmptyPoint { measurement: String },

	#[error("InfluxDB rejected write with status {status}: {body}")]
	Rejected { status: u16, body: String },

	/// Transport failure. The URL is stripped so credentials never reach logs.
	#[error("HTTP request failed: {0}")]
	Request(reqwest::Error),
}

impl From<reqwest::Error> for WriteError {
	fn from(e: reqwest::Error) -> Self {
		WriteError::Request(e.without_url())
	}
}

/// The sink could not be constructed.
#[derive(Debug, Error)]
pub enum BuildError {
	#[error("invalid InfluxDB endpoint '{url}': {message}")]
	InvalidEndpoint { url: String, message: String },

	#[error("failed to build HTTP client: {0}")]
	Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, WriteError>;
