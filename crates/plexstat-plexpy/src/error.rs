// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the PlexPy client.

use thiserror::Error;

/// A single fetch failed. The poller treats this as "no data for this kind".
#[derive(Debug, Error)]
pub enum FetchError {
	/// Transport failure. The URL is stripped so the API key never reaches logs.
	#[error("HTTP request failed: {0}")]
	Request(reqwest::Error),

	#[error("server returned {status}: {body}")]
	Status { status: u16, body: String },

	#[error("response body is not valid JSON: {0}")]
	InvalidBody(#[source] serde_json::Error),

	#[error("PlexPy API error: {message}")]
	Api { message: String },
}

impl From<reqwest::Error> for FetchError {
	fn from(e: reqwest::Error) -> Self {
		FetchError::Request(e.without_url())
	}
}

/// The client could not be constructed.
#[derive(Debug, Error)]
pub enum BuildError {
	#[error("API token is required")]
	MissingToken,

	#[error("invalid PlexPy endpoint '{url}': {message}")]
	InvalidEndpoint { url: String, message: String },

	#[error("failed to build HTTP client: {0}")]
	Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;
