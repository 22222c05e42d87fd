// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request construction.
//!
//! Every call builds a fresh [`ApiRequest`] from the fixed [`Endpoint`] and
//! the command for one data kind; nothing shared is mutated per request.

use std::fmt;

use plexstat_common_config::SecretString;
use plexstat_core::DataKind;
use reqwest::Url;

use crate::error::BuildError;

/// The fixed `.../api/v2` URL of one PlexPy instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
	url: Url,
}

impl Endpoint {
	/// Builds `{protocol}://{host}:{port}{base_path}/api/v2`.
	///
	/// `base_path` may be empty or carry leading/trailing slashes; it is
	/// normalised to either nothing or `/segment[/segment...]`.
	pub fn new(protocol: &str, host: &str, port: u16, base_path: &str) -> Result<Self, BuildError> {
		let base = base_path.trim_matches('/');
		let raw = if base.is_empty() {
			format!("{protocol}://{host}:{port}/api/v2")
		} else {
			format!("{protocol}://{host}:{port}/{base}/api/v2")
		};

		let url = Url::parse(&raw).map_err(|e| BuildError::InvalidEndpoint {
			url: raw.clone(),
			message: e.to_string(),
		})?;

		Ok(Self { url })
	}

	pub fn as_str(&self) -> &str {
		self.url.as_str()
	}

	pub fn request(&self, token: &SecretString, kind: DataKind) -> ApiRequest {
		let mut url = self.url.clone();
		url
			.query_pairs_mut()
			.append_pair("apikey", token.expose())
			.append_pair("cmd", kind.command());

		ApiRequest { kind, url }
	}
}

/// One immutable read request. `Debug` hides the API key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
	pub kind: DataKind,
	url: Url,
}

impl ApiRequest {
	/// Full request URL including the API key.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Request URL safe for logging.
	pub fn redacted_url(&self) -> String {
		let mut url = self.url.clone();
		let pairs: Vec<(String, String)> = self
			.url
			.query_pairs()
			.map(|(k, v)| {
				let v = if k == "apikey" {
					plexstat_common_config::REDACTED.to_string()
				} else {
					v.into_owned()
				};
				(k.into_owned(), v)
			})
			.collect();
		url.query_pairs_mut().clear().extend_pairs(pairs);
		url.to_string()
	}
}

impl fmt::Debug for ApiRequest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ApiRequest")
			.field("kind", &self.kind)
			.field("url", &self.redacted_url())
			.finish()
	}
}
