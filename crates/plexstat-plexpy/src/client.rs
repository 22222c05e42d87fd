// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP data source backed by the PlexPy API.

use std::time::Duration;

use async_trait::async_trait;
use plexstat_common_config::SecretString;
use plexstat_core::DataKind;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::{BuildError, FetchError, Result};
use crate::request::{ApiRequest, Endpoint};

/// Longest error body kept in [`FetchError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Source of raw monitoring snapshots, one per data kind.
#[async_trait]
pub trait DataSource: Send + Sync {
	async fn fetch(&self, kind: DataKind) -> Result<Value>;
}

/// Builder for constructing a [`PlexPyClient`].
pub struct PlexPyClientBuilder {
	protocol: String,
	host: String,
	port: u16,
	base_path: String,
	token: Option<SecretString>,
	request_timeout: Duration,
}

impl PlexPyClientBuilder {
	pub fn new() -> Self {
		Self {
			protocol: "http".to_string(),
			host: "localhost".to_string(),
			port: 8181,
			base_path: String::new(),
			token: None,
			request_timeout: Duration::from_secs(10),
		}
	}

	pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
		self.protocol = protocol.into();
		self
	}

	pub fn host(mut self, host: impl Into<String>) -> Self {
		self.host = host.into();
		self
	}

	pub fn port(mut self, port: u16) -> Self {
		self.port = port;
		self
	}

	/// Path prefix when PlexPy is served below the root, e.g. `/plexpy`.
	pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
		self.base_path = base_path.into();
		self
	}

	pub fn token(mut self, token: SecretString) -> Self {
		self.token = Some(token);
		self
	}

	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	pub fn build(self) -> std::result::Result<PlexPyClient, BuildError> {
		let token = self.token.ok_or(BuildError::MissingToken)?;
		let endpoint = Endpoint::new(&self.protocol, &self.host, self.port, &self.base_path)?;
		let http_client = plexstat_common_http::new_client_with_timeout(self.request_timeout)?;

		info!(endpoint = %endpoint.as_str(), "PlexPy client initialized");

		Ok(PlexPyClient {
			endpoint,
			token,
			http_client,
		})
	}
}

impl Default for PlexPyClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Client for the three PlexPy read commands.
#[derive(Debug, Clone)]
pub struct PlexPyClient {
	endpoint: Endpoint,
	token: SecretString,
	http_client: Client,
}

impl PlexPyClient {
	pub fn builder() -> PlexPyClientBuilder {
		PlexPyClientBuilder::new()
	}

	pub fn request(&self, kind: DataKind) -> ApiRequest {
		self.endpoint.request(&self.token, kind)
	}

	pub async fn get_activity(&self) -> Result<Value> {
		self.fetch(DataKind::Activity).await
	}

	pub async fn get_libraries(&self) -> Result<Value> {
		self.fetch(DataKind::Libraries).await
	}

	pub async fn get_users_table(&self) -> Result<Value> {
		self.fetch(DataKind::Users).await
	}

	async fn send(&self, request: ApiRequest) -> Result<Value> {
		let response = self.http_client.get(request.url().clone()).send().await?;
		let status = response.status();
		let body = response.text().await?;

		if !status.is_success() {
			return Err(FetchError::Status {
				status: status.as_u16(),
				body: truncate(body),
			});
		}

		let value: Value = serde_json::from_str(&body).map_err(FetchError::InvalidBody)?;

		if value.pointer("/response/result").and_then(Value::as_str) == Some("error") {
			let message = value
				.pointer("/response/message")
				.and_then(Value::as_str)
				.unwrap_or("unknown error")
				.to_string();
			return Err(FetchError::Api { message });
		}

		Ok(value)
	}
}

#[async_trait]
impl DataSource for PlexPyClient {
	#[instrument(skip(self), fields(command = kind.command()))]
	async fn fetch(&self, kind: DataKind) -> Result<Value> {
		let request = self.request(kind);
		debug!(url = %request.redacted_url(), "Fetching PlexPy data");
		self.send(request).await
	}
}

fn truncate(mut body: String) -> String {
	if body.len() > MAX_ERROR_BODY {
		let mut cut = MAX_ERROR_BODY;
		while !body.is_char_boundary(cut) {
			cut -= 1;
		}
		body.truncate(cut);
	}
	body
}
