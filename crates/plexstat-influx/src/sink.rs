// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The metrics sink seam and its InfluxDB 1.x implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use plexstat_common_config::SecretString;
use plexstat_core::MetricPoint;
use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::error::{BuildError, Result, WriteError};
use crate::line_protocol;

/// Longest error body kept in [`WriteError::Rejected`].
const MAX_ERROR_BODY: usize = 512;

/// Destination for metric points. Each call writes exactly one point.
#[async_trait]
pub trait MetricsSink: Send + Sync {
	async fn write(&self, point: &MetricPoint) -> Result<()>;
}

/// Builder for constructing an [`InfluxSink`].
pub struct InfluxSinkBuilder {
	protocol: String,
	host: String,
	port: u16,
	database: String,
	username: Option<String>,
	password: Option<SecretString>,
	request_timeout: Duration,
}

impl InfluxSinkBuilder {
	pub fn new() -> Self {
		Self {
			protocol: "http".to_string(),
			host: "localhost".to_string(),
			port: 8086,
			database: "plex".to_string(),
			username: None,
			password: None,
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

	pub fn database(mut self, database: impl Into<String>) -> Self {
		self.database = database.into();
		self
	}

	pub fn username(mut self, username: Option<String>) -> Self {
		self.username = username;
		self
	}

	pub fn password(mut self, password: Option<SecretString>) -> Self {
		self.password = password;
		self
	}

	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	pub fn build(self) -> std::result::Result<InfluxSink, BuildError> {
		let raw = format!("{}://{}:{}/write", self.protocol, self.host, self.port);
		let mut write_url = Url::parse(&raw).map_err(|e| BuildError::InvalidEndpoint {
			url: raw.clone(),
			message: e.to_string(),
		})?;

		{
			let mut query = write_url.query_pairs_mut();
			query.append_pair("db", &self.database);
			if let Some(user) = &self.username {
				query.append_pair("u", user);
			}
		}

		let http_client = plexstat_common_http::new_client_with_timeout(self.request_timeout)?;

		info!(url = %write_url, database = %self.database, "InfluxDB sink initialized");

		Ok(InfluxSink {
			write_url,
			password: self.password,
			http_client,
		})
	}
}

impl Default for InfluxSinkBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Writes each point with its own `POST /write` request.
#[derive(Clone)]
pub struct InfluxSink {
	write_url: Url,
	password: Option<SecretString>,
	http_client: Client,
}

impl InfluxSink {
	pub fn builder() -> InfluxSinkBuilder {
		InfluxSinkBuilder::new()
	}

	/// Write URL without the password.
	pub fn write_url(&self) -> &Url {
		&self.write_url
	}

	fn request_url(&self) -> Url {
		let mut url = self.write_url.clone();
		if let Some(password) = &self.password {
			url.query_pairs_mut().append_pair("p", password.expose());
		}
		url
	}
}

impl fmt::Debug for InfluxSink {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InfluxSink")
			.field("write_url", &self.write_url.as_str())
			.field("password", &self.password)
			.finish()
	}
}

#[async_trait]
impl MetricsSink for InfluxSink {
	async fn write(&self, point: &MetricPoint) -> Result<()> {
		let line = line_protocol::encode(point)?;
		debug!(measurement = %point.measurement, line = %line, "Writing point");

		let response = self
			.http_client
			.post(self.request_url())
			.body(line)
			.send()
			.await?;

		let status = response.status();
		if status.is_success() {
			return Ok(());
		}

		let mut body = response.text().await.unwrap_or_default();
		if body.len() > MAX_ERROR_BODY {
			let mut cut = MAX_ERROR_BODY;
			while !body.is_char_boundary(cut) {
				cut -= 1;
			}
			body.truncate(cut);
		}

		Err(WriteError::Rejected {
			status: status.as_u16(),
			body,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use plexstat_common_config::Secret;
	use wiremock::matchers::{body_string, method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn builder_for(server: &MockServer) -> InfluxSinkBuilder {
		let address = server.address();
		InfluxSink::builder()
			.host(address.ip().to_string())
			.port(address.port())
			.request_timeout(Duration::from_secs(5))
	}

	fn library_point() -> MetricPoint {
		MetricPoint::new("library")
			.field("count", 42i64)
			.tag("type", "movie")
			.tag("section", "Movies")
	}

	#[test]
	fn write_url_carries_database_and_user() {
		let sink = InfluxSink::builder()
			.host("influx.local")
			.database("media")
			.username(Some("writer".to_string()))
			.password(Some(Secret::new("pw".to_string())))
			.build()
			.unwrap();

		assert_eq!(sink.write_url().as_str(), "http://influx.local:8086/write?db=media&u=writer");
		assert_eq!(
			sink.request_url().as_str(),
			"http://influx.local:8086/write?db=media&u=writer&p=pw"
		);
	}

	#[test]
	fn debug_hides_password() {
		let sink = InfluxSink::builder()
			.password(Some(Secret::new("hunter2".to_string())))
			.build()
			.unwrap();

		assert!(!format!("{sink:?}").contains("hunter2"));
	}

	#[tokio::test]
	async fn write_posts_line_protocol() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/write"))
			.and(query_param("db", "plex"))
			.and(body_string("library,section=Movies,type=movie count=42i"))
			.respond_with(ResponseTemplate::new(204))
			.expect(1)
			.mount(&server)
			.await;

		let sink = builder_for(&server).build().unwrap();
		sink.write(&library_point()).await.unwrap();
	}

	#[tokio::test]
	async fn credentials_are_sent_as_query_params() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/write"))
			.and(query_param("u", "writer"))
			.and(query_param("p", "pw"))
			.respond_with(ResponseTemplate::new(204))
			.expect(1)
			.mount(&server)
			.await;

		let sink = builder_for(&server)
			.username(Some("writer".to_string()))
			.password(Some(Secret::new("pw".to_string())))
			.build()
			.unwrap();
		sink.write(&library_point()).await.unwrap();
	}

	#[tokio::test]
	async fn rejected_write_reports_status_and_body() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(
				ResponseTemplate::new(404).set_body_string(r#"{"error":"database not found: \"plex\""}"#),
			)
			.mount(&server)
			.await;

		let sink = builder_for(&server).build().unwrap();
		match sink.write(&library_point()).await {
			Err(WriteError::Rejected { status, body }) => {
				assert_eq!(status, 404);
				assert!(body.contains("database not found"));
			}
			other => panic!("expected Rejected, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn empty_point_is_not_sent() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(204))
			.expect(0)
			.mount(&server)
			.await;

		let sink = builder_for(&server).build().unwrap();
		let err = sink.write(&MetricPoint::new("session")).await.unwrap_err();
		assert!(matches!(err, WriteError::EmptyPoint { .. }));
	}

	#[tokio::test]
	async fn unreachable_server_is_a_request_error() {
		let sink = InfluxSink::builder()
			.host("127.0.0.1")
			.port(1)
			.password(Some(Secret::new("pw-secret".to_string())))
			.request_timeout(Duration::from_secs(2))
			.build()
			.unwrap();

		let err = sink.write(&library_point()).await.unwrap_err();
		assert!(matches!(err, WriteError::Request(_)));
		assert!(!err.to_string().contains("pw-secret"));
	}
}
