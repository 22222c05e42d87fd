// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! plexstat binary: polls PlexPy and writes metrics to InfluxDB until signalled.

use std::sync::Arc;

use plexstat_config::PlexstatConfig;
use plexstat_influx::InfluxSink;
use plexstat_plexpy::PlexPyClient;
use plexstat_poller::Poller;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = plexstat_config::load_config()?;

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		version = env!("CARGO_PKG_VERSION"),
		plexpy_host = %config.plexpy.host,
		influx_host = %config.influx.host,
		influx_database = %config.influx.database,
		interval_ms = config.polling.interval.as_millis() as u64,
		"starting plexstat"
	);

	let poller = build_poller(&config)?;
	let handle = poller.start()?;

	shutdown_signal().await;
	tracing::info!("Received shutdown signal");

	poller.stop();
	if let Err(e) = handle.await {
		tracing::error!(error = %e, "Poller task ended abnormally");
	}

	tracing::info!("plexstat shutdown complete");
	Ok(())
}

fn build_poller(config: &PlexstatConfig) -> Result<Poller, Box<dyn std::error::Error>> {
	let source = PlexPyClient::builder()
		.protocol(config.plexpy.protocol.clone())
		.host(config.plexpy.host.clone())
		.port(config.plexpy.port)
		.base_path(config.plexpy.base_path.clone())
		.token(config.plexpy.token.clone())
		.request_timeout(config.plexpy.timeout)
		.build()?;

	let sink = InfluxSink::builder()
		.protocol(config.influx.protocol.clone())
		.host(config.influx.host.clone())
		.port(config.influx.port)
		.database(config.influx.database.clone())
		.username(config.influx.username.clone())
		.password(config.influx.password.clone())
		.request_timeout(config.influx.timeout)
		.build()?;

	Ok(Poller::new(config.polling, Arc::new(source), Arc::new(sink)))
}

#[cfg(unix)]
async fn shutdown_signal() {
	use tokio::signal::unix::{signal, SignalKind};

	match signal(SignalKind::terminate()) {
		Ok(mut terminate) => {
			tokio::select! {
				_ = tokio::signal::ctrl_c() => {}
				_ = terminate.recv() => {}
			}
		}
		Err(e) => {
			tracing::warn!(error = %e, "Failed to install SIGTERM handler");
			let _ = tokio::signal::ctrl_c().await;
		}
	}
}

#[cfg(not(unix))]
async fn shutdown_signal() {
	let _ = tokio::signal::ctrl_c().await;
}
