// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use plexstat_config::PollingConfig;
use plexstat_core::{aggregate_activity, aggregate_libraries, aggregate_users, Aggregation, DataKind};
use plexstat_influx::MetricsSink;
use plexstat_plexpy::DataSource;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{PollerError, Result};
use crate::health::{determine_health_state, PollerState, PollerStatus};
use crate::report::{CycleReport, KindReport};

#[derive(Debug)]
struct StatusInner {
	state: PollerState,
	cycles_completed: u64,
	consecutive_failed_cycles: u32,
	last_report: Option<CycleReport>,
}

struct Inner {
	config: PollingConfig,
	source: Arc<dyn DataSource>,
	sink: Arc<dyn MetricsSink>,
	started: AtomicBool,
	stopped: AtomicBool,
	shutdown: Notify,
	/// Held for the whole of a cycle so cycles never overlap.
	cycle_guard: Mutex<()>,
	status: Mutex<StatusInner>,
}

/// Drives collection cycles. Cheap to clone; clones share one schedule.
#[derive(Clone)]
pub struct Poller {
	inner: Arc<Inner>,
}

impl Poller {
	pub fn new(config: PollingConfig, source: Arc<dyn DataSource>, sink: Arc<dyn MetricsSink>) -> Self {
		Self {
			inner: Arc::new(Inner {
				config,
				source,
				sink,
				started: AtomicBool::new(false),
				stopped: AtomicBool::new(false),
				shutdown: Notify::new(),
				cycle_guard: Mutex::new(()),
				status: Mutex::new(StatusInner {
					state: PollerState::Idle,
					cycles_completed: 0,
					consecutive_failed_cycles: 0,
					last_report: None,
				}),
			}),
		}
	}

	/// Spawns the polling task. The first cycle runs immediately.
	#[instrument(skip(self), fields(interval_ms = self.inner.config.interval.as_millis() as u64))]
	pub fn start(&self) -> Result<JoinHandle<()>> {
		if self.inner.stopped.load(Ordering::SeqCst) {
			return Err(PollerError::Stopped);
		}
		if self.inner.started.swap(true, Ordering::SeqCst) {
			return Err(PollerError::AlreadyStarted);
		}

		let inner = Arc::clone(&self.inner);
		let handle = tokio::spawn(async move {
			loop {
				if inner.is_stopped() {
					break;
				}

				if inner.run_guarded().await.is_none() {
					break;
				}

				if inner.is_stopped() {
					break;
				}

				tokio::select! {
					_ = tokio::time::sleep(inner.config.interval) => {}
					_ = inner.shutdown.notified() => {}
				}
			}

			info!("Poller stopped");
		});

		info!("Poller started");
		Ok(handle)
	}

	/// Prevents any further cycle from being scheduled.
	///
	/// A cycle already in flight runs to completion, including its writes.
	pub fn stop(&self) {
		if self.inner.stopped.swap(true, Ordering::SeqCst) {
			return;
		}
		// `notify_one` stores a permit, so a task that is between cycles and
		// not yet waiting still observes the stop.
		self.inner.shutdown.notify_one();
		info!("Poller stop requested");
	}

	/// Runs one fetch, aggregate and write pass over every data kind.
	///
	/// Waits for any cycle already in flight to finish first. Returns
	/// [`PollerError::Stopped`] without fetching once [`Poller::stop`] has
	/// been called.
	pub async fn run_cycle(&self) -> Result<CycleReport> {
		self.inner.run_guarded().await.ok_or(PollerError::Stopped)
	}

	pub async fn status(&self) -> PollerStatus {
		let status = self.inner.status.lock().await;
		let state = if self.inner.is_stopped() && status.state != PollerState::Running {
			PollerState::Stopped
		} else {
			status.state
		};

		PollerStatus {
			state,
			health: determine_health_state(status.consecutive_failed_cycles),
			cycles_completed: status.cycles_completed,
			consecutive_failed_cycles: status.consecutive_failed_cycles,
			last_report: status.last_report.clone(),
		}
	}
}

impl Inner {
	fn is_stopped(&self) -> bool {
		self.stopped.load(Ordering::SeqCst)
	}

	/// Runs a cycle unless the poller is stopped.
	async fn run_guarded(&self) -> Option<CycleReport> {
		let _guard = self.cycle_guard.lock().await;
		if self.is_stopped() {
			return None;
		}
		Some(self.run_cycle().await)
	}

	#[instrument(skip(self), fields(cycle_id))]
	async fn run_cycle(&self) -> CycleReport {
		let cycle_id = Uuid::new_v4();
		tracing::Span::current().record("cycle_id", tracing::field::display(cycle_id));
		let started_at = Utc::now();

		self.status.lock().await.state = PollerState::Running;

		let (activity, libraries, users) = tokio::join!(
			self.collect(DataKind::Activity),
			self.collect(DataKind::Libraries),
			self.collect(DataKind::Users),
		);

		let report = CycleReport {
			cycle_id,
			started_at,
			finished_at: Utc::now(),
			kinds: vec![activity, libraries, users],
		};

		info!(
			points_written = report.points_written(),
			failed_writes = report.failed_writes(),
			fetch_failure = report.has_fetch_failure(),
			duration_ms = report.duration_ms(),
			"Cycle completed"
		);

		let mut status = self.status.lock().await;
		status.state = if self.is_stopped() {
			PollerState::Stopped
		} else {
			PollerState::Idle
		};
		status.cycles_completed += 1;
		if report.has_fetch_failure() {
			status.consecutive_failed_cycles += 1;
		} else {
			status.consecutive_failed_cycles = 0;
		}
		status.last_report = Some(report.clone());

		report
	}

	async fn collect(&self, kind: DataKind) -> KindReport {
		let snapshot = match self.source.fetch(kind).await {
			Ok(snapshot) => snapshot,
			Err(e) => {
				error!(kind = %kind, error = %e, "Failed to fetch data");
				return KindReport::failed(kind, e.to_string());
			}
		};

		let aggregation = match kind {
			DataKind::Activity => aggregate_activity(&snapshot, &self.config.activity),
			DataKind::Libraries => aggregate_libraries(&snapshot),
			DataKind::Users => aggregate_users(&snapshot),
		};

		let Aggregation { points, skipped } = match aggregation {
			Ok(aggregation) => aggregation,
			Err(e) => {
				error!(kind = %kind, error = %e, "Unexpected snapshot shape");
				return KindReport::failed(kind, e.to_string());
			}
		};

		for record in &skipped {
			warn!(kind = %kind, index = record.index, reason = %record.reason, "Skipping malformed record");
		}

		if points.is_empty() {
			if kind == DataKind::Activity {
				debug!("No active sessions");
			}
			return KindReport {
				skipped_records: skipped.len(),
				..KindReport::empty(kind)
			};
		}

		let results = join_all(points.iter().map(|point| self.sink.write(point))).await;

		let mut written = 0;
		let mut failed_writes = 0;
		for (point, result) in points.iter().zip(results) {
			match result {
				Ok(()) => written += 1,
				Err(e) => {
					failed_writes += 1;
					error!(
						kind = %kind,
						measurement = %point.measurement,
						tags = ?point.tags,
						error = %e,
						"Failed to write point"
					);
				}
			}
		}

		debug!(kind = %kind, points = points.len(), written, failed_writes, "Data kind collected");

		KindReport {
			kind,
			points: points.len(),
			written,
			failed_writes,
			skipped_records: skipped.len(),
			error: None,
		}
	}
}
