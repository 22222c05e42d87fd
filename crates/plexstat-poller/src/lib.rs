// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Periodic collection of PlexPy metrics into a metrics sink.
//!
//! A [`Poller`] runs one cycle immediately on [`Poller::start`], then waits a
//! fixed delay after each cycle completes before running the next. Each cycle
//! fetches all data kinds concurrently, aggregates them into points and
//! writes every point. Failures are logged and never stop the schedule.

mod error;
mod health;
mod poller;
mod report;

pub use error::{PollerError, Result};
pub use health::{determine_health_state, HealthState, PollerState, PollerStatus};
pub use plexstat_config::PollingConfig;
pub use poller::Poller;
pub use report::{CycleReport, KindReport};
