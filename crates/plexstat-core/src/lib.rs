// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types and aggregation for plexstat.
//!
//! Everything in this crate is pure: it turns PlexPy JSON snapshots into
//! [`MetricPoint`]s and never performs I/O. The poller feeds it raw documents
//! and hands the resulting points to a sink.
//!
//! - [`aggregate_activity`]: session counters (optionally per resolution) and
//!   per-session points
//! - [`aggregate_libraries`]: one point per library section
//! - [`aggregate_users`]: one point per user

mod de;

pub mod aggregate;
pub mod error;
pub mod kind;
pub mod library;
pub mod point;
pub mod session;
pub mod snapshot;
pub mod user;

pub use aggregate::{
	aggregate_activity, aggregate_libraries, aggregate_users, group_by_resolution, ActivityOptions,
	Aggregation, ResolutionGroup, SessionAggregate,
};
pub use error::{RecordError, Result, SnapshotError};
pub use kind::DataKind;
pub use library::LibrarySection;
pub use point::{measurement, FieldValue, Fields, MetricPoint, Tags};
pub use session::{PlaybackState, Session, TranscodeDecision};
pub use user::UserStat;
