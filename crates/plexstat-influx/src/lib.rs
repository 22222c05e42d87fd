// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Writes [`MetricPoint`](plexstat_core::MetricPoint)s to InfluxDB.

mod error;
pub mod line_protocol;
mod sink;

pub use error::{BuildError, Result, WriteError};
pub use line_protocol::encode;
pub use sink::{InfluxSink, InfluxSinkBuilder, MetricsSink};
