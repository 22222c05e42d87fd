// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client utilities for plexstat.
//!
//! Both the PlexPy source client and the InfluxDB sink build their
//! `reqwest::Client` through here so every outbound request carries the same
//! User-Agent.

mod client;

pub use client::{builder, new_client_with_timeout, user_agent};
