// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! PlexPy (Tautulli) API v2 client.
//!
//! # Example
//!
//! ```ignore
//! use plexstat_plexpy::{DataSource, PlexPyClient};
//! use plexstat_core::DataKind;
//!
//! let client = PlexPyClient::builder()
//!     .host("plexpy.local")
//!     .port(8181)
//!     .token(token)
//!     .build()?;
//!
//! let activity = client.fetch(DataKind::Activity).await?;
//! ```

mod client;
mod error;
mod request;

pub use client::{DataSource, PlexPyClient, PlexPyClientBuilder};
pub use error::{BuildError, FetchError, Result};
pub use request::{ApiRequest, Endpoint};
