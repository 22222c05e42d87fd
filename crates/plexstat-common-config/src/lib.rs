// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Common configuration primitives for plexstat.
//!
//! - [`Secret<T>`]: keeps API tokens and database passwords out of logs
//! - [`load_secret_with`]: read a secret from `VAR` or from the file named
//!   by `VAR_FILE`

pub mod env;
pub mod secret;

pub use env::{load_secret_with, process_env, SecretEnvError};
pub use secret::{Secret, SecretString, REDACTED};
