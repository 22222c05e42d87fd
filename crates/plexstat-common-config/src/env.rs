// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment variable helpers for loading secrets.
//!
//! Secrets can be given directly (`PLEXPY_TOKEN=abc`) or through a file
//! reference (`PLEXPY_TOKEN_FILE=/run/secrets/plexpy_token`), the convention
//! used by Docker and Kubernetes secret mounts.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::secret::Secret;

/// Errors that can occur when loading secrets from environment variables.
#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Reads a variable from the process environment, treating empty values as unset.
pub fn process_env(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Loads a secret from `VAR` or from the file named by `VAR_FILE`.
///
/// `VAR_FILE` wins over `VAR`. A single trailing newline is stripped from
/// file contents. Variables are resolved through `lookup`, normally
/// [`process_env`].
pub fn load_secret_with<F>(lookup: F, var: &str) -> Result<Option<Secret<String>>, SecretEnvError>
where
	F: Fn(&str) -> Option<String>,
{
	let file_var = format!("{var}_FILE");

	if let Some(path_str) = lookup(&file_var) {
		if path_str.trim().is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(Secret::new(secret)));
	}

	Ok(lookup(var).map(Secret::new))
}
