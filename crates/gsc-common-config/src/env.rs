// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Environment variable helpers.
//!
//! Secrets follow the `VAR` / `VAR_FILE` convention: when `VAR_FILE` is set
//! the value is read from that path (Docker and Kubernetes secret mounts),
//! otherwise `VAR` is used directly. `VAR_FILE` wins when both are set.

use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs};

use tracing::debug;

use crate::error::ConfigError;
use crate::secret::SecretString;

/// Read a plain variable, treating an empty value as unset.
pub fn optional_env(var: &str) -> Option<String> {
	env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Read a plain variable or fall back to `default`.
pub fn env_or(var: &str, default: &str) -> String {
	optional_env(var).unwrap_or_else(|| default.to_string())
}

/// Read a whole number of seconds. Zero is rejected because a zero
/// timeout would fail every request.
pub fn env_duration_secs(var: &str) -> Result<Option<Duration>, ConfigError> {
	let Some(raw) = optional_env(var) else {
		return Ok(None);
	};

	let secs: u64 = raw
		.trim()
		.parse()
		.map_err(|_| ConfigError::invalid_value(var, format!("expected whole seconds, got {raw:?}")))?;

	if secs == 0 {
		return Err(ConfigError::invalid_value(var, "must be greater than zero"));
	}

	Ok(Some(Duration::from_secs(secs)))
}

/// Load a secret using the `VAR` / `VAR_FILE` convention.
///
/// A single trailing newline is stripped from file contents. Returns
/// `Ok(None)` when neither variable is set.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, ConfigError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(ConfigError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
			path: path.clone(),
			source,
		})?;

		debug!(var = %file_var, path = %path.display(), "loaded secret from file");
		let value = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(value)));
	}

	Ok(env::var(var).ok().map(SecretString::new))
}
