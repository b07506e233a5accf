// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration error types.

use std::path::PathBuf;

/// Errors raised while building a [`GscConfig`](crate::GscConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// A `*_FILE` secret could not be read.
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// A `*_FILE` variable was set to the empty string.
	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },

	#[error("invalid value for {var}: {message}")]
	InvalidValue { var: String, message: String },
}

impl ConfigError {
	pub fn invalid_value(var: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			var: var.into(),
			message: message.into(),
		}
	}
}
