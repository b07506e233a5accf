// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration primitives for the Search Console SDK.
//!
//! - [`Secret<T>`]: keeps access tokens out of logs and config dumps
//! - [`GscConfig`]: settings loaded from the `GSC_*` environment variables
//! - [`load_secret_env`]: `VAR` / `VAR_FILE` secret loading

pub mod env;
pub mod error;
pub mod secret;
pub mod settings;

pub use env::load_secret_env;
pub use error::ConfigError;
pub use secret::{Secret, SecretString, REDACTED};
pub use settings::{
	GscConfig, DEFAULT_HTTP_TIMEOUT, SCOPE_WEBMASTERS, SCOPE_WEBMASTERS_READONLY,
};
