// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Environment-driven settings for the Search Console SDK.

use std::path::PathBuf;
use std::time::Duration;

use tracing::debug;

use crate::env::{env_duration_secs, env_or, load_secret_env, optional_env};
use crate::error::ConfigError;
use crate::secret::SecretString;

/// Full read/write access to Search Console data.
pub const SCOPE_WEBMASTERS: &str = "https://www.googleapis.com/auth/webmasters";
/// Read-only access to Search Console data.
pub const SCOPE_WEBMASTERS_READONLY: &str = "https://www.googleapis.com/auth/webmasters.readonly";

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CLIENT_SECRETS_PATH: &str = "./client_secrets.json";
pub const DEFAULT_TOKEN_PATH: &str = "./.gsc_token.json";

pub mod vars {
	pub const CLIENT_SECRETS: &str = "GSC_CLIENT_SECRETS";
	pub const TOKEN_PATH: &str = "GSC_TOKEN_PATH";
	pub const SA_KEY: &str = "GSC_SA_KEY";
	pub const SCOPE: &str = "GSC_SCOPE";
	pub const SITE_URL: &str = "GSC_SITE_URL";
	pub const HTTP_TIMEOUT: &str = "GSC_HTTP_TIMEOUT";
	pub const USER_AGENT: &str = "GSC_USER_AGENT";
	pub const ACCESS_TOKEN: &str = "GSC_ACCESS_TOKEN";
}

/// Settings consumed by the Search Console client and by whatever OAuth
/// tooling the caller uses to mint tokens.
///
/// The credential paths are carried through untouched; the SDK itself only
/// ever uses `access_token`, `http_timeout` and `user_agent`.
///
/// With the `serde` feature the settings can also be read from a file;
/// missing members take their defaults and `access_token` serializes
/// redacted.
#[derive(Debug, Clone)]
#[cfg_attr(
	feature = "serde",
	derive(serde::Serialize, serde::Deserialize),
	serde(default)
)]
pub struct GscConfig {
	/// OAuth installed-app client secrets JSON.
	pub client_secrets_path: PathBuf,
	/// Where an installed-app flow caches its authorized-user token.
	pub token_path: PathBuf,
	/// Service-account key JSON.
	pub service_account_key_path: Option<PathBuf>,
	pub scope: String,
	/// Default property, e.g. `https://example.com/` or `sc-domain:example.com`.
	pub site_url: Option<String>,
	pub http_timeout: Duration,
	/// `None` means the SDK default User-Agent.
	pub user_agent: Option<String>,
	pub access_token: Option<SecretString>,
}

impl Default for GscConfig {
	fn default() -> Self {
		Self {
			client_secrets_path: PathBuf::from(DEFAULT_CLIENT_SECRETS_PATH),
			token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
			service_account_key_path: None,
			scope: SCOPE_WEBMASTERS_READONLY.to_string(),
			site_url: None,
			http_timeout: DEFAULT_HTTP_TIMEOUT,
			user_agent: None,
			access_token: None,
		}
	}
}

impl GscConfig {
	/// Build settings from the `GSC_*` environment variables, falling back to
	/// defaults for anything unset.
	pub fn from_env() -> Result<Self, ConfigError> {
		let config = Self {
			client_secrets_path: PathBuf::from(env_or(
				vars::CLIENT_SECRETS,
				DEFAULT_CLIENT_SECRETS_PATH,
			)),
			token_path: PathBuf::from(env_or(vars::TOKEN_PATH, DEFAULT_TOKEN_PATH)),
			service_account_key_path: optional_env(vars::SA_KEY).map(PathBuf::from),
			scope: env_or(vars::SCOPE, SCOPE_WEBMASTERS_READONLY),
			site_url: optional_env(vars::SITE_URL),
			http_timeout: env_duration_secs(vars::HTTP_TIMEOUT)?.unwrap_or(DEFAULT_HTTP_TIMEOUT),
			user_agent: optional_env(vars::USER_AGENT),
			access_token: load_secret_env(vars::ACCESS_TOKEN)?.filter(|t| !t.is_blank()),
		};

		debug!(
			scope = %config.scope,
			site_url = ?config.site_url,
			timeout_secs = config.http_timeout.as_secs(),
			has_access_token = config.access_token.is_some(),
			"loaded Search Console settings"
		);

		Ok(config)
	}

	pub fn with_access_token(mut self, token: impl Into<SecretString>) -> Self {
		self.access_token = Some(token.into());
		self
	}

	pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
		self.site_url = Some(site_url.into());
		self
	}
}
