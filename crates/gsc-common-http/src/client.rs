// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

/// Default User-Agent: `gsc-sdk/{version}`.
pub fn user_agent() -> String {
	format!("gsc-sdk/{}", env!("CARGO_PKG_VERSION"))
}

/// Client builder carrying the default User-Agent.
pub fn builder() -> ClientBuilder {
	builder_with_user_agent(user_agent())
}

/// Client builder carrying a caller-chosen User-Agent.
pub fn builder_with_user_agent(user_agent: impl Into<String>) -> ClientBuilder {
	Client::builder().user_agent(user_agent.into())
}

/// Build a client with a per-request timeout and an optional User-Agent
/// override.
pub fn new_client(timeout: Duration, user_agent: Option<&str>) -> Result<Client, reqwest::Error> {
	let builder = match user_agent {
		Some(ua) => builder_with_user_agent(ua),
		None => builder(),
	};
	builder.timeout(timeout).build()
}
