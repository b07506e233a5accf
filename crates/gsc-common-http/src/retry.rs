// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Retry with exponential backoff for transient HTTP failures.
//!
//! Transient means HTTP 429, any 5xx, or a transport-level failure
//! (connect error, timeout). Everything else is returned to the caller on
//! the first attempt.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::warn;

/// Backoff policy for [`retry`].
///
/// The delay before retry `n` (zero-based) is
/// `base_delay * backoff_factor^n`, capped at `max_delay`, then scaled by a
/// random factor in `[0.5, 1.5)` when `jitter` is set.
#[derive(Debug, Clone)]
pub struct RetryConfig {
	/// Total attempts including the first one.
	pub max_attempts: u32,
	pub base_delay: Duration,
	pub max_delay: Duration,
	pub backoff_factor: f64,
	pub jitter: bool,
}

impl Default for RetryConfig {
	/// One call plus five retries: 1s, 2s, 4s, 8s, 16s before jitter.
	fn default() -> Self {
		Self {
			max_attempts: 6,
			base_delay: Duration::from_secs(1),
			max_delay: Duration::from_secs(16),
			backoff_factor: 2.0,
			jitter: true,
		}
	}
}

impl RetryConfig {
	/// Same attempt budget with no waiting. Intended for tests against a
	/// local mock server.
	pub fn immediate(max_attempts: u32) -> Self {
		Self {
			max_attempts,
			base_delay: Duration::ZERO,
			max_delay: Duration::ZERO,
			backoff_factor: 1.0,
			jitter: false,
		}
	}
}

/// Classifies an error for [`retry`].
pub trait RetryableError {
	fn is_retryable(&self) -> bool;

	/// Server-requested wait (e.g. a `Retry-After` header). Overrides the
	/// computed backoff when present.
	fn retry_after(&self) -> Option<Duration> {
		None
	}
}

/// 429 and every 5xx are transient; all other statuses are final.
pub fn is_retryable_status(status: StatusCode) -> bool {
	status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

impl RetryableError for reqwest::Error {
	fn is_retryable(&self) -> bool {
		if self.is_timeout() || self.is_connect() {
			return true;
		}

		self.status().is_some_and(is_retryable_status)
	}
}

fn calculate_delay(cfg: &RetryConfig, attempt: u32) -> Duration {
	let exponential = cfg.base_delay.as_secs_f64() * cfg.backoff_factor.powi(attempt as i32);
	let capped = exponential.min(cfg.max_delay.as_secs_f64());

	let delay = if cfg.jitter {
		capped * (0.5 + fastrand::f64())
	} else {
		capped
	};

	Duration::from_secs_f64(delay)
}

fn next_delay<E: RetryableError>(cfg: &RetryConfig, attempt: u32, err: &E) -> Duration {
	match err.retry_after() {
		Some(requested) => requested.min(cfg.max_delay),
		None => calculate_delay(cfg, attempt),
	}
}

/// Run `f` until it succeeds, fails with a non-retryable error, or
/// `cfg.max_attempts` is reached. The last error is returned unchanged.
pub async fn retry<F, Fut, T, E>(cfg: &RetryConfig, mut f: F) -> Result<T, E>
where
	F: FnMut() -> Fut,
	Fut: std::future::Future<Output = Result<T, E>>,
	E: RetryableError + std::fmt::Debug,
{
	let mut attempt = 0;

	loop {
		match f().await {
			Ok(result) => return Ok(result),
			Err(err) => {
				attempt += 1;

				if !err.is_retryable() {
					return Err(err);
				}

				if attempt >= cfg.max_attempts {
					warn!(
						error = ?err,
						attempt,
						max_attempts = cfg.max_attempts,
						"max retry attempts exhausted"
					);
					return Err(err);
				}

				let delay = next_delay(cfg, attempt - 1, &err);
				warn!(
					error = ?err,
					attempt,
					max_attempts = cfg.max_attempts,
					delay_ms = delay.as_millis() as u64,
					"retrying after transient error"
				);

				tokio::time::sleep(delay).await;
			}
		}
	}
}
