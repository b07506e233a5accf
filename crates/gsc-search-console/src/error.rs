// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the Search Console client.

use std::fmt;
use std::time::Duration;

use gsc_common_http::RetryableError;
use serde::Deserialize;
use thiserror::Error;

/// A request or response payload did not match the expected shape.
///
/// `field` is a JSON path relative to the payload root, e.g.
/// `dimensionFilterGroups[0].filters[1].operator`. It is empty when the
/// payload as a whole is wrong (not an object, not parseable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field `{field}`: {message}")]
pub struct ValidationError {
	pub field: String,
	pub message: String,
}

impl ValidationError {
	pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			message: message.into(),
		}
	}

	pub fn missing(field: impl Into<String>) -> Self {
		Self::new(field, "missing required field")
	}

	pub(crate) fn nested(mut self, parent: &str) -> Self {
		self.field = if self.field.is_empty() {
			parent.to_string()
		} else {
			format!("{parent}.{}", self.field)
		};
		self
	}

	pub(crate) fn from_serde(err: serde_json::Error) -> Self {
		Self::new("", err.to_string())
	}
}

/// The useful parts of a non-2xx Google API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorDetails {
	pub status: u16,
	pub message: String,
	/// First `errors[].reason`, e.g. `forbidden` or `rateLimitExceeded`.
	pub reason: Option<String>,
	/// Response body exactly as received.
	pub body: String,
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
	error: Option<GoogleErrorBody>,
	message: Option<String>,
}

#[derive(Deserialize)]
struct GoogleErrorBody {
	message: Option<String>,
	#[serde(default)]
	errors: Vec<GoogleErrorItem>,
}

#[derive(Deserialize)]
struct GoogleErrorItem {
	reason: Option<String>,
}

impl ApiErrorDetails {
	/// Extract message and reason from Google's error envelope, falling back
	/// to the raw body when it is not the expected JSON.
	pub fn from_response(status: u16, body: impl Into<String>) -> Self {
		let body = body.into();

		let (message, reason) = match serde_json::from_str::<GoogleErrorEnvelope>(&body) {
			Ok(envelope) => {
				let (inner_message, reason) = match envelope.error {
					Some(err) => (
						err.message,
						err.errors.into_iter().find_map(|item| item.reason),
					),
					None => (None, None),
				};
				let message = inner_message
					.or(envelope.message)
					.unwrap_or_else(|| body.clone());
				(message, reason)
			}
			Err(_) => (body.clone(), None),
		};

		Self {
			status,
			message,
			reason,
			body,
		}
	}
}

impl fmt::Display for ApiErrorDetails {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "API error {}: {}", self.status, self.message)?;
		if let Some(reason) = &self.reason {
			write!(f, " (reason={reason})")?;
		}
		Ok(())
	}
}

/// Errors returned by [`GscClient`](crate::GscClient).
#[derive(Debug, Error)]
pub enum GscError {
	/// A request model failed validation, or a response did not match its
	/// model.
	#[error("validation error: {0}")]
	Validation(#[from] ValidationError),

	/// 401 or 403 from Google. Never retried, including a 403 whose reason
	/// is a quota or rate limit; `details.reason` tells them apart.
	#[error("authentication error: {0}")]
	Unauthorized(ApiErrorDetails),

	/// 429 after retries ran out.
	#[error("rate limit exceeded: {details}")]
	RateLimited {
		details: ApiErrorDetails,
		retry_after: Option<Duration>,
	},

	/// Any other non-2xx status. 5xx only surfaces here after retries ran
	/// out.
	#[error("{0}")]
	Api(ApiErrorDetails),

	#[error("network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("request timed out")]
	Timeout,

	/// A 2xx response whose body was not JSON.
	#[error("invalid response from Search Console: {0}")]
	InvalidResponse(String),

	/// The client could not be constructed.
	#[error("client configuration error: {0}")]
	Config(String),
}

impl GscError {
	/// Classify a non-2xx response.
	pub fn from_status(status: u16, body: impl Into<String>, retry_after: Option<Duration>) -> Self {
		let details = ApiErrorDetails::from_response(status, body);
		match status {
			429 => GscError::RateLimited {
				details,
				retry_after,
			},
			401 | 403 => GscError::Unauthorized(details),
			_ => GscError::Api(details),
		}
	}

	/// HTTP status of the failed response, if there was one.
	pub fn status(&self) -> Option<u16> {
		self.details().map(|d| d.status)
	}

	pub fn details(&self) -> Option<&ApiErrorDetails> {
		match self {
			GscError::Unauthorized(details) | GscError::Api(details) => Some(details),
			GscError::RateLimited { details, .. } => Some(details),
			_ => None,
		}
	}
}

impl RetryableError for GscError {
	fn is_retryable(&self) -> bool {
		match self {
			GscError::Network(e) => e.is_retryable(),
			GscError::Timeout => true,
			GscError::RateLimited { .. } => true,
			GscError::Api(details) => details.status >= 500,
			GscError::Validation(_)
			| GscError::Unauthorized(_)
			| GscError::InvalidResponse(_)
			| GscError::Config(_) => false,
		}
	}

	fn retry_after(&self) -> Option<Duration> {
		match self {
			GscError::RateLimited { retry_after, .. } => *retry_after,
			_ => None,
		}
	}
}

pub type Result<T> = std::result::Result<T, GscError>;
