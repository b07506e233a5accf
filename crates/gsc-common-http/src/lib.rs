// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for the Search Console SDK.
//!
//! This crate provides:
//! - A `reqwest` client builder with the SDK User-Agent and timeout
//! - Retry with exponential backoff and jitter for transient failures

mod client;
mod retry;

pub use client::{builder, builder_with_user_agent, new_client, user_agent};
pub use retry::{is_retryable_status, retry, RetryConfig, RetryableError};
