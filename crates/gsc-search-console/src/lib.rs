// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Google Search Console (Webmasters v3) client.
//!
//! This crate provides a typed Rust client for the Search Console API:
//! properties, sitemaps and Search Analytics queries. Transient failures
//! (429, 5xx, timeouts) are retried with backoff; everything else is
//! returned as a [`GscError`].
//!
//! The client takes an already-minted OAuth access token. Obtaining and
//! refreshing that token is left to the caller.

pub mod client;
pub mod error;
pub mod types;

pub use client::{GscClient, DEFAULT_BASE_URL};
pub use error::{ApiErrorDetails, GscError, Result, ValidationError};
pub use gsc_common_config::{GscConfig, SecretString, SCOPE_WEBMASTERS, SCOPE_WEBMASTERS_READONLY};
pub use gsc_common_http::RetryConfig;
pub use types::{
	AggregationType, DataState, Dimension, DimensionFilter, DimensionFilterGroup, FilterOperator,
	GroupType, PermissionLevel, SearchAnalyticsQueryRequest, SearchAnalyticsQueryResponse,
	SearchAnalyticsRow, SearchType, SiteEntry, Sitemap, SitemapContent, SitemapContentType,
	SitemapType, SitemapsListResponse, SitesListResponse, MAX_ROW_LIMIT,
};
