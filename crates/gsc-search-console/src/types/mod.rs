// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Typed request and response models for the Webmasters v3 API.

pub mod analytics;
pub mod query;
pub mod sitemaps;
pub mod sites;
pub(crate) mod wire;

pub use analytics::{SearchAnalyticsQueryResponse, SearchAnalyticsRow};
pub use query::{
	AggregationType, DataState, Dimension, DimensionFilter, DimensionFilterGroup, FilterOperator,
	GroupType, SearchAnalyticsQueryRequest, SearchType, MAX_ROW_LIMIT,
};
pub use sitemaps::{Sitemap, SitemapContent, SitemapContentType, SitemapType, SitemapsListResponse};
pub use sites::{PermissionLevel, SiteEntry, SitesListResponse};
pub use wire::WireEnum;
