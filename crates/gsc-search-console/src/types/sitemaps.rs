// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Sitemap resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::wire::{
	self, convert_list, optional, parse_enum, parse_timestamp, required, serialize_int64,
	serialize_opt_int64, wire_enum, Int64Wire, Typed, TypedList,
};

wire_enum! {
	pub enum SitemapType {
		AtomFeed => "atomFeed",
		NotSitemap => "notSitemap",
		PatternSitemap => "patternSitemap",
		RssFeed => "rssFeed",
		Sitemap => "sitemap",
		UrlList => "urlList",
	}
}

wire_enum! {
	pub enum SitemapContentType {
		Web => "web",
		Image => "image",
		Video => "video",
		News => "news",
		Mobile => "mobile",
		AndroidApp => "androidApp",
		Pattern => "pattern",
		IosApp => "iosApp",
		DataFeedElement => "dataFeedElement",
	}
}

/// URL counts for one content type inside a sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapContent {
	#[serde(rename = "type")]
	pub content_type: SitemapContentType,
	#[serde(serialize_with = "serialize_int64")]
	pub submitted: i64,
	/// Deprecated by Google and usually absent.
	#[serde(serialize_with = "serialize_opt_int64", skip_serializing_if = "Option::is_none")]
	pub indexed: Option<i64>,
}

/// A submitted sitemap and its processing state.
///
/// `warnings`, `errors`, `is_pending` and `is_sitemaps_index` default to
/// zero/false when Google leaves them out, which it does for sitemaps that
/// have not been processed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sitemap {
	/// The feed URL as submitted.
	pub path: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_submitted: Option<DateTime<Utc>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_downloaded: Option<DateTime<Utc>>,
	pub is_pending: bool,
	pub is_sitemaps_index: bool,
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub sitemap_type: Option<SitemapType>,
	#[serde(serialize_with = "serialize_int64")]
	pub warnings: i64,
	#[serde(serialize_with = "serialize_int64")]
	pub errors: i64,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub contents: Vec<SitemapContent>,
}

impl Sitemap {
	pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
		wire::decode::<RawSitemap, _>(value.clone())
	}

	/// Total URLs submitted across all content types.
	pub fn submitted_urls(&self) -> i64 {
		self.contents.iter().map(|c| c.submitted).sum()
	}

	pub fn has_errors(&self) -> bool {
		self.errors > 0
	}
}

/// Body of `GET sites/{siteUrl}/sitemaps`. Google omits `sitemap` when the
/// property has none.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SitemapsListResponse {
	pub sitemap: Vec<Sitemap>,
}

impl SitemapsListResponse {
	pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
		wire::decode::<RawSitemapsList, _>(value.clone())
	}

	pub fn find(&self, feedpath: &str) -> Option<&Sitemap> {
		self.sitemap.iter().find(|s| s.path == feedpath)
	}
}

#[derive(Debug, Deserialize)]
struct RawSitemapContent {
	#[serde(rename = "type")]
	content_type: Option<Typed<String>>,
	submitted: Option<Typed<Int64Wire>>,
	indexed: Option<Typed<Int64Wire>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSitemap {
	path: Option<Typed<String>>,
	last_submitted: Option<Typed<String>>,
	last_downloaded: Option<Typed<String>>,
	is_pending: Option<Typed<bool>>,
	is_sitemaps_index: Option<Typed<bool>>,
	#[serde(rename = "type")]
	sitemap_type: Option<Typed<String>>,
	warnings: Option<Typed<Int64Wire>>,
	errors: Option<Typed<Int64Wire>>,
	contents: Option<TypedList<RawSitemapContent>>,
}

#[derive(Debug, Deserialize)]
struct RawSitemapsList {
	sitemap: Option<TypedList<RawSitemap>>,
}

fn parse_opt_int64(value: Option<Typed<Int64Wire>>, field: &str) -> Result<Option<i64>, ValidationError> {
	optional(value, field)?.map(|v| v.parse(field)).transpose()
}

fn parse_opt_timestamp(
	value: Option<Typed<String>>,
	field: &str,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
	optional(value, field)?
		.map(|v| parse_timestamp(&v, field))
		.transpose()
}

impl TryFrom<RawSitemapContent> for SitemapContent {
	type Error = ValidationError;

	fn try_from(raw: RawSitemapContent) -> Result<Self, Self::Error> {
		Ok(Self {
			content_type: parse_enum(&required(raw.content_type, "type")?, "type")?,
			submitted: required(raw.submitted, "submitted")?.parse("submitted")?,
			indexed: parse_opt_int64(raw.indexed, "indexed")?,
		})
	}
}

impl TryFrom<RawSitemap> for Sitemap {
	type Error = ValidationError;

	fn try_from(raw: RawSitemap) -> Result<Self, Self::Error> {
		Ok(Self {
			path: required(raw.path, "path")?,
			last_submitted: parse_opt_timestamp(raw.last_submitted, "lastSubmitted")?,
			last_downloaded: parse_opt_timestamp(raw.last_downloaded, "lastDownloaded")?,
			is_pending: optional(raw.is_pending, "isPending")?.unwrap_or(false),
			is_sitemaps_index: optional(raw.is_sitemaps_index, "isSitemapsIndex")?.unwrap_or(false),
			sitemap_type: optional(raw.sitemap_type, "type")?
				.map(|t| parse_enum(&t, "type"))
				.transpose()?,
			warnings: parse_opt_int64(raw.warnings, "warnings")?.unwrap_or(0),
			errors: parse_opt_int64(raw.errors, "errors")?.unwrap_or(0),
			contents: convert_list(raw.contents, "contents")?,
		})
	}
}

impl TryFrom<RawSitemapsList> for SitemapsListResponse {
	type Error = ValidationError;

	fn try_from(raw: RawSitemapsList) -> Result<Self, Self::Error> {
		Ok(Self {
			sitemap: convert_list(raw.sitemap, "sitemap")?,
		})
	}
}
