// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Search Console (Webmasters v3) client implementation.

use std::time::Duration;

use gsc_common_config::settings::vars;
use gsc_common_config::{GscConfig, SecretString, DEFAULT_HTTP_TIMEOUT};
use gsc_common_http::{is_retryable_status, new_client, retry, RetryConfig};
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_LENGTH, RETRY_AFTER};
use reqwest::{Client, Method, Url};
use serde_json::Value;
use tracing::{debug, error, instrument, trace};

use crate::error::{GscError, Result, ValidationError};
use crate::types::{
	SearchAnalyticsQueryRequest, SearchAnalyticsQueryResponse, SiteEntry, Sitemap,
	SitemapsListResponse, SitesListResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/webmasters/v3";

/// Client for the Search Console API.
///
/// Holds a bearer access token minted elsewhere (installed-app flow,
/// service account exchange, or a token forwarded by an upstream caller).
/// The token is never refreshed; build a new client when it expires.
///
/// Cloning is cheap and clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GscClient {
	http_client: Client,
	access_token: SecretString,
	base_url: String,
	retry_config: RetryConfig,
}

impl GscClient {
	/// Creates a client with the default timeout and User-Agent.
	pub fn new(access_token: impl Into<SecretString>) -> Result<Self> {
		Self::build(access_token.into(), DEFAULT_HTTP_TIMEOUT, None)
	}

	/// Creates a client from loaded configuration. The configuration must
	/// carry an access token.
	pub fn from_config(config: &GscConfig) -> Result<Self> {
		let access_token = config.access_token.clone().ok_or_else(|| {
			GscError::Config(format!(
				"no access token configured; set {} or {}_FILE",
				vars::ACCESS_TOKEN,
				vars::ACCESS_TOKEN
			))
		})?;

		Self::build(
			access_token,
			config.http_timeout,
			config.user_agent.as_deref(),
		)
	}

	/// Creates a client from an incoming `Authorization: Bearer <token>`
	/// header value, for services acting on behalf of their caller.
	pub fn from_authorization_header(header: &str) -> Result<Self> {
		Self::new(parse_bearer(header)?)
	}

	fn build(access_token: SecretString, timeout: Duration, user_agent: Option<&str>) -> Result<Self> {
		if access_token.is_blank() {
			return Err(GscError::Config("access token is empty".to_string()));
		}

		let http_client = new_client(timeout, user_agent)
			.map_err(|e| GscError::Config(format!("failed to build HTTP client: {e}")))?;

		Ok(Self {
			http_client,
			access_token,
			base_url: DEFAULT_BASE_URL.to_string(),
			retry_config: RetryConfig::default(),
		})
	}

	/// Sets a custom base URL for the API (useful for testing).
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into().trim_end_matches('/').to_string();
		self
	}

	/// Sets a custom retry configuration.
	pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
		self.retry_config = config;
		self
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Lists every property the token can see.
	#[instrument(skip(self))]
	pub async fn sites_list(&self) -> Result<SitesListResponse> {
		let url = format!("{}/sites", self.base_url);
		let value = self.execute(Method::GET, &url, None).await?;
		let sites = decode("sites.list", &value, SitesListResponse::from_json)?;

		debug!(site_count = sites.site_entry.len(), "Listed sites");
		Ok(sites)
	}

	/// Adds a property to the account. Ownership still has to be verified
	/// separately.
	#[instrument(skip(self))]
	pub async fn sites_add(&self, site_url: &str) -> Result<()> {
		let url = self.site_url(site_url)?;
		self.execute(Method::PUT, &url, None).await?;
		Ok(())
	}

	#[instrument(skip(self))]
	pub async fn sites_get(&self, site_url: &str) -> Result<SiteEntry> {
		let url = self.site_url(site_url)?;
		let value = self.execute(Method::GET, &url, None).await?;
		decode("sites.get", &value, SiteEntry::from_json)
	}

	/// Removes a property from the account.
	#[instrument(skip(self))]
	pub async fn sites_delete(&self, site_url: &str) -> Result<()> {
		let url = self.site_url(site_url)?;
		self.execute(Method::DELETE, &url, None).await?;
		Ok(())
	}

	/// Lists sitemaps submitted for a property.
	#[instrument(skip(self))]
	pub async fn sitemaps_list(&self, site_url: &str) -> Result<SitemapsListResponse> {
		let url = format!("{}/sitemaps", self.site_url(site_url)?);
		let value = self.execute(Method::GET, &url, None).await?;
		let sitemaps = decode("sitemaps.list", &value, SitemapsListResponse::from_json)?;

		debug!(sitemap_count = sitemaps.sitemap.len(), "Listed sitemaps");
		Ok(sitemaps)
	}

	#[instrument(skip(self))]
	pub async fn sitemaps_get(&self, site_url: &str, feedpath: &str) -> Result<Sitemap> {
		let url = self.sitemap_url(site_url, feedpath)?;
		let value = self.execute(Method::GET, &url, None).await?;
		decode("sitemaps.get", &value, Sitemap::from_json)
	}

	/// Submits (or resubmits) a sitemap. `feedpath` is the full sitemap URL.
	#[instrument(skip(self))]
	pub async fn sitemaps_submit(&self, site_url: &str, feedpath: &str) -> Result<()> {
		let url = self.sitemap_url(site_url, feedpath)?;
		self.execute(Method::PUT, &url, None).await?;
		Ok(())
	}

	#[instrument(skip(self))]
	pub async fn sitemaps_delete(&self, site_url: &str, feedpath: &str) -> Result<()> {
		let url = self.sitemap_url(site_url, feedpath)?;
		self.execute(Method::DELETE, &url, None).await?;
		Ok(())
	}

	/// Runs a Search Analytics query. The request is validated before
	/// anything is sent.
	#[instrument(
		skip(self, request),
		fields(
			start_date = %request.start_date,
			end_date = %request.end_date,
			dimensions = request.dimensions.len()
		)
	)]
	pub async fn search_analytics_query(
		&self,
		site_url: &str,
		request: &SearchAnalyticsQueryRequest,
	) -> Result<SearchAnalyticsQueryResponse> {
		let body = request.to_json().map_err(|e| {
			error!(field = %e.field, error = %e, "Rejected invalid search analytics query");
			GscError::from(e)
		})?;

		let url = format!("{}/searchAnalytics/query", self.site_url(site_url)?);
		let value = self.execute(Method::POST, &url, Some(&body)).await?;
		let response = decode(
			"searchAnalytics.query",
			&value,
			SearchAnalyticsQueryResponse::from_json,
		)?;

		debug!(row_count = response.rows.len(), "Search analytics query completed");
		Ok(response)
	}

	fn site_url(&self, site_url: &str) -> Result<String> {
		Ok(format!(
			"{}/sites/{}",
			self.base_url,
			encode_segment(site_url, "siteUrl")?
		))
	}

	fn sitemap_url(&self, site_url: &str, feedpath: &str) -> Result<String> {
		Ok(format!(
			"{}/sitemaps/{}",
			self.site_url(site_url)?,
			encode_segment(feedpath, "feedpath")?
		))
	}

	async fn execute(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value> {
		retry(&self.retry_config, || {
			self.execute_once(method.clone(), url, body)
		})
		.await
	}

	async fn execute_once(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value> {
		let parsed = Url::parse(url).map_err(|e| GscError::Config(format!("invalid request URL {url}: {e}")))?;

		debug!(method = %method, url = %url, "Sending request to Search Console");

		let mut request = self
			.http_client
			.request(method.clone(), parsed)
			.bearer_auth(self.access_token.expose())
			.header(ACCEPT, "application/json");

		request = match body {
			Some(body) => {
				trace!(body = %body, "Request body");
				request.json(body)
			}
			// Google rejects a PUT or POST without a length with 411.
			None if method == Method::PUT || method == Method::POST => request.header(CONTENT_LENGTH, "0"),
			None => request,
		};

		let response = request.send().await.map_err(|e| {
			if e.is_timeout() {
				error!(url = %url, "Request timed out");
				return GscError::Timeout;
			}
			error!(error = %e, "Network error during Search Console request");
			GscError::Network(e)
		})?;

		let status = response.status();
		let retry_after = parse_retry_after(response.headers());
		debug!(status = %status, "Received response from Search Console");

		let text = response.text().await.map_err(|e| {
			error!(error = %e, "Failed to read response body");
			GscError::Network(e)
		})?;
		trace!(body = %text, "Response body");

		if !status.is_success() {
			if is_retryable_status(status) {
				debug!(status = status.as_u16(), "Transient error from Search Console");
			} else {
				error!(status = status.as_u16(), body = %text, "Search Console API error");
			}
			return Err(GscError::from_status(status.as_u16(), text, retry_after));
		}

		if text.trim().is_empty() {
			return Ok(Value::Object(serde_json::Map::new()));
		}

		serde_json::from_str(&text).map_err(|e| {
			error!(error = %e, "Failed to parse Search Console response");
			GscError::InvalidResponse(format!("JSON parse error: {e}"))
		})
	}
}

fn decode<T>(
	operation: &str,
	value: &Value,
	parse: impl FnOnce(&Value) -> std::result::Result<T, ValidationError>,
) -> Result<T> {
	parse(value).map_err(|e| {
		error!(operation = %operation, field = %e.field, error = %e, "Response failed validation");
		GscError::from(e)
	})
}

/// Percent-encode a whole path segment. Site URLs and feed paths contain
/// `:` and `/`, which must not reach the path unescaped.
fn encode_segment(raw: &str, field: &str) -> Result<String> {
	if raw.trim().is_empty() {
		return Err(ValidationError::new(field, "must not be empty").into());
	}
	Ok(urlencoding::encode(raw).into_owned())
}

/// `Retry-After` in delta-seconds form. HTTP-date values are ignored.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	headers
		.get(RETRY_AFTER)?
		.to_str()
		.ok()?
		.trim()
		.parse::<u64>()
		.ok()
		.map(Duration::from_secs)
}

fn parse_bearer(header: &str) -> Result<SecretString> {
	let mut parts = header.split_whitespace();
	match (parts.next(), parts.next(), parts.next()) {
		(Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
			Ok(SecretString::from(token))
		}
		_ => Err(GscError::Config(
			"Authorization header must have the form `Bearer <token>`".to_string(),
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reqwest::header::HeaderValue;

	#[test]
	fn test_client_creation() {
		let client = GscClient::new("ya29.test-token").unwrap();
		assert_eq!(client.access_token.expose(), "ya29.test-token");
		assert_eq!(client.base_url, DEFAULT_BASE_URL);
		assert_eq!(client.retry_config.max_attempts, 6);
	}

	#[test]
	fn test_blank_token_is_rejected() {
		assert!(matches!(GscClient::new("  "), Err(GscError::Config(_))));
	}

	#[test]
	fn test_with_base_url_strips_trailing_slash() {
		let client = GscClient::new("t").unwrap().with_base_url("http://127.0.0.1:9000/");
		assert_eq!(client.base_url(), "http://127.0.0.1:9000");
	}

	#[test]
	fn test_debug_output_redacts_token() {
		let client = GscClient::new("ya29.very-secret").unwrap();
		let rendered = format!("{client:?}");
		assert!(!rendered.contains("very-secret"));
	}

	#[test]
	fn test_from_config_requires_token() {
		let err = GscClient::from_config(&GscConfig::default()).unwrap_err();
		match err {
			GscError::Config(message) => assert!(message.contains("GSC_ACCESS_TOKEN")),
			other => panic!("expected Config error, got {other:?}"),
		}

		let config = GscConfig::default().with_access_token("ya29.from-config");
		let client = GscClient::from_config(&config).unwrap();
		assert_eq!(client.access_token.expose(), "ya29.from-config");
	}

	#[test]
	fn test_bearer_header_parsing() {
		assert_eq!(parse_bearer("Bearer abc").unwrap().expose(), "abc");
		assert_eq!(parse_bearer("bearer   abc ").unwrap().expose(), "abc");
		assert_eq!(parse_bearer("BEARER abc").unwrap().expose(), "abc");

		for bad in ["", "Bearer", "Bearer ", "Basic abc", "Bearer a b", "abc"] {
			assert!(
				matches!(parse_bearer(bad), Err(GscError::Config(_))),
				"{bad:?} should be rejected"
			);
		}
	}

	#[test]
	fn test_site_and_sitemap_urls_are_fully_encoded() {
		let client = GscClient::new("t").unwrap().with_base_url("http://mock");

		assert_eq!(
			client.site_url("https://example.com/").unwrap(),
			"http://mock/sites/https%3A%2F%2Fexample.com%2F"
		);
		assert_eq!(
			client.site_url("sc-domain:example.com").unwrap(),
			"http://mock/sites/sc-domain%3Aexample.com"
		);
		assert_eq!(
			client
				.sitemap_url("https://example.com/", "https://example.com/sitemap.xml?v=2")
				.unwrap(),
			"http://mock/sites/https%3A%2F%2Fexample.com%2F/sitemaps/https%3A%2F%2Fexample.com%2Fsitemap.xml%3Fv%3D2"
		);
	}

	#[test]
	fn test_empty_path_segments_are_validation_errors() {
		let client = GscClient::new("t").unwrap();
		match client.site_url("") {
			Err(GscError::Validation(e)) => assert_eq!(e.field, "siteUrl"),
			other => panic!("expected validation error, got {other:?}"),
		}
		match client.sitemap_url("https://example.com/", " ") {
			Err(GscError::Validation(e)) => assert_eq!(e.field, "feedpath"),
			other => panic!("expected validation error, got {other:?}"),
		}
	}

	#[test]
	fn test_retry_after_parsing() {
		let mut headers = HeaderMap::new();
		assert_eq!(parse_retry_after(&headers), None);

		headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
		assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));

		headers.insert(
			RETRY_AFTER,
			HeaderValue::from_static("Wed, 21 Oct 2025 07:28:00 GMT"),
		);
		assert_eq!(parse_retry_after(&headers), None);
	}
}
