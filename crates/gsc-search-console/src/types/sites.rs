// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Site (property) resources.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::wire::{self, convert_list, parse_enum, required, wire_enum, Typed, TypedList};

wire_enum! {
	/// The caller's access level on a property.
	pub enum PermissionLevel {
		SiteOwner => "siteOwner",
		SiteFullUser => "siteFullUser",
		SiteRestrictedUser => "siteRestrictedUser",
		/// The caller added the site but has not verified ownership.
		SiteUnverifiedUser => "siteUnverifiedUser",
	}
}

/// A property the caller can see.
///
/// `site_url` is matched exactly by Google: URL-prefix properties carry the
/// scheme and trailing slash (`https://example.com/`), domain properties use
/// the `sc-domain:` prefix (`sc-domain:example.com`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteEntry {
	pub site_url: String,
	pub permission_level: PermissionLevel,
}

impl SiteEntry {
	pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
		wire::decode::<RawSiteEntry, _>(value.clone())
	}

	pub fn is_domain_property(&self) -> bool {
		self.site_url.starts_with("sc-domain:")
	}

	pub fn is_verified(&self) -> bool {
		self.permission_level != PermissionLevel::SiteUnverifiedUser
	}
}

/// Body of `GET sites`. Google omits `siteEntry` when the caller has no
/// properties.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitesListResponse {
	pub site_entry: Vec<SiteEntry>,
}

impl SitesListResponse {
	pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
		wire::decode::<RawSitesList, _>(value.clone())
	}

	pub fn find(&self, site_url: &str) -> Option<&SiteEntry> {
		self.site_entry.iter().find(|s| s.site_url == site_url)
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSiteEntry {
	site_url: Option<Typed<String>>,
	permission_level: Option<Typed<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSitesList {
	site_entry: Option<TypedList<RawSiteEntry>>,
}

impl TryFrom<RawSiteEntry> for SiteEntry {
	type Error = ValidationError;

	fn try_from(raw: RawSiteEntry) -> Result<Self, Self::Error> {
		let site_url = required(raw.site_url, "siteUrl")?;
		let level = required(raw.permission_level, "permissionLevel")?;
		Ok(Self {
			site_url,
			permission_level: parse_enum(&level, "permissionLevel")?,
		})
	}
}

impl TryFrom<RawSitesList> for SitesListResponse {
	type Error = ValidationError;

	fn try_from(raw: RawSitesList) -> Result<Self, Self::Error> {
		Ok(Self {
			site_entry: convert_list(raw.site_entry, "siteEntry")?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn parses_url_prefix_and_domain_properties() {
		let list = SitesListResponse::from_json(&json!({
			"siteEntry": [
				{"siteUrl": "https://example.com/", "permissionLevel": "siteOwner"},
				{"siteUrl": "sc-domain:example.com", "permissionLevel": "siteRestrictedUser"}
			]
		}))
		.unwrap();

		assert_eq!(list.site_entry.len(), 2);
		assert!(!list.site_entry[0].is_domain_property());
		assert!(list.site_entry[1].is_domain_property());
		assert_eq!(
			list.find("sc-domain:example.com").unwrap().permission_level,
			PermissionLevel::SiteRestrictedUser
		);
		assert!(list.find("https://example.com").is_none());
	}

	#[test]
	fn empty_account_has_no_entries() {
		let list = SitesListResponse::from_json(&json!({})).unwrap();
		assert_eq!(list, SitesListResponse::default());
	}

	#[test]
	fn missing_site_url_is_named_with_index() {
		let err = SitesListResponse::from_json(&json!({
			"siteEntry": [
				{"siteUrl": "https://example.com/", "permissionLevel": "siteOwner"},
				{"permissionLevel": "siteOwner"}
			]
		}))
		.unwrap_err();
		assert_eq!(err.field, "siteEntry[1].siteUrl");
	}

	#[test]
	fn non_string_site_url_is_named_with_index() {
		let err = SitesListResponse::from_json(&json!({
			"siteEntry": [
				{"siteUrl": "https://example.com/", "permissionLevel": "siteOwner"},
				{"siteUrl": ["https://example.org/"], "permissionLevel": "siteOwner"}
			]
		}))
		.unwrap_err();
		assert_eq!(err.field, "siteEntry[1].siteUrl");
		assert_eq!(err.message, "invalid type: got an array");
	}

	#[test]
	fn single_entry_requires_permission_level() {
		let err = SiteEntry::from_json(&json!({"siteUrl": "https://example.com/"})).unwrap_err();
		assert_eq!(err.field, "permissionLevel");
	}

	#[test]
	fn unverified_user_is_not_verified() {
		let entry = SiteEntry::from_json(&json!({
			"siteUrl": "https://example.com/",
			"permissionLevel": "siteUnverifiedUser"
		}))
		.unwrap();
		assert!(!entry.is_verified());
	}

	#[test]
	fn serializes_back_to_wire_shape() {
		let entry = SiteEntry {
			site_url: "https://example.com/".into(),
			permission_level: PermissionLevel::SiteFullUser,
		};
		assert_eq!(
			serde_json::to_value(&entry).unwrap(),
			json!({"siteUrl": "https://example.com/", "permissionLevel": "siteFullUser"})
		);
	}
}
