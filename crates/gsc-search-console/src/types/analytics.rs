// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Search Analytics query response.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::query::AggregationType;
use crate::types::wire::{self, convert_list, map_list, optional, parse_enum, required, Typed, TypedList};

/// One result row. `keys` holds one value per requested dimension, in
/// request order; it is empty when the query had no dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchAnalyticsRow {
	pub keys: Vec<String>,
	pub clicks: f64,
	pub impressions: f64,
	pub ctr: f64,
	pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAnalyticsQueryResponse {
	pub rows: Vec<SearchAnalyticsRow>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub response_aggregation_type: Option<AggregationType>,
}

impl SearchAnalyticsQueryResponse {
	/// Parse a response body. A body without `rows` is an empty result.
	pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
		wire::decode::<RawQueryResponse, _>(value.clone())
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	pub fn total_clicks(&self) -> f64 {
		self.rows.iter().map(|r| r.clicks).sum()
	}

	pub fn total_impressions(&self) -> f64 {
		self.rows.iter().map(|r| r.impressions).sum()
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQueryResponse {
	rows: Option<TypedList<RawRow>>,
	response_aggregation_type: Option<Typed<String>>,
}

#[derive(Debug, Deserialize)]
struct RawRow {
	keys: Option<TypedList<String>>,
	clicks: Option<Typed<f64>>,
	impressions: Option<Typed<f64>>,
	ctr: Option<Typed<f64>>,
	position: Option<Typed<f64>>,
}

impl TryFrom<RawRow> for SearchAnalyticsRow {
	type Error = ValidationError;

	fn try_from(raw: RawRow) -> Result<Self, Self::Error> {
		Ok(Self {
			keys: map_list(raw.keys, "keys", Ok)?,
			clicks: required(raw.clicks, "clicks")?,
			impressions: required(raw.impressions, "impressions")?,
			ctr: required(raw.ctr, "ctr")?,
			position: required(raw.position, "position")?,
		})
	}
}

impl TryFrom<RawQueryResponse> for SearchAnalyticsQueryResponse {
	type Error = ValidationError;

	fn try_from(raw: RawQueryResponse) -> Result<Self, Self::Error> {
		Ok(Self {
			rows: convert_list(raw.rows, "rows")?,
			response_aggregation_type: optional(raw.response_aggregation_type, "responseAggregationType")?
				.map(|v| parse_enum(&v, "responseAggregationType"))
				.transpose()?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn parses_rows_in_order() {
		let resp = SearchAnalyticsQueryResponse::from_json(&json!({
			"rows": [
				{"keys": ["query A", "/"], "clicks": 10, "impressions": 100, "ctr": 0.1, "position": 3.2},
				{"keys": ["query B", "/page"], "clicks": 5, "impressions": 50, "ctr": 0.1, "position": 5.0}
			],
			"responseAggregationType": "byProperty"
		}))
		.unwrap();

		assert_eq!(resp.rows.len(), 2);
		assert_eq!(resp.rows[0].keys, vec!["query A", "/"]);
		assert_eq!(resp.rows[0].clicks, 10.0);
		assert_eq!(resp.rows[1].position, 5.0);
		assert_eq!(resp.response_aggregation_type, Some(AggregationType::ByProperty));
		assert_eq!(resp.total_clicks(), 15.0);
		assert_eq!(resp.total_impressions(), 150.0);
	}

	#[test]
	fn missing_rows_means_no_data() {
		let resp = SearchAnalyticsQueryResponse::from_json(&json!({
			"responseAggregationType": "auto"
		}))
		.unwrap();
		assert!(resp.is_empty());
		assert_eq!(resp.response_aggregation_type, Some(AggregationType::Auto));
	}

	#[test]
	fn rows_without_dimensions_have_no_keys() {
		let resp = SearchAnalyticsQueryResponse::from_json(&json!({
			"rows": [{"clicks": 3, "impressions": 40, "ctr": 0.075, "position": 7.1}]
		}))
		.unwrap();
		assert!(resp.rows[0].keys.is_empty());
	}

	#[test]
	fn missing_metric_names_row_and_field() {
		let err = SearchAnalyticsQueryResponse::from_json(&json!({
			"rows": [
				{"keys": ["a"], "clicks": 1, "impressions": 2, "ctr": 0.5, "position": 1.0},
				{"keys": ["b"], "impressions": 2, "ctr": 0.5, "position": 1.0}
			]
		}))
		.unwrap_err();
		assert_eq!(err.field, "rows[1].clicks");
	}

	#[test]
	fn wrong_metric_type_is_a_validation_error() {
		let err = SearchAnalyticsQueryResponse::from_json(&json!({
			"rows": [{"clicks": "ten", "impressions": 2, "ctr": 0.5, "position": 1.0}]
		}))
		.unwrap_err();
		assert_eq!(err.field, "rows[0].clicks");
		assert!(err.message.contains("invalid type"));
	}

	#[test]
	fn non_string_key_is_named_by_index() {
		let err = SearchAnalyticsQueryResponse::from_json(&json!({
			"rows": [
				{"keys": ["a"], "clicks": 1, "impressions": 2, "ctr": 0.5, "position": 1.0},
				{"keys": ["b", 7], "clicks": 1, "impressions": 2, "ctr": 0.5, "position": 1.0}
			]
		}))
		.unwrap_err();
		assert_eq!(err.field, "rows[1].keys[1]");
	}

	#[test]
	fn rows_that_are_not_objects_are_named() {
		let err = SearchAnalyticsQueryResponse::from_json(&json!({"rows": [42]})).unwrap_err();
		assert_eq!(err.field, "rows[0]");

		let err = SearchAnalyticsQueryResponse::from_json(&json!({"rows": {}})).unwrap_err();
		assert_eq!(err.field, "rows");
	}

	#[test]
	fn unknown_aggregation_type_is_rejected() {
		let err = SearchAnalyticsQueryResponse::from_json(&json!({
			"responseAggregationType": "byGalaxy"
		}))
		.unwrap_err();
		assert_eq!(err.field, "responseAggregationType");
	}
}
