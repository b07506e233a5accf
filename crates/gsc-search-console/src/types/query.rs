// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Search Analytics query request.
//!
//! Mirrors the body of `POST sites/{siteUrl}/searchAnalytics/query`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::wire::{
	self, convert_list, map_list, optional, parse_date, parse_enum, required, wire_enum, Typed,
	TypedList,
};

/// Largest `rowLimit` Search Console accepts.
pub const MAX_ROW_LIMIT: u32 = 25_000;

wire_enum! {
	/// Grouping key for result rows.
	pub enum Dimension {
		Date => "date",
		Query => "query",
		Page => "page",
		Country => "country",
		Device => "device",
		SearchAppearance => "searchAppearance",
	}
}

wire_enum! {
	pub enum FilterOperator {
		Equals => "equals",
		NotEquals => "notEquals",
		Contains => "contains",
		NotContains => "notContains",
		IncludingRegex => "includingRegex",
		ExcludingRegex => "excludingRegex",
	}
}

wire_enum! {
	/// How filters inside a group combine. Google currently only honours
	/// `and`.
	pub enum GroupType {
		And => "and",
		Or => "or",
	}
}

wire_enum! {
	/// Result source. Google's `type` member; `web` when omitted.
	pub enum SearchType {
		Web => "web",
		Image => "image",
		Video => "video",
		News => "news",
		Discover => "discover",
		GoogleNews => "googleNews",
	}
}

wire_enum! {
	pub enum AggregationType {
		Auto => "auto",
		ByPage => "byPage",
		ByProperty => "byProperty",
		ByNewsShowcasePanel => "byNewsShowcasePanel",
	}
}

wire_enum! {
	/// `final` excludes data that is still being collected; `all` includes it.
	pub enum DataState {
		Final => "final",
		All => "all",
	}
}

/// One `dimension operator expression` predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionFilter {
	pub dimension: Dimension,
	pub operator: FilterOperator,
	pub expression: String,
}

impl DimensionFilter {
	pub fn new(dimension: Dimension, operator: FilterOperator, expression: impl Into<String>) -> Self {
		Self {
			dimension,
			operator,
			expression: expression.into(),
		}
	}

	/// `dimension equals expression`.
	pub fn equals(dimension: Dimension, expression: impl Into<String>) -> Self {
		Self::new(dimension, FilterOperator::Equals, expression)
	}

	/// `dimension contains expression`.
	pub fn contains(dimension: Dimension, expression: impl Into<String>) -> Self {
		Self::new(dimension, FilterOperator::Contains, expression)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilterGroup {
	pub group_type: GroupType,
	pub filters: Vec<DimensionFilter>,
}

impl DimensionFilterGroup {
	/// An `and` group over `filters`.
	pub fn all(filters: Vec<DimensionFilter>) -> Self {
		Self {
			group_type: GroupType::And,
			filters,
		}
	}
}

/// A Search Analytics query.
///
/// Construct with [`new`](Self::new) and the `with_*` builders, or parse a
/// raw JSON body with [`from_json`](Self::from_json). Serialized output
/// omits unset members and empty lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawQueryRequest")]
pub struct SearchAnalyticsQueryRequest {
	pub start_date: NaiveDate,
	pub end_date: NaiveDate,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub dimensions: Vec<Dimension>,
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub search_type: Option<SearchType>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub dimension_filter_groups: Vec<DimensionFilterGroup>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub aggregation_type: Option<AggregationType>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub row_limit: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub start_row: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data_state: Option<DataState>,
}

impl SearchAnalyticsQueryRequest {
	pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
		Self {
			start_date,
			end_date,
			dimensions: Vec::new(),
			search_type: None,
			dimension_filter_groups: Vec::new(),
			aggregation_type: None,
			row_limit: None,
			start_row: None,
			data_state: None,
		}
	}

	pub fn with_dimensions(mut self, dimensions: impl IntoIterator<Item = Dimension>) -> Self {
		self.dimensions = dimensions.into_iter().collect();
		self
	}

	pub fn with_search_type(mut self, search_type: SearchType) -> Self {
		self.search_type = Some(search_type);
		self
	}

	pub fn with_filter_group(mut self, group: DimensionFilterGroup) -> Self {
		self.dimension_filter_groups.push(group);
		self
	}

	pub fn with_aggregation_type(mut self, aggregation_type: AggregationType) -> Self {
		self.aggregation_type = Some(aggregation_type);
		self
	}

	pub fn with_row_limit(mut self, row_limit: u32) -> Self {
		self.row_limit = Some(row_limit);
		self
	}

	pub fn with_start_row(mut self, start_row: u32) -> Self {
		self.start_row = Some(start_row);
		self
	}

	pub fn with_data_state(mut self, data_state: DataState) -> Self {
		self.data_state = Some(data_state);
		self
	}

	/// Check the invariants the type system does not: date order, row limit
	/// range, non-empty filter expressions.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.start_date > self.end_date {
			return Err(ValidationError::new(
				"endDate",
				format!(
					"end date {} is before start date {}",
					self.end_date, self.start_date
				),
			));
		}

		if let Some(limit) = self.row_limit {
			if !(1..=MAX_ROW_LIMIT).contains(&limit) {
				return Err(ValidationError::new(
					"rowLimit",
					format!("must be between 1 and {MAX_ROW_LIMIT}, got {limit}"),
				));
			}
		}

		for (g, group) in self.dimension_filter_groups.iter().enumerate() {
			for (f, filter) in group.filters.iter().enumerate() {
				if filter.expression.is_empty() {
					return Err(ValidationError::new(
						format!("dimensionFilterGroups[{g}].filters[{f}].expression"),
						"must not be empty",
					));
				}
			}
		}

		Ok(())
	}

	/// Validate and render the JSON body Google expects.
	pub fn to_json(&self) -> Result<serde_json::Value, ValidationError> {
		self.validate()?;
		serde_json::to_value(self).map_err(ValidationError::from_serde)
	}

	/// Parse and validate a raw JSON body.
	pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
		wire::decode::<RawQueryRequest, _>(value.clone())
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQueryRequest {
	start_date: Option<Typed<String>>,
	end_date: Option<Typed<String>>,
	dimensions: Option<TypedList<String>>,
	#[serde(rename = "type")]
	search_type: Option<Typed<String>>,
	dimension_filter_groups: Option<TypedList<RawFilterGroup>>,
	aggregation_type: Option<Typed<String>>,
	row_limit: Option<Typed<i64>>,
	start_row: Option<Typed<i64>>,
	data_state: Option<Typed<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFilterGroup {
	group_type: Option<Typed<String>>,
	filters: Option<TypedList<RawFilter>>,
}

#[derive(Debug, Deserialize)]
struct RawFilter {
	dimension: Option<Typed<String>>,
	operator: Option<Typed<String>>,
	expression: Option<Typed<String>>,
}

fn required_enum<T: wire::WireEnum>(value: Option<Typed<String>>, field: &str) -> Result<T, ValidationError> {
	parse_enum(&required(value, field)?, field)
}

fn parse_opt_enum<T: wire::WireEnum>(
	value: Option<Typed<String>>,
	field: &str,
) -> Result<Option<T>, ValidationError> {
	optional(value, field)?
		.map(|v| parse_enum(&v, field))
		.transpose()
}

fn parse_count(value: Option<Typed<i64>>, field: &str) -> Result<Option<u32>, ValidationError> {
	optional(value, field)?
		.map(|n| {
			u32::try_from(n)
				.map_err(|_| ValidationError::new(field, format!("must be a non-negative 32-bit integer, got {n}")))
		})
		.transpose()
}

impl TryFrom<RawFilter> for DimensionFilter {
	type Error = ValidationError;

	fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
		Ok(Self {
			dimension: required_enum(raw.dimension, "dimension")?,
			operator: required_enum(raw.operator, "operator")?,
			expression: required(raw.expression, "expression")?,
		})
	}
}

impl TryFrom<RawFilterGroup> for DimensionFilterGroup {
	type Error = ValidationError;

	fn try_from(raw: RawFilterGroup) -> Result<Self, Self::Error> {
		if raw.filters.is_none() {
			return Err(ValidationError::missing("filters"));
		}

		Ok(Self {
			group_type: parse_opt_enum(raw.group_type, "groupType")?.unwrap_or(GroupType::And),
			filters: convert_list(raw.filters, "filters")?,
		})
	}
}

impl TryFrom<RawQueryRequest> for SearchAnalyticsQueryRequest {
	type Error = ValidationError;

	fn try_from(raw: RawQueryRequest) -> Result<Self, Self::Error> {
		let start_date = parse_date(&required(raw.start_date, "startDate")?, "startDate")?;
		let end_date = parse_date(&required(raw.end_date, "endDate")?, "endDate")?;

		let request = Self {
			start_date,
			end_date,
			dimensions: map_list(raw.dimensions, "dimensions", |d| parse_enum(&d, ""))?,
			search_type: parse_opt_enum(raw.search_type, "type")?,
			dimension_filter_groups: convert_list(raw.dimension_filter_groups, "dimensionFilterGroups")?,
			aggregation_type: parse_opt_enum(raw.aggregation_type, "aggregationType")?,
			row_limit: parse_count(raw.row_limit, "rowLimit")?,
			start_row: parse_count(raw.start_row, "startRow")?,
			data_state: parse_opt_enum(raw.data_state, "dataState")?,
		};

		request.validate()?;
		Ok(request)
	}
}
