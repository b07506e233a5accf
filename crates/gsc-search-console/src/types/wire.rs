// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared helpers for converting raw Webmasters JSON into typed models.
//!
//! Every model is decoded in two steps: serde reads a permissive `Raw*`
//! struct (every member an optional [`Typed`], enums as strings), then a
//! `TryFrom` impl checks presence, JSON types and value formats. The second
//! step is where field paths such as `rows[3].clicks` come from.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serializer};

use crate::error::ValidationError;

/// An enumeration with a fixed set of wire names.
pub trait WireEnum: Copy + 'static {
	const ALL: &'static [Self];

	fn as_str(self) -> &'static str;
}

/// Declares a string-valued enum. Parsing ignores ASCII case and
/// underscores, so `SEARCH_APPEARANCE`, `searchAppearance` and
/// `search_appearance` are all accepted; serialization always emits the
/// canonical wire name.
macro_rules! wire_enum {
	(
		$(#[$meta:meta])*
		pub enum $name:ident {
			$($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+
		}
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		pub enum $name {
			$($(#[$vmeta])* $variant,)+
		}

		impl $crate::types::wire::WireEnum for $name {
			const ALL: &'static [Self] = &[$($name::$variant,)+];

			fn as_str(self) -> &'static str {
				match self {
					$($name::$variant => $wire,)+
				}
			}
		}

		impl $name {
			/// Canonical wire name.
			pub fn as_str(self) -> &'static str {
				<Self as $crate::types::wire::WireEnum>::as_str(self)
			}
		}

		impl ::std::fmt::Display for $name {
			fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl ::serde::Serialize for $name {
			fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				serializer.serialize_str(self.as_str())
			}
		}

		impl ::std::str::FromStr for $name {
			type Err = $crate::error::ValidationError;

			fn from_str(raw: &str) -> Result<Self, Self::Err> {
				$crate::types::wire::parse_enum(raw, "")
			}
		}
	};
}

pub(crate) use wire_enum;

fn normalize(name: &str) -> String {
	name
		.chars()
		.filter(|c| *c != '_')
		.map(|c| c.to_ascii_lowercase())
		.collect()
}

pub(crate) fn parse_enum<T: WireEnum>(raw: &str, field: &str) -> Result<T, ValidationError> {
	let wanted = normalize(raw);
	T::ALL
		.iter()
		.copied()
		.find(|v| normalize(v.as_str()) == wanted)
		.ok_or_else(|| {
			let allowed: Vec<&str> = T::ALL.iter().map(|v| v.as_str()).collect();
			ValidationError::new(
				field,
				format!("unknown value {raw:?}, expected one of {}", allowed.join(", ")),
			)
		})
}

/// A raw member that always deserializes. A value of the wrong JSON type
/// is kept as `Invalid` and rejected by [`required`] or [`optional`], which
/// know the field name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Typed<T> {
	Valid(T),
	Invalid(serde_json::Value),
}

impl<T> Typed<T> {
	fn check(self, field: &str) -> Result<T, ValidationError> {
		match self {
			Typed::Valid(value) => Ok(value),
			Typed::Invalid(value) => Err(ValidationError::new(
				field,
				format!("invalid type: got {}", json_kind(&value)),
			)),
		}
	}
}

pub(crate) fn required<T>(value: Option<Typed<T>>, field: &str) -> Result<T, ValidationError> {
	value.ok_or_else(|| ValidationError::missing(field))?.check(field)
}

pub(crate) fn optional<T>(value: Option<Typed<T>>, field: &str) -> Result<Option<T>, ValidationError> {
	value.map(|v| v.check(field)).transpose()
}

/// A list member whose elements are type-checked one by one, so a bad
/// element is reported as `name[index]`.
pub(crate) type TypedList<T> = Typed<Vec<Typed<T>>>;

/// `YYYY-MM-DD`, the only date form Search Console accepts.
pub(crate) fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, ValidationError> {
	let shaped = raw.len() == 10 && raw.as_bytes()[4] == b'-' && raw.as_bytes()[7] == b'-';
	let parsed = shaped
		.then(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
		.flatten();

	parsed.ok_or_else(|| {
		ValidationError::new(field, format!("expected a YYYY-MM-DD date, got {raw:?}"))
	})
}

pub(crate) fn parse_timestamp(raw: &str, field: &str) -> Result<DateTime<Utc>, ValidationError> {
	DateTime::parse_from_rfc3339(raw)
		.map(|ts| ts.with_timezone(&Utc))
		.map_err(|e| ValidationError::new(field, format!("expected an RFC 3339 timestamp: {e}")))
}

/// Google's JSON mapping writes int64 as a decimal string; some proxies
/// and test fixtures send plain numbers. Both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Int64Wire {
	Number(i64),
	Text(String),
}

impl Int64Wire {
	pub(crate) fn parse(self, field: &str) -> Result<i64, ValidationError> {
		match self {
			Int64Wire::Number(n) => Ok(n),
			Int64Wire::Text(s) => s
				.trim()
				.parse()
				.map_err(|_| ValidationError::new(field, format!("expected an int64 string, got {s:?}"))),
		}
	}
}

pub(crate) fn serialize_int64<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.collect_str(value)
}

pub(crate) fn serialize_opt_int64<S: Serializer>(
	value: &Option<i64>,
	serializer: S,
) -> Result<S::Ok, S::Error> {
	match value {
		Some(v) => serializer.collect_str(v),
		None => serializer.serialize_none(),
	}
}

/// Check and convert each element of an optional list member, prefixing
/// errors with `name[index]`. An absent list is empty.
pub(crate) fn convert_list<R, T>(list: Option<TypedList<R>>, name: &str) -> Result<Vec<T>, ValidationError>
where
	T: TryFrom<R, Error = ValidationError>,
{
	map_list(list, name, |raw| T::try_from(raw))
}

/// Like [`convert_list`] for lists of scalars, with a per-element parser.
pub(crate) fn map_list<R, T>(
	list: Option<TypedList<R>>,
	name: &str,
	mut convert: impl FnMut(R) -> Result<T, ValidationError>,
) -> Result<Vec<T>, ValidationError> {
	optional(list, name)?
		.unwrap_or_default()
		.into_iter()
		.enumerate()
		.map(|(i, item)| {
			let path = format!("{name}[{i}]");
			item.check("").and_then(&mut convert).map_err(|e| e.nested(&path))
		})
		.collect()
}

/// Decode a JSON value through its raw form.
pub(crate) fn decode<R, T>(value: serde_json::Value) -> Result<T, ValidationError>
where
	R: DeserializeOwned,
	T: TryFrom<R, Error = ValidationError>,
{
	if !value.is_object() {
		return Err(ValidationError::new(
			"",
			format!("expected a JSON object, got {}", json_kind(&value)),
		));
	}

	let raw: R = serde_json::from_value(value).map_err(ValidationError::from_serde)?;
	T::try_from(raw)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
	match value {
		serde_json::Value::Null => "null",
		serde_json::Value::Bool(_) => "a boolean",
		serde_json::Value::Number(_) => "a number",
		serde_json::Value::String(_) => "a string",
		serde_json::Value::Array(_) => "an array",
		serde_json::Value::Object(_) => "an object",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	wire_enum! {
		pub enum Colour {
			Red => "red",
			DeepBlue => "deepBlue",
		}
	}

	#[test]
	fn enum_parsing_ignores_case_and_underscores() {
		for raw in ["deepBlue", "DEEP_BLUE", "deep_blue", "DeepBlue"] {
			assert_eq!(raw.parse::<Colour>().unwrap(), Colour::DeepBlue, "{raw}");
		}
	}

	#[test]
	fn enum_serializes_canonical_name() {
		assert_eq!(serde_json::to_string(&Colour::DeepBlue).unwrap(), "\"deepBlue\"");
		assert_eq!(Colour::Red.to_string(), "red");
	}

	#[test]
	fn from_str_errors_have_no_field() {
		let err = "green".parse::<Colour>().unwrap_err();
		assert_eq!(err.field, "");
		assert!(err.message.contains("green"));
	}

	#[derive(Debug, Deserialize)]
	struct RawPair {
		count: Option<Typed<i64>>,
		names: Option<TypedList<String>>,
	}

	#[test]
	fn wrong_json_type_is_named() {
		let raw: RawPair = serde_json::from_value(serde_json::json!({"count": "10"})).unwrap();
		let err = required(raw.count, "count").unwrap_err();
		assert_eq!(err.field, "count");
		assert_eq!(err.message, "invalid type: got a string");
	}

	#[test]
	fn list_elements_are_checked_by_index() {
		let raw: RawPair =
			serde_json::from_value(serde_json::json!({"names": ["a", 2, "c"]})).unwrap();
		let err = map_list(raw.names, "names", Ok).unwrap_err();
		assert_eq!(err.field, "names[1]");

		let raw: RawPair = serde_json::from_value(serde_json::json!({"names": "a"})).unwrap();
		assert_eq!(map_list(raw.names, "names", Ok).unwrap_err().field, "names");

		let raw: RawPair = serde_json::from_value(serde_json::json!({})).unwrap();
		assert!(map_list(raw.names, "names", Ok).unwrap().is_empty());
	}

	#[test]
	fn unknown_enum_value_lists_allowed_names() {
		let err = parse_enum::<Colour>("green", "colour").unwrap_err();
		assert_eq!(err.field, "colour");
		assert!(err.message.contains("red, deepBlue"));
	}

	#[test]
	fn dates_must_be_zero_padded_iso() {
		assert_eq!(
			parse_date("2025-07-01", "startDate").unwrap(),
			NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
		);
		for bad in ["2025-7-1", "07/01/2025", "2025-02-30", "", "2025-07-01T00:00:00Z"] {
			let err = parse_date(bad, "startDate").unwrap_err();
			assert_eq!(err.field, "startDate", "{bad}");
		}
	}

	#[test]
	fn int64_accepts_string_or_number() {
		assert_eq!(Int64Wire::Text("42".into()).parse("errors").unwrap(), 42);
		assert_eq!(Int64Wire::Number(7).parse("errors").unwrap(), 7);
		assert_eq!(
			Int64Wire::Text("many".into()).parse("errors").unwrap_err().field,
			"errors"
		);
	}

	#[test]
	fn timestamps_normalize_to_utc() {
		let ts = parse_timestamp("2025-08-01T12:30:00+02:00", "lastSubmitted").unwrap();
		assert_eq!(ts.to_rfc3339(), "2025-08-01T10:30:00+00:00");
		assert!(parse_timestamp("yesterday", "lastSubmitted").is_err());
	}
}
