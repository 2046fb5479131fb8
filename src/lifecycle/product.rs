//! Lifecycle record model
//!
//! One [`Product`] is one support cycle of a technology as published by
//! endoflife.date. Several fields change their JSON type from record to record
//! (`"eol": "2025-12-31"` vs `"eol": false`), so they are decoded into
//! [`LifecycleField`] instead of a fixed type.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lifecycle::dates::{add_years, parse_full_date, parse_lifecycle_date, today};
use crate::lifecycle::error::LifecycleError;

/// A lifecycle field that may be a date string, a boolean flag, or missing
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LifecycleField {
    /// Key missing or `null`
    #[default]
    Absent,
    /// String value, kept exactly as published
    Text(String),
    /// Boolean value
    Flag(bool),
    /// Any other JSON shape; preserved so decoding never fails on it
    Other(Value),
}

impl LifecycleField {
    pub fn is_absent(&self) -> bool {
        matches!(self, LifecycleField::Absent)
    }

    /// The string value, if this field holds one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            LifecycleField::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Name of the JSON shape, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleField::Absent => "absent",
            LifecycleField::Text(_) => "string",
            LifecycleField::Flag(_) => "boolean",
            LifecycleField::Other(Value::Number(_)) => "number",
            LifecycleField::Other(Value::Array(_)) => "array",
            LifecycleField::Other(Value::Object(_)) => "object",
            LifecycleField::Other(_) => "unknown",
        }
    }

    /// Display form used by tables and CSV
    pub fn display(&self) -> String {
        match self {
            LifecycleField::Absent => String::new(),
            LifecycleField::Text(text) => text.clone(),
            LifecycleField::Flag(flag) => flag.to_string(),
            LifecycleField::Other(value) => value.to_string(),
        }
    }
}

impl From<Value> for LifecycleField {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => LifecycleField::Absent,
            Value::String(text) => LifecycleField::Text(text),
            Value::Bool(flag) => LifecycleField::Flag(flag),
            other => LifecycleField::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for LifecycleField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(LifecycleField::from)
    }
}

impl Serialize for LifecycleField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LifecycleField::Absent => serializer.serialize_none(),
            LifecycleField::Text(text) => serializer.serialize_str(text),
            LifecycleField::Flag(flag) => serializer.serialize_bool(*flag),
            LifecycleField::Other(value) => value.serialize(serializer),
        }
    }
}

/// One support cycle of a technology
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    #[serde(deserialize_with = "string_or_number", skip_serializing_if = "String::is_empty")]
    pub cycle: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,

    #[serde(skip_serializing_if = "LifecycleField::is_absent")]
    pub eol: LifecycleField,

    #[serde(deserialize_with = "string_or_number", skip_serializing_if = "String::is_empty")]
    pub latest: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_release_date: Option<String>,

    #[serde(skip_serializing_if = "LifecycleField::is_absent")]
    pub lts: LifecycleField,

    #[serde(skip_serializing_if = "LifecycleField::is_absent")]
    pub support: LifecycleField,

    #[serde(skip_serializing_if = "LifecycleField::is_absent")]
    pub extended_support: LifecycleField,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_java_version: Option<f64>,

    #[serde(
        rename = "supportedPHPVersions",
        skip_serializing_if = "Option::is_none"
    )]
    pub supported_php_versions: Option<Value>,

    /// Keys this model does not know about, in payload order
    #[serde(flatten)]
    pub additional_fields: IndexMap<String, Value>,
}

impl Product {
    /// Resolve the `eol` field to a concrete date relative to today
    pub fn end_of_life_date(&self) -> Result<NaiveDate, LifecycleError> {
        self.end_of_life_date_on(today())
    }

    /// Resolve the `eol` field to a concrete date.
    ///
    /// - date strings: `YYYY-MM-DD`, then `YYYY-MM`, then `YYYY`
    /// - `true` (ended, no date published): one year before `today`
    /// - `false` (no end scheduled): 100 years after `today`
    pub fn end_of_life_date_on(&self, today: NaiveDate) -> Result<NaiveDate, LifecycleError> {
        match &self.eol {
            LifecycleField::Text(value) => {
                parse_lifecycle_date(value).ok_or_else(|| LifecycleError::UnparseableEolDate {
                    cycle: self.cycle.clone(),
                    value: value.clone(),
                })
            }
            LifecycleField::Flag(true) => Ok(add_years(today, -1)),
            LifecycleField::Flag(false) => Ok(add_years(today, 100)),
            other @ (LifecycleField::Absent | LifecycleField::Other(_)) => {
                Err(LifecycleError::UnrecognizedEolType {
                    cycle: self.cycle.clone(),
                    kind: other.kind().to_string(),
                })
            }
        }
    }

    /// The date support really ends: a `support` date wins over an `eol` date.
    ///
    /// Only full `YYYY-MM-DD` strings count; flags yield nothing here.
    pub fn effective_end_date(&self) -> Option<NaiveDate> {
        self.support
            .as_text()
            .and_then(parse_full_date)
            .or_else(|| self.eol.as_text().and_then(parse_full_date))
    }
}

/// Lifecycle records for one technology, in payload order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Products(pub Vec<Product>);

impl Products {
    /// Decode a raw endoflife.date payload
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Product>> for Products {
    fn from(products: Vec<Product>) -> Self {
        Self(products)
    }
}

impl<'a> IntoIterator for &'a Products {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Every technology identifier known to the data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllProducts(pub Vec<String>);

impl AllProducts {
    pub fn contains(&self, technology: &str) -> bool {
        self.0.iter().any(|known| known == technology)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for AllProducts {
    fn from(technologies: Vec<String>) -> Self {
        Self(technologies)
    }
}

/// Accept `"7.4"` as well as `7.4` / `18` for identifier fields
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}
