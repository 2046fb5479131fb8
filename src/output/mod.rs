//! Rendering of lifecycle records for terminals and report files
//!
//! - [`table`]: aligned text table, optionally colored by date
//! - [`report`]: verdict text for a version support check
//! - [`writer`]: `.txt`, `.json` and `.csv` report files

pub mod report;
pub mod table;
pub mod writer;

pub use table::TableBuilder;

use serde_json::Value;

use crate::lifecycle::product::{LifecycleField, Product};

/// Known record columns, in payload field order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Cycle,
    ReleaseDate,
    Eol,
    Latest,
    Link,
    LatestReleaseDate,
    Lts,
    Support,
    ExtendedSupport,
    MinJavaVersion,
    SupportedPhpVersions,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Cycle,
        Column::ReleaseDate,
        Column::Eol,
        Column::Latest,
        Column::Link,
        Column::LatestReleaseDate,
        Column::Lts,
        Column::Support,
        Column::ExtendedSupport,
        Column::MinJavaVersion,
        Column::SupportedPhpVersions,
    ];

    /// The JSON key of this column
    pub fn name(self) -> &'static str {
        match self {
            Column::Cycle => "cycle",
            Column::ReleaseDate => "releaseDate",
            Column::Eol => "eol",
            Column::Latest => "latest",
            Column::Link => "link",
            Column::LatestReleaseDate => "latestReleaseDate",
            Column::Lts => "lts",
            Column::Support => "support",
            Column::ExtendedSupport => "extendedSupport",
            Column::MinJavaVersion => "minJavaVersion",
            Column::SupportedPhpVersions => "supportedPHPVersions",
        }
    }

    /// Whether cells of this column are colored by their date
    pub fn is_dated(self) -> bool {
        matches!(self, Column::Eol | Column::Support)
    }

    /// Display text of this column for `product`; empty when missing
    pub fn cell(self, product: &Product) -> String {
        match self {
            Column::Cycle => product.cycle.clone(),
            Column::ReleaseDate => product.release_date.clone().unwrap_or_default(),
            Column::Eol => product.eol.display(),
            Column::Latest => product.latest.clone(),
            Column::Link => product.link.clone().unwrap_or_default(),
            Column::LatestReleaseDate => product.latest_release_date.clone().unwrap_or_default(),
            Column::Lts => product.lts.display(),
            Column::Support => product.support.display(),
            Column::ExtendedSupport => product.extended_support.display(),
            Column::MinJavaVersion => product.min_java_version.map(format_number).unwrap_or_default(),
            Column::SupportedPhpVersions => match &product.supported_php_versions {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(text)) => text.clone(),
                Some(other) => other.to_string(),
            },
        }
    }

    /// Whether `product` carries a meaningful value in this column.
    ///
    /// `false` flags, empty strings and empty collections count as missing.
    pub fn is_filled(self, product: &Product) -> bool {
        match self {
            Column::Eol => field_is_filled(&product.eol),
            Column::Lts => field_is_filled(&product.lts),
            Column::Support => field_is_filled(&product.support),
            Column::ExtendedSupport => field_is_filled(&product.extended_support),
            Column::MinJavaVersion => product.min_java_version.is_some_and(|v| v != 0.0),
            Column::SupportedPhpVersions => product
                .supported_php_versions
                .as_ref()
                .is_some_and(value_is_filled),
            _ => !self.cell(product).is_empty(),
        }
    }
}

fn field_is_filled(field: &LifecycleField) -> bool {
    match field {
        LifecycleField::Absent => false,
        LifecycleField::Text(text) => !text.is_empty(),
        LifecycleField::Flag(flag) => *flag,
        LifecycleField::Other(value) => value_is_filled(value),
    }
}

fn value_is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(_) => true,
    }
}

/// Whole numbers without decimals, everything else with two
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
