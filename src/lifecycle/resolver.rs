//! Version-to-cycle resolution
//!
//! Given the lifecycle records of one technology, decide whether a concrete
//! version is still supported and which record says so.

use chrono::NaiveDate;
use semver::Version;
use tracing::debug;

use crate::lifecycle::constraint::CycleConstraint;
use crate::lifecycle::dates::today;
use crate::lifecycle::error::LifecycleError;
use crate::lifecycle::product::{Product, Products};
use crate::lifecycle::semver::parse_version;

/// Outcome of matching a version against a technology's cycles
#[derive(Debug, Clone, PartialEq)]
pub enum SupportStatus {
    /// The matching cycle has not reached its end-of-life date
    Supported(Product),
    /// The matching cycle reached its end-of-life date
    EndOfLife(Product),
    /// The version is older than the oldest tracked cycle (carried here)
    PredatesOldestCycle(Product),
    /// No cycle contains the version
    NotFound,
}

impl SupportStatus {
    pub fn is_supported(&self) -> bool {
        matches!(self, SupportStatus::Supported(_))
    }

    /// The record backing this verdict, if any
    pub fn record(&self) -> Option<&Product> {
        match self {
            SupportStatus::Supported(product)
            | SupportStatus::EndOfLife(product)
            | SupportStatus::PredatesOldestCycle(product) => Some(product),
            SupportStatus::NotFound => None,
        }
    }
}

impl Products {
    /// Check `version` against these cycles as of today
    pub fn is_version_supported(&self, version: &str) -> Result<SupportStatus, LifecycleError> {
        self.is_version_supported_on(version, today())
    }

    /// Check `version` against these cycles as of `today`.
    ///
    /// 1. Versions below the lowest parseable cycle predate tracking.
    /// 2. Otherwise the first cycle (payload order) whose constraint contains
    ///    the version decides, by comparing its end-of-life date with `today`.
    /// 3. No containing cycle means the version is not recognized.
    pub fn is_version_supported_on(
        &self,
        version: &str,
        today: NaiveDate,
    ) -> Result<SupportStatus, LifecycleError> {
        let requested = parse_version(version)
            .ok_or_else(|| LifecycleError::InvalidVersionString(version.to_string()))?;

        if let Some((lowest, oldest)) = self.lowest_cycle()
            && requested < lowest
        {
            debug!(
                "Version {} predates the oldest tracked cycle {}",
                version, oldest.cycle
            );
            return Ok(SupportStatus::PredatesOldestCycle(oldest.clone()));
        }

        let matched = self.iter().find(|product| {
            CycleConstraint::parse(&product.cycle)
                .is_some_and(|constraint| constraint.contains(&requested))
        });

        let Some(product) = matched else {
            debug!("No cycle contains version {}", version);
            return Ok(SupportStatus::NotFound);
        };

        let eol = product.end_of_life_date_on(today)?;
        debug!(
            "Version {} matched cycle {} (end of life {})",
            version, product.cycle, eol
        );

        if today < eol {
            Ok(SupportStatus::Supported(product.clone()))
        } else {
            Ok(SupportStatus::EndOfLife(product.clone()))
        }
    }

    /// Newest release across all cycles: each record's `latest`, else its `cycle`
    pub fn latest_supported_version(&self) -> Result<Version, LifecycleError> {
        self.iter()
            .filter_map(|product| {
                parse_version(&product.latest).or_else(|| parse_version(&product.cycle))
            })
            .max()
            .ok_or(LifecycleError::NoValidVersionsFound)
    }

    /// The record with the lowest parseable cycle; the first one wins exact ties
    fn lowest_cycle(&self) -> Option<(Version, &Product)> {
        self.iter()
            .filter_map(|product| parse_version(&product.cycle).map(|v| (v, product)))
            .fold(None, |lowest, (version, product)| {
                let keep = lowest
                    .as_ref()
                    .is_some_and(|(current, _): &(Version, &Product)| version >= *current);
                if keep { lowest } else { Some((version, product)) }
            })
    }
}
