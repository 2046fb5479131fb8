//! Query facade over the data source, the snapshot store and the resolver

use chrono::NaiveDate;
use semver::Version;
use tracing::debug;

use crate::lifecycle::cache::SnapshotStore;
use crate::lifecycle::dates::today;
use crate::lifecycle::error::QueryError;
use crate::lifecycle::product::{AllProducts, Products};
use crate::lifecycle::resolver::SupportStatus;
use crate::lifecycle::source::{DataSource, all_technologies_resource, technology_resource};
use crate::logging::{FailureRecorder, TracingRecorder};

/// Answer to "is this version of that technology still supported?"
#[derive(Debug, Clone, PartialEq)]
pub struct SupportReport {
    pub supported: bool,
    /// Newest release across every cycle of the technology
    pub latest_version: Version,
    pub status: SupportStatus,
}

/// Lifecycle lookups that read today's snapshot first and fall back to the
/// data source, caching what it returns.
pub struct EolClient<D, S> {
    source: D,
    store: S,
    recorder: Box<dyn FailureRecorder>,
    day: Option<NaiveDate>,
}

impl<D: DataSource, S: SnapshotStore> EolClient<D, S> {
    pub fn new(source: D, store: S) -> Self {
        Self {
            source,
            store,
            recorder: Box::new(TracingRecorder),
            day: None,
        }
    }

    /// Replace the recorder that receives every failure before it is returned
    pub fn with_recorder(mut self, recorder: Box<dyn FailureRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    /// Pin the reference day instead of following the local clock
    pub fn with_day(mut self, day: NaiveDate) -> Self {
        self.day = Some(day);
        self
    }

    /// The reference day used for cache keys and end-of-life comparisons
    pub fn day(&self) -> NaiveDate {
        self.day.unwrap_or_else(today)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All technology identifiers the data source tracks
    pub fn known_technologies(&self) -> Result<AllProducts, QueryError> {
        let result = self.load_technologies();
        self.recorded("known_technologies", result)
    }

    /// Lifecycle records of `technology` (case-insensitive)
    pub fn get_product(&self, technology: &str) -> Result<Products, QueryError> {
        let result = self.load_products(technology);
        self.recorded("get_product", result)
    }

    /// Resolve `version` of `technology` against its cycles
    pub fn is_supported_software_version(
        &self,
        technology: &str,
        version: &str,
    ) -> Result<SupportReport, QueryError> {
        let result = self.check_version(technology, version);
        self.recorded("is_supported_software_version", result)
    }

    fn load_technologies(&self) -> Result<AllProducts, QueryError> {
        let day = self.day();
        if let Some(technologies) = self.store.read_technology_list(day)? {
            return Ok(AllProducts::from(technologies));
        }

        let bytes = self.source.fetch(all_technologies_resource())?;
        let technologies: Vec<String> = serde_json::from_slice(&bytes)?;
        self.store.write_technology_list(&technologies, day)?;

        debug!("Loaded {} known technologies", technologies.len());
        Ok(AllProducts::from(technologies))
    }

    fn load_products(&self, technology: &str) -> Result<Products, QueryError> {
        let name = technology.to_lowercase();
        if !self.load_technologies()?.contains(&name) {
            return Err(QueryError::UnknownTechnology {
                name: technology.to_string(),
            });
        }

        let day = self.day();
        if let Some(bytes) = self.store.read_records(&name, day)? {
            return Ok(Products::from_slice(&bytes)?);
        }

        let bytes = self.source.fetch(&technology_resource(&name))?;
        // Only a payload that decodes is worth caching
        let products = Products::from_slice(&bytes)?;
        self.store.write_records(&name, day, &bytes)?;

        debug!("Loaded {} cycles for {}", products.len(), name);
        Ok(products)
    }

    fn check_version(&self, technology: &str, version: &str) -> Result<SupportReport, QueryError> {
        let products = self.load_products(technology)?;
        let status = products.is_version_supported_on(version, self.day())?;
        let latest_version = products.latest_supported_version()?;

        Ok(SupportReport {
            supported: status.is_supported(),
            latest_version,
            status,
        })
    }

    fn recorded<T>(&self, operation: &str, result: Result<T, QueryError>) -> Result<T, QueryError> {
        if let Err(error) = &result {
            self.recorder.record_failure(operation, error);
        }
        result
    }
}
