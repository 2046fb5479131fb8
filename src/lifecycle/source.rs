//! Data source trait for fetching raw lifecycle payloads

#[cfg(test)]
use mockall::automock;

use crate::config::ALL_TECHNOLOGIES_RESOURCE;
use crate::lifecycle::error::SourceError;

/// Trait for fetching raw lifecycle payloads from a remote source
#[cfg_attr(test, automock)]
pub trait DataSource {
    /// Fetches one resource relative to the source's base URL
    ///
    /// # Arguments
    /// * `resource` - Resource path, e.g. "php.json" or "all.json"
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - The response body, unparsed
    /// * `Err(SourceError)` - Transport failure or non-success status
    fn fetch(&self, resource: &str) -> Result<Vec<u8>, SourceError>;
}

/// Resource path of one technology's lifecycle records
pub fn technology_resource(technology: &str) -> String {
    format!("{technology}.json")
}

/// Resource path of the known technology list
pub fn all_technologies_resource() -> &'static str {
    ALL_TECHNOLOGIES_RESOURCE
}
