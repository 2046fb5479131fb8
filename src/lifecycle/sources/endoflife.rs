//! endoflife.date API implementation

use std::time::Duration;

use tracing::{debug, warn};

use crate::lifecycle::error::SourceError;
use crate::lifecycle::source::DataSource;

/// Data source backed by the endoflife.date HTTP API
pub struct EndOfLifeSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl EndOfLifeSource {
    /// Creates a new EndOfLifeSource with a custom base URL
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        Self::with_timeout(base_url, None)
    }

    /// Creates a new EndOfLifeSource; `None` keeps the transport's default timeout
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, SourceError> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(concat!("eoldate/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build().map_err(SourceError::Client)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl DataSource for EndOfLifeSource {
    fn fetch(&self, resource: &str) -> Result<Vec<u8>, SourceError> {
        let url = format!("{}/{}", self.base_url, resource);
        debug!("Fetching {}", url);

        let response = self.client.get(&url).send()?;
        let status = response.status();

        if !status.is_success() {
            warn!("endoflife.date returned status {}: {}", status, url);
            return Err(SourceError::RemoteFetchFailed {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes()?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[test]
    fn fetch_returns_raw_body() {
        let mut server = Server::new();
        let body = r#"[{"cycle":"8.3","eol":"2027-12-31","latest":"8.3.12"}]"#;

        let mock = server
            .mock("GET", "/php.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create();

        let source = EndOfLifeSource::new(&server.url()).unwrap();
        let result = source.fetch("php.json").unwrap();

        mock.assert();
        assert_eq!(result, body.as_bytes());
    }

    #[test]
    fn fetch_returns_remote_fetch_failed_for_non_success_status() {
        let mut server = Server::new();

        let mock = server
            .mock("GET", "/nonexistent.json")
            .with_status(404)
            .with_body("Not Found")
            .create();

        let source = EndOfLifeSource::new(&server.url()).unwrap();
        let result = source.fetch("nonexistent.json");

        mock.assert();
        assert!(matches!(
            result,
            Err(SourceError::RemoteFetchFailed { status: 404, .. })
        ));
    }

    #[test]
    fn fetch_does_not_parse_the_body() {
        let mut server = Server::new();

        let mock = server
            .mock("GET", "/all.json")
            .with_status(200)
            .with_body("not json at all")
            .create();

        let source = EndOfLifeSource::new(&format!("{}/", server.url())).unwrap();
        let result = source.fetch("all.json").unwrap();

        mock.assert();
        assert_eq!(result, b"not json at all");
    }

    #[test]
    fn fetch_returns_transport_error_when_unreachable() {
        // Port 1 is reserved and not listening
        let source =
            EndOfLifeSource::with_timeout("http://127.0.0.1:1", Some(Duration::from_secs(2)))
                .unwrap();

        let result = source.fetch("php.json");

        assert!(matches!(result, Err(SourceError::Transport(_))));
    }
}
