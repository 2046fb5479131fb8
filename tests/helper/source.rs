//! Data source and cache test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use tempfile::TempDir;

use eoldate::lifecycle::cache::DiskCache;
use eoldate::lifecycle::error::SourceError;
use eoldate::lifecycle::query::EolClient;
use eoldate::lifecycle::source::DataSource;

pub const PHP: &str = r#"[
  {"cycle":"8.3","releaseDate":"2023-11-23","eol":"2027-12-31","latest":"8.3.12","support":"2025-12-31","lts":false},
  {"cycle":"8.2","releaseDate":"2022-12-08","eol":"2026-12-31","latest":"8.2.24","support":"2024-12-31","lts":false},
  {"cycle":"7.4","releaseDate":"2019-11-28","eol":"2022-11-28","latest":"7.4.33","support":"2021-11-28","lts":false},
  {"cycle":"5.6","releaseDate":"2014-08-28","eol":"2018-12-31","latest":"5.6.40","support":"2017-01-19","lts":false}
]"#;

pub const DOTNETFX: &str = r#"[
  {"cycle":"4.8.1","releaseDate":"2022-08-09","eol":false,"latest":"4.8.1"},
  {"cycle":"4.8","releaseDate":"2019-04-18","eol":false,"latest":"4.8"},
  {"cycle":"4.6.2","releaseDate":"2016-08-02","eol":"2027-01-12","latest":"4.6.2"},
  {"cycle":"3.5 SP1","releaseDate":"2008-11-18","eol":"2029-01-09","latest":"3.5.1"},
  {"cycle":"3.5","releaseDate":"2007-11-19","eol":"2011-07-12","latest":"3.5"}
]"#;

pub const ALL: &str = r#"["dotnetfx","nodejs","php"]"#;

/// In-memory data source that counts every fetch
pub struct FakeSource {
    resources: HashMap<String, Vec<u8>>,
    calls: Arc<AtomicUsize>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            resources: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source serving `all.json`, `php.json` and `dotnetfx.json`
    pub fn endoflife() -> Self {
        Self::new()
            .with_resource("all.json", ALL)
            .with_resource("php.json", PHP)
            .with_resource("dotnetfx.json", DOTNETFX)
    }

    pub fn with_resource(mut self, resource: &str, body: &str) -> Self {
        self.resources
            .insert(resource.to_string(), body.as_bytes().to_vec());
        self
    }

    /// Shared handle to the fetch counter, usable after the source is moved
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl DataSource for FakeSource {
    fn fetch(&self, resource: &str) -> Result<Vec<u8>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.resources
            .get(resource)
            .cloned()
            .ok_or_else(|| SourceError::RemoteFetchFailed {
                status: 404,
                url: format!("fake://{}", resource),
            })
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Create a disk cache in a fresh temporary directory
pub fn create_test_cache() -> (TempDir, DiskCache) {
    let temp_dir = TempDir::new().unwrap();
    let cache = DiskCache::new(temp_dir.path().join("cache"));
    (temp_dir, cache)
}

/// Client over `source` and a fresh cache, pinned to `day`
pub fn create_test_client<D: DataSource>(
    source: D,
    day: NaiveDate,
) -> (TempDir, EolClient<D, DiskCache>) {
    let (temp_dir, cache) = create_test_cache();
    (temp_dir, EolClient::new(source, cache).with_day(day))
}

/// Names of the files currently in the cache directory, sorted
pub fn cached_files(temp_dir: &TempDir) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(temp_dir.path().join("cache")) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
