//! Per-day file cache of lifecycle payloads
//!
//! Snapshots are keyed by (technology, calendar day). A new day simply stops
//! reading yesterday's files; nothing in the query path deletes them.
//! [`SnapshotStore::prune`] is available as a separate maintenance step.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;
use tracing::{debug, info};

use crate::config::{CACHE_DAY_FORMAT, TECHNOLOGY_LIST_PREFIX};
use crate::lifecycle::error::CacheError;

/// Storage for daily snapshots of raw lifecycle data
#[cfg_attr(test, automock)]
pub trait SnapshotStore {
    /// Read the known technology list cached for `day`
    fn read_technology_list(&self, day: NaiveDate) -> Result<Option<Vec<String>>, CacheError>;

    /// Persist the known technology list for `day`
    fn write_technology_list(&self, technologies: &[String], day: NaiveDate)
    -> Result<(), CacheError>;

    /// Read the raw payload cached for `technology` on `day`
    fn read_records(&self, technology: &str, day: NaiveDate)
    -> Result<Option<Vec<u8>>, CacheError>;

    /// Persist the raw payload for `technology` on `day`
    fn write_records(&self, technology: &str, day: NaiveDate, bytes: &[u8])
    -> Result<(), CacheError>;

    /// Delete snapshots that belong to any day other than `today`.
    ///
    /// Returns the number of deleted snapshots.
    fn prune(&self, today: NaiveDate) -> Result<usize, CacheError>;
}

/// Snapshot store writing one JSON file per key under a root directory
#[derive(Debug, Clone)]
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Day component of snapshot file names (month-day-year)
    pub fn day_key(day: NaiveDate) -> String {
        day.format(CACHE_DAY_FORMAT).to_string()
    }

    /// Path of the known technology list snapshot for `day`
    pub fn technology_list_path(&self, day: NaiveDate) -> PathBuf {
        self.root
            .join(format!("{}-{}.json", TECHNOLOGY_LIST_PREFIX, Self::day_key(day)))
    }

    /// Path of the lifecycle snapshot of `technology` for `day`
    pub fn records_path(&self, technology: &str, day: NaiveDate) -> PathBuf {
        self.root
            .join(format!("{}-{}.json", technology, Self::day_key(day)))
    }

    fn ensure_root(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.root).map_err(|e| io_error(&self.root, e))
    }
}

impl SnapshotStore for DiskCache {
    fn read_technology_list(&self, day: NaiveDate) -> Result<Option<Vec<String>>, CacheError> {
        let path = self.technology_list_path(day);
        let Some(bytes) = read_if_exists(&path)? else {
            debug!("Technology list cache miss: {:?}", path);
            return Ok(None);
        };

        let technologies = String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        debug!("Technology list cache hit: {:?}", path);
        Ok(Some(technologies))
    }

    fn write_technology_list(
        &self,
        technologies: &[String],
        day: NaiveDate,
    ) -> Result<(), CacheError> {
        self.ensure_root()?;

        let mut contents = String::new();
        for technology in technologies.iter().filter(|t| !t.is_empty()) {
            contents.push_str(technology);
            contents.push('\n');
        }

        let path = self.technology_list_path(day);
        fs::write(&path, contents).map_err(|e| io_error(&path, e))?;
        info!(
            "Cached {} technology identifiers at {:?}",
            technologies.len(),
            path
        );
        Ok(())
    }

    fn read_records(
        &self,
        technology: &str,
        day: NaiveDate,
    ) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.records_path(technology, day);
        let bytes = read_if_exists(&path)?;
        debug!(
            "Lifecycle cache {} for {}: {:?}",
            if bytes.is_some() { "hit" } else { "miss" },
            technology,
            path
        );
        Ok(bytes)
    }

    fn write_records(
        &self,
        technology: &str,
        day: NaiveDate,
        bytes: &[u8],
    ) -> Result<(), CacheError> {
        self.ensure_root()?;

        let path = self.records_path(technology, day);
        fs::write(&path, bytes).map_err(|e| io_error(&path, e))?;
        info!("Cached {} bytes for {} at {:?}", bytes.len(), technology, path);
        Ok(())
    }

    /// Files that do not end in a `MM-DD-YYYY.json` day key are left alone.
    fn prune(&self, today: NaiveDate) -> Result<usize, CacheError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(io_error(&self.root, e)),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry.map_err(|e| io_error(&self.root, e))?.path();
            let Some(day) = path.file_name().and_then(|n| n.to_str()).and_then(snapshot_day)
            else {
                continue;
            };
            if day == today {
                continue;
            }

            fs::remove_file(&path).map_err(|e| io_error(&path, e))?;
            debug!("Pruned stale snapshot {:?}", path);
            removed += 1;
        }

        info!("Pruned {} stale snapshots from {:?}", removed, self.root);
        Ok(removed)
    }
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, CacheError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error(path, e)),
    }
}

/// Day key of a snapshot file name such as `php-10-17-2026.json`
fn snapshot_day(file_name: &str) -> Option<NaiveDate> {
    let stem = file_name.strip_suffix(".json")?;
    // "MM-DD-YYYY" is the last 10 characters, preceded by a '-'
    let split = stem.len().checked_sub(10)?;
    let (prefix, key) = (stem.get(..split)?, stem.get(split..)?);
    if prefix.len() < 2 || !prefix.ends_with('-') {
        return None;
    }
    NaiveDate::parse_from_str(key, CACHE_DAY_FORMAT).ok()
}

fn io_error(path: &Path, source: std::io::Error) -> CacheError {
    CacheError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::product::Products;
    use rstest::rstest;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn technologies(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn records_path_uses_month_day_year_key() {
        let cache = DiskCache::new("/cache");

        assert_eq!(
            cache.records_path("php", date(2026, 3, 7)),
            PathBuf::from("/cache/php-03-07-2026.json")
        );
        assert_eq!(
            cache.technology_list_path(date(2026, 3, 7)),
            PathBuf::from("/cache/all-technologies-03-07-2026.json")
        );
    }

    #[test]
    fn read_records_returns_none_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskCache::new(temp_dir.path().join("cache"));

        let result = cache.read_records("php", date(2026, 10, 17)).unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn write_records_creates_directory_and_round_trips_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskCache::new(temp_dir.path().join("nested").join("cache"));
        let day = date(2026, 10, 17);
        let payload = br#"[{"cycle":"8.3","eol":"2027-12-31","codename":"x"}]"#;

        cache.write_records("php", day, payload).unwrap();
        let cached = cache.read_records("php", day).unwrap().unwrap();

        assert_eq!(cached, payload);
        assert_eq!(
            Products::from_slice(&cached).unwrap(),
            Products::from_slice(payload).unwrap()
        );
    }

    #[test]
    fn read_records_ignores_snapshots_from_other_days() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskCache::new(temp_dir.path());

        cache
            .write_records("php", date(2026, 10, 16), b"[]")
            .unwrap();

        assert_eq!(cache.read_records("php", date(2026, 10, 17)).unwrap(), None);
    }

    #[test]
    fn technology_list_round_trips_and_skips_empty_lines() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskCache::new(temp_dir.path());
        let day = date(2026, 10, 17);

        cache
            .write_technology_list(&technologies(&["php", "", "nodejs"]), day)
            .unwrap();

        assert_eq!(
            cache.read_technology_list(day).unwrap(),
            Some(technologies(&["php", "nodejs"]))
        );
        assert_eq!(
            fs::read_to_string(cache.technology_list_path(day)).unwrap(),
            "php\nnodejs\n"
        );
    }

    #[test]
    fn read_technology_list_returns_none_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskCache::new(temp_dir.path());

        assert_eq!(cache.read_technology_list(date(2026, 10, 17)).unwrap(), None);
    }

    #[test]
    fn prune_removes_only_snapshots_of_other_days() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskCache::new(temp_dir.path());
        let today = date(2026, 10, 17);
        let yesterday = date(2026, 10, 16);

        cache.write_records("php", today, b"[]").unwrap();
        cache.write_records("php", yesterday, b"[]").unwrap();
        cache.write_records("nodejs", yesterday, b"[]").unwrap();
        cache
            .write_technology_list(&technologies(&["php"]), yesterday)
            .unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "keep me").unwrap();

        let removed = cache.prune(today).unwrap();

        assert_eq!(removed, 3);
        assert!(cache.records_path("php", today).exists());
        assert!(!cache.records_path("php", yesterday).exists());
        assert!(temp_dir.path().join("notes.txt").exists());
    }

    #[test]
    fn prune_succeeds_when_cache_directory_is_missing() {
        let temp_dir = TempDir::new().unwrap();
        let cache = DiskCache::new(temp_dir.path().join("missing"));

        assert_eq!(cache.prune(date(2026, 10, 17)).unwrap(), 0);
    }

    #[rstest]
    #[case("php-10-17-2026.json", Some(date(2026, 10, 17)))]
    #[case("all-technologies-01-02-2025.json", Some(date(2025, 1, 2)))]
    #[case("amazon-linux-12-31-2024.json", Some(date(2024, 12, 31)))]
    #[case("10-17-2026.json", None)]
    #[case("php-13-17-2026.json", None)]
    #[case("php.json", None)]
    #[case("config.json", None)]
    fn snapshot_day_parses_file_names(#[case] name: &str, #[case] expected: Option<NaiveDate>) {
        assert_eq!(snapshot_day(name), expected);
    }
}
