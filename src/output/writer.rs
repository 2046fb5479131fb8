//! Report files: plain-text table, JSON records and CSV

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::lifecycle::product::Products;
use crate::output::Column;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write CSV {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Paths of the three reports written for one technology
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub text: PathBuf,
    pub json: PathBuf,
    pub csv: PathBuf,
}

impl ReportPaths {
    pub fn new(dir: &Path, technology: &str) -> Self {
        Self {
            text: dir.join(format!("{technology}.txt")),
            json: dir.join(format!("{technology}.json")),
            csv: dir.join(format!("{technology}.csv")),
        }
    }
}

/// Write `{dir}/{technology}.txt`, `.json` and `.csv`, creating `dir`.
///
/// `table` is the already rendered, uncolored table.
pub fn write_reports(
    dir: &Path,
    technology: &str,
    table: &str,
    products: &Products,
) -> Result<ReportPaths, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let paths = ReportPaths::new(dir, technology);
    write_text(&paths.text, table)?;
    write_json(&paths.json, products)?;
    write_csv(&paths.csv, products)?;

    info!("Wrote {} reports to {:?}", technology, dir);
    Ok(paths)
}

pub fn write_text(path: &Path, contents: &str) -> Result<(), ReportError> {
    write_file(path, contents.as_bytes())
}

/// Pretty JSON array with the same shape as the source payload
pub fn write_json(path: &Path, products: &Products) -> Result<(), ReportError> {
    let json = serde_json::to_vec_pretty(products).map_err(|source| ReportError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    write_file(path, &json)
}

/// Header of every known column, then one record per product
pub fn write_csv(path: &Path, products: &Products) -> Result<(), ReportError> {
    let csv_error = |source: csv::Error| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record(Column::ALL.iter().map(|column| column.name()))
        .map_err(csv_error)?;
    for product in products {
        writer
            .write_record(Column::ALL.iter().map(|column| column.cell(product)))
            .map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn php() -> Products {
        serde_json::from_value(json!([
            {"cycle": "8.3", "eol": "2027-12-31", "latest": "8.3.12", "link": "https://php.net/8.3"},
            {"cycle": "7.4", "eol": false, "latest": "7.4.33", "supportedPHPVersions": ["7.4", "8.0"]}
        ]))
        .unwrap()
    }

    #[test]
    fn write_csv_writes_header_and_one_row_per_record() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("php.csv");

        write_csv(&path, &php()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(
            headers,
            vec![
                "cycle",
                "releaseDate",
                "eol",
                "latest",
                "link",
                "latestReleaseDate",
                "lts",
                "support",
                "extendedSupport",
                "minJavaVersion",
                "supportedPHPVersions",
            ]
        );

        let records: Vec<Vec<String>> = reader
            .records()
            .map(|record| record.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            vec!["8.3", "", "2027-12-31", "8.3.12", "https://php.net/8.3", "", "", "", "", "", ""]
        );
        assert_eq!(
            records[1],
            vec!["7.4", "", "false", "7.4.33", "", "", "", "", "", "", r#"["7.4","8.0"]"#]
        );
    }

    #[test]
    fn write_csv_reports_unwritable_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("php.csv");

        let result = write_csv(&path, &php());

        assert!(matches!(result, Err(ReportError::Csv { path: ref p, .. }) if *p == path));
    }

    #[test]
    fn write_reports_creates_directory_and_all_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("reports");

        let paths = write_reports(&dir, "php", "table\n", &php()).unwrap();

        assert_eq!(paths, ReportPaths::new(&dir, "php"));
        assert_eq!(fs::read_to_string(&paths.text).unwrap(), "table\n");
        assert!(fs::read_to_string(&paths.csv).unwrap().starts_with("cycle,"));

        let written: Products =
            serde_json::from_slice(&fs::read(&paths.json).unwrap()).unwrap();
        assert_eq!(written, php());
    }

    #[test]
    fn write_json_keeps_unknown_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nodejs.json");
        let products: Products =
            serde_json::from_value(json!([{"cycle": "22", "codename": "Jod"}])).unwrap();

        write_json(&path, &products).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value, json!([{"cycle": "22", "codename": "Jod"}]));
    }
}
