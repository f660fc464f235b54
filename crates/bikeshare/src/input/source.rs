//! Data source abstraction and metadata.

use std::fmt;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BikeshareError, Result};

/// Where a table is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum DataSource {
    /// A delimited file on the local filesystem.
    File(PathBuf),
    /// A delimited file served over HTTP(S).
    Url(String),
}

impl DataSource {
    /// Interpret a user-supplied location: `http(s)://` is a URL, anything else a path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }

    /// Stable identity of the source, used as the cache key.
    pub fn identity(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Url(url) => url.clone(),
        }
    }

    /// Cheap change detector for the source.
    ///
    /// Files are fingerprinted by length and modification time. Remote
    /// sources are fingerprinted by their URL alone, so they are fetched
    /// once per cache owner.
    pub fn fingerprint(&self) -> Result<String> {
        match self {
            DataSource::File(path) => {
                let meta = std::fs::metadata(path).map_err(|e| BikeshareError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                let modified = meta
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_nanos())
                    .unwrap_or(0);
                Ok(format!("{}:{}", meta.len(), modified))
            }
            DataSource::Url(url) => Ok(url.clone()),
        }
    }

    /// Read the raw bytes of the source.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        match self {
            DataSource::File(path) => std::fs::read(path).map_err(|e| BikeshareError::Io {
                path: path.clone(),
                source: e,
            }),
            DataSource::Url(url) => {
                let fetch_err = |source| BikeshareError::Fetch {
                    url: url.clone(),
                    source,
                };
                let response = reqwest::blocking::get(url)
                    .and_then(|r| r.error_for_status())
                    .map_err(fetch_err)?;
                let bytes = response.bytes().map_err(fetch_err)?;
                Ok(bytes.to_vec())
            }
        }
    }

    /// Short display name (file name or last URL segment).
    pub fn name(&self) -> String {
        match self {
            DataSource::File(path) => path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            DataSource::Url(url) => url
                .rsplit('/')
                .next()
                .unwrap_or(url.as_str())
                .to_string(),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identity())
    }
}

impl From<&str> for DataSource {
    fn from(location: &str) -> Self {
        DataSource::parse(location)
    }
}

/// Metadata about a loaded source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name or last URL segment.
    pub file: String,
    /// Where the table came from.
    pub source: DataSource,
    /// SHA-256 hash of the raw contents.
    pub hash: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the table was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a source that has been parsed.
    pub fn new(
        source: DataSource,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        Self {
            file: source.name(),
            source,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Represents parsed tabular data.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }
}
