//! CSV/TSV parser with delimiter detection.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{DataSource, DataTable, SourceMetadata};
use crate::error::{BikeshareError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Non-blank lines sampled for detection.
const SAMPLE_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses tabular data sources.
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Read and parse a source, returning the table and its metadata.
    pub fn parse_source(&self, source: &DataSource) -> Result<(DataTable, SourceMetadata)> {
        let contents = source.read_bytes()?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents, self.config.quote)?,
        };

        let data_table = self.parse_bytes(&contents, delimiter)?;

        let format = format_name(delimiter).to_string();

        debug!(
            source = %source,
            rows = data_table.row_count(),
            columns = data_table.column_count(),
            format = %format,
            "Parsed source table"
        );

        let source_metadata = SourceMetadata::new(
            source.clone(),
            hash,
            size_bytes,
            format,
            data_table.row_count(),
            data_table.column_count(),
        );

        Ok((data_table, source_metadata))
    }

    /// Parse bytes with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }
            records.push(result?);
        }

        let headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.trim().to_string()).collect()
        } else {
            match records.first() {
                Some(record) => (0..record.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect(),
                None => return Err(BikeshareError::EmptyData("No data rows found".to_string())),
            }
        };

        if headers.is_empty() {
            return Err(BikeshareError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| {
                let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
                row.resize(expected_cols, String::new());
                row
            })
            .collect();

        if rows.is_empty() {
            return Err(BikeshareError::EmptyData("No data rows found".to_string()));
        }

        Ok(DataTable::new(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the candidate that splits the leading lines into the most fields.
///
/// A delimiter that yields the same width on every sampled line beats one
/// that doesn't; tab wins a tie.
pub(crate) fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let sample: Vec<u8> = bytes
        .split(|&b| b == b'\n')
        .filter(|line| !line.trim_ascii().is_empty())
        .take(SAMPLE_LINES)
        .flat_map(|line| line.iter().copied().chain(std::iter::once(b'\n')))
        .collect();

    if sample.is_empty() {
        return Err(BikeshareError::EmptyData("No lines to analyze".to_string()));
    }

    let best = DELIMITERS
        .iter()
        .filter_map(|&delim| {
            let (consistent, width) = split_widths(&sample, delim, quote)?;
            Some(((consistent, width, delim == b'\t'), delim))
        })
        .max_by_key(|&(score, _)| score)
        .map(|(_, delim)| delim);

    Ok(best.unwrap_or(b','))
}

/// Field count of the first sampled line, and whether every line matches it.
/// `None` when the delimiter never splits the first line.
fn split_widths(sample: &[u8], delimiter: u8, quote: u8) -> Option<(bool, usize)> {
    let widths: Vec<usize> = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(sample)
        .records()
        .map_while(|record| record.ok())
        .map(|record| record.len())
        .collect();

    let first = *widths.first()?;
    if first < 2 {
        return None;
    }
    Some((widths.iter().all(|&w| w == first), first))
}

fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}
