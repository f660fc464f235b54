//! Splits raw tables into the canonical daily and hourly row sets.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use super::columns::ColumnMapping;
use super::rows::{BikeTables, DailyRow, HourlyRow};
use super::types::{Season, Weather};
use crate::error::{BikeshareError, Result};
use crate::input::DataTable;

/// Date formats accepted for the date column.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Datetime formats accepted for the date column (time of day is dropped).
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Derives [`BikeTables`] from raw source tables.
///
/// Row numbers in [`BikeshareError::Parse`] are 1-based data rows, not
/// counting the header.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    columns: ColumnMapping,
}

/// Resolved positions of the columns needed for one row shape.
struct Positions {
    date: usize,
    season: usize,
    weather: usize,
    count: usize,
    hour: Option<usize>,
    level: Option<usize>,
}

impl Normalizer {
    /// Normalizer for the default merged-file column names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizer with custom column names.
    pub fn with_columns(columns: ColumnMapping) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &ColumnMapping {
        &self.columns
    }

    /// Normalize one wide table holding both daily- and hourly-grain columns.
    pub fn from_merged(&self, table: &DataTable) -> Result<BikeTables> {
        let mut missing = Vec::new();
        let daily = self.daily_positions(table, &mut missing);
        let hourly = self.hourly_positions(table, &mut missing);
        let (Some(daily), Some(hourly)) = (daily, hourly) else {
            return Err(BikeshareError::Schema { missing });
        };

        let tables = BikeTables::new(
            self.daily_rows(table, &daily)?,
            self.hourly_rows(table, &hourly)?,
        );
        debug!(
            daily_rows = tables.daily.len(),
            hourly_rows = tables.hourly.len(),
            "Normalized merged table"
        );
        Ok(tables)
    }

    /// Normalize separate daily and hourly tables.
    pub fn from_split(&self, day: &DataTable, hour: &DataTable) -> Result<BikeTables> {
        let mut day_missing = Vec::new();
        let mut hour_missing = Vec::new();
        let daily = self.daily_positions(day, &mut day_missing);
        let hourly = self.hourly_positions(hour, &mut hour_missing);

        let missing: Vec<String> = day_missing
            .into_iter()
            .map(|c| format!("{} (day table)", c))
            .chain(hour_missing.into_iter().map(|c| format!("{} (hour table)", c)))
            .collect();
        let (Some(daily), Some(hourly)) = (daily, hourly) else {
            return Err(BikeshareError::Schema { missing });
        };

        let tables = BikeTables::new(
            self.daily_rows(day, &daily)?,
            self.hourly_rows(hour, &hourly)?,
        );
        debug!(
            daily_rows = tables.daily.len(),
            hourly_rows = tables.hourly.len(),
            "Normalized split tables"
        );
        Ok(tables)
    }

    fn daily_positions(&self, table: &DataTable, missing: &mut Vec<String>) -> Option<Positions> {
        let c = &self.columns;
        let date = require(table, &c.date, missing);
        let season = require(table, &c.season, missing);
        let weather = require(table, &c.daily_weather, missing);
        let count = require(table, &c.daily_count, missing);
        Some(Positions {
            date: date?,
            season: season?,
            weather: weather?,
            count: count?,
            hour: None,
            level: c.level.as_deref().and_then(|l| table.column_index(l)),
        })
    }

    fn hourly_positions(&self, table: &DataTable, missing: &mut Vec<String>) -> Option<Positions> {
        let c = &self.columns;
        let date = require(table, &c.date, missing);
        let season = require(table, &c.season, missing);
        let hour = require(table, &c.hour, missing);
        let weather = require(table, &c.hourly_weather, missing);
        let count = require(table, &c.hourly_count, missing);
        Some(Positions {
            date: date?,
            season: season?,
            weather: weather?,
            count: count?,
            hour: Some(hour?),
            level: c.level.as_deref().and_then(|l| table.column_index(l)),
        })
    }

    /// One row per distinct date, keeping the first occurrence.
    fn daily_rows(&self, table: &DataTable, pos: &Positions) -> Result<Vec<DailyRow>> {
        let c = &self.columns;
        let dates = parse_dates(table, pos.date, &c.date)?;

        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        for (idx, date) in dates.into_iter().enumerate() {
            if !seen.insert(date) {
                continue;
            }
            let mut row = DailyRow::new(
                date,
                Season(parse_code(table, idx, pos.season, &c.season)?),
                Weather(parse_code(table, idx, pos.weather, &c.daily_weather)?),
                parse_count(table, idx, pos.count, &c.daily_count)?,
            );
            row.level = level_at(table, idx, pos.level);
            rows.push(row);
        }
        Ok(rows)
    }

    /// One row per source row; no de-duplication.
    fn hourly_rows(&self, table: &DataTable, pos: &Positions) -> Result<Vec<HourlyRow>> {
        let c = &self.columns;
        let dates = parse_dates(table, pos.date, &c.date)?;
        let hour_col = pos.hour.unwrap_or_default();

        let mut rows = Vec::with_capacity(dates.len());
        for (idx, date) in dates.into_iter().enumerate() {
            let hour = parse_code(table, idx, hour_col, &c.hour)?;
            if hour > 23 {
                return Err(parse_error(table, idx, hour_col, &c.hour));
            }
            let mut row = HourlyRow::new(
                date,
                Season(parse_code(table, idx, pos.season, &c.season)?),
                hour,
                Weather(parse_code(table, idx, pos.weather, &c.hourly_weather)?),
                parse_count(table, idx, pos.count, &c.hourly_count)?,
            );
            row.level = level_at(table, idx, pos.level);
            rows.push(row);
        }
        Ok(rows)
    }
}

fn require(table: &DataTable, name: &str, missing: &mut Vec<String>) -> Option<usize> {
    let index = table.column_index(name);
    if index.is_none() && !missing.iter().any(|m| m == name) {
        missing.push(name.to_string());
    }
    index
}

fn cell(table: &DataTable, row: usize, col: usize) -> &str {
    table.get(row, col).unwrap_or("").trim()
}

fn parse_error(table: &DataTable, row: usize, col: usize, column: &str) -> BikeshareError {
    BikeshareError::Parse {
        row: row + 1,
        column: column.to_string(),
        value: cell(table, row, col).to_string(),
    }
}

/// Parse the whole date column before anything else.
fn parse_dates(table: &DataTable, col: usize, column: &str) -> Result<Vec<NaiveDate>> {
    (0..table.row_count())
        .map(|idx| parse_date(cell(table, idx, col)).ok_or_else(|| parse_error(table, idx, col, column)))
        .collect()
}

/// Parse a calendar date, accepting a few common layouts.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse an integer, accepting integral floats such as `"3.0"`.
fn parse_integral(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().or_else(|| {
        let f = value.parse::<f64>().ok()?;
        (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
    })
}

fn parse_code(table: &DataTable, row: usize, col: usize, column: &str) -> Result<u8> {
    parse_integral(cell(table, row, col))
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| parse_error(table, row, col, column))
}

fn parse_count(table: &DataTable, row: usize, col: usize, column: &str) -> Result<u32> {
    parse_integral(cell(table, row, col))
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| parse_error(table, row, col, column))
}

fn level_at(table: &DataTable, row: usize, col: Option<usize>) -> Option<String> {
    let value = cell(table, row, col?);
    (!value.is_empty()).then(|| value.to_string())
}
