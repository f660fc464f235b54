//! Date-range and category filtering over daily or hourly rows.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schema::{BikeTables, Record, Season, Weather};

/// Selection applied identically to the daily and the hourly table.
///
/// All predicates are conjunctive. An empty `seasons` or `weathers` set
/// matches nothing, and a range with `date_start > date_end` matches nothing
/// rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub seasons: BTreeSet<Season>,
    pub weathers: BTreeSet<Weather>,
}

impl FilterSpec {
    pub fn new(
        date_start: NaiveDate,
        date_end: NaiveDate,
        seasons: impl IntoIterator<Item = Season>,
        weathers: impl IntoIterator<Item = Weather>,
    ) -> Self {
        Self {
            date_start,
            date_end,
            seasons: seasons.into_iter().collect(),
            weathers: weathers.into_iter().collect(),
        }
    }

    /// The widest selection for a dataset: its full daily date range, every
    /// labelled season, and every weather code seen in the daily table.
    ///
    /// Returns `None` when the daily table is empty.
    pub fn full(tables: &BikeTables) -> Option<Self> {
        let (start, end) = tables.date_bounds()?;
        Some(Self::new(start, end, Season::ALL, tables.weather_codes()))
    }

    /// Replace the date range.
    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_start = start;
        self.date_end = end;
        self
    }

    /// Replace the season selection.
    pub fn with_seasons(mut self, seasons: impl IntoIterator<Item = Season>) -> Self {
        self.seasons = seasons.into_iter().collect();
        self
    }

    /// Replace the weather selection.
    pub fn with_weathers(mut self, weathers: impl IntoIterator<Item = Weather>) -> Self {
        self.weathers = weathers.into_iter().collect();
        self
    }

    /// Whether a single row passes every predicate.
    pub fn matches<R: Record>(&self, row: &R) -> bool {
        let date = row.date();
        self.date_start <= date
            && date <= self.date_end
            && self.seasons.contains(&row.season())
            && self.weathers.contains(&row.weather())
    }

    /// Rows passing the filter, in their original order.
    pub fn apply<'a, R: Record>(&self, rows: &'a [R]) -> Vec<&'a R> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }
}
