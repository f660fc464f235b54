//! The six reducers behind the dashboard charts.
//!
//! | View             | Key              | Reducer | Order                     |
//! |------------------|------------------|---------|---------------------------|
//! | weekday average  | weekday          | mean    | Monday → Sunday           |
//! | hourly average   | hour             | mean    | 0 → 23                    |
//! | monthly total    | (year, month)    | sum     | chronological             |
//! | weekday × hour   | (weekday, hour)  | mean    | full 7 × 24 grid          |
//! | weather total    | weather code     | sum     | ascending code            |
//! | season total     | season code      | sum     | ascending code            |
//!
//! Keys with no matching rows are absent, except in the matrix.

use std::collections::BTreeMap;

use chrono::Datelike;

use super::types::{
    CategoryTotal, ChartKind, DashboardViews, HourlyAverage, MatrixRow, MonthlyTotal, View,
    WeekdayAverage, WeekdayHourMatrix,
};
use crate::filter::FilterSpec;
use crate::schema::{BikeTables, HourlyRecord, Record, WEEKDAY_ORDER};

/// Running sum and row count for one group.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    sum: u64,
    rows: usize,
}

impl Tally {
    fn add(&mut self, count: u32) {
        self.sum += u64::from(count);
        self.rows += 1;
    }

    fn mean(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.sum as f64 / self.rows as f64
        }
    }
}

/// Mean rentals per weekday, Monday first; weekdays without rows are omitted.
pub fn weekday_average<R: Record>(rows: &[R]) -> Vec<WeekdayAverage> {
    let mut tallies = [Tally::default(); 7];
    for row in rows {
        tallies[row.weekday().num_days_from_monday() as usize].add(row.count());
    }

    WEEKDAY_ORDER
        .iter()
        .zip(tallies)
        .filter(|(_, tally)| tally.rows > 0)
        .map(|(&weekday, tally)| WeekdayAverage {
            weekday,
            mean: tally.mean(),
        })
        .collect()
}

/// Mean rentals per hour of day, ascending; hours without rows are omitted.
pub fn hourly_average<R: HourlyRecord>(rows: &[R]) -> Vec<HourlyAverage> {
    let mut tallies: BTreeMap<u8, Tally> = BTreeMap::new();
    for row in rows {
        tallies.entry(row.hour()).or_default().add(row.count());
    }

    tallies
        .into_iter()
        .map(|(hour, tally)| HourlyAverage {
            hour,
            mean: tally.mean(),
        })
        .collect()
}

/// Summed rentals per calendar month, chronological.
///
/// Partial months are summed as-is; months with no rows are omitted.
pub fn monthly_total<R: Record>(rows: &[R]) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for row in rows {
        let date = row.date();
        *totals.entry((date.year(), date.month())).or_default() += u64::from(row.count());
    }

    totals
        .into_iter()
        .map(|((year, month), total)| MonthlyTotal {
            period: format!("{:04}-{:02}", year, month),
            year,
            month,
            total,
        })
        .collect()
}

/// Mean rentals per weekday and hour as a complete 7 × 24 grid.
pub fn weekday_hour_matrix<R: HourlyRecord>(rows: &[R]) -> WeekdayHourMatrix {
    let mut tallies = [[Tally::default(); 24]; 7];
    for row in rows {
        let hour = row.hour() as usize;
        if hour < 24 {
            tallies[row.weekday().num_days_from_monday() as usize][hour].add(row.count());
        }
    }

    WeekdayHourMatrix {
        hours: (0..24).collect(),
        rows: WEEKDAY_ORDER
            .iter()
            .zip(tallies)
            .map(|(&weekday, hours)| MatrixRow {
                weekday,
                cells: hours
                    .iter()
                    .map(|tally| (tally.rows > 0).then(|| tally.mean()))
                    .collect(),
            })
            .collect(),
    }
}

/// Summed rentals per weather code, labelled.
pub fn weather_total<R: Record>(rows: &[R]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<_, u64> = BTreeMap::new();
    for row in rows {
        *totals.entry(row.weather()).or_default() += u64::from(row.count());
    }

    totals
        .into_iter()
        .map(|(weather, total)| CategoryTotal {
            code: weather.code(),
            label: weather.label().into_owned(),
            total,
        })
        .collect()
}

/// Summed rentals per season code, labelled.
pub fn season_total<R: Record>(rows: &[R]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<_, u64> = BTreeMap::new();
    for row in rows {
        *totals.entry(row.season()).or_default() += u64::from(row.count());
    }

    totals
        .into_iter()
        .map(|(season, total)| CategoryTotal {
            code: season.code(),
            label: season.label().into_owned(),
            total,
        })
        .collect()
}

impl DashboardViews {
    /// Filter both tables independently and compute every view.
    pub fn compute(tables: &BikeTables, filter: &FilterSpec) -> Self {
        let daily = filter.apply(&tables.daily);
        let hourly = filter.apply(&tables.hourly);
        Self::from_rows(&daily, &hourly)
    }

    /// Compute every view from already-filtered rows.
    pub fn from_rows<D: Record, H: HourlyRecord>(daily: &[D], hourly: &[H]) -> Self {
        Self {
            weekday_average: View::new(
                "Average Rentals by Weekday",
                ChartKind::HorizontalBar,
                weekday_average(daily),
            ),
            hourly_average: View::new(
                "Average Rentals by Hour",
                ChartKind::Bar,
                hourly_average(hourly),
            ),
            monthly_total: View::new(
                "Monthly Rental Trend",
                ChartKind::Line,
                monthly_total(daily),
            ),
            weekday_hour: View::new(
                "Average Rentals by Weekday and Hour",
                ChartKind::Heatmap,
                weekday_hour_matrix(hourly),
            ),
            weather_total: View::new(
                "Rentals by Weather",
                ChartKind::Bar,
                weather_total(daily),
            ),
            season_total: View::new(
                "Rentals by Season",
                ChartKind::Pie,
                season_total(daily),
            ),
        }
    }
}
