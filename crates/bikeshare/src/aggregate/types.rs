//! View-ready output tables.

use std::fmt;

use chrono::Weekday;
use serde::Serialize;

use crate::schema::{WEEKDAY_ORDER, serialize_weekday};

/// Chart directive handed to the rendering sink alongside each view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    HorizontalBar,
    Bar,
    Line,
    Heatmap,
    Pie,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::HorizontalBar => "horizontal_bar",
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Pie => "pie",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A titled table plus the chart it should be rendered as.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View<T> {
    pub title: String,
    pub chart: ChartKind,
    pub data: T,
}

impl<T> View<T> {
    pub fn new(title: impl Into<String>, chart: ChartKind, data: T) -> Self {
        Self {
            title: title.into(),
            chart,
            data,
        }
    }
}

/// Mean rentals for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayAverage {
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub mean: f64,
}

/// Mean rentals for one hour of day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyAverage {
    pub hour: u8,
    pub mean: f64,
}

/// Summed rentals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`.
    pub period: String,
    pub year: i32,
    pub month: u32,
    pub total: u64,
}

/// Summed rentals for one season or weather code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub code: u8,
    pub label: String,
    pub total: u64,
}

/// One weekday row of the weekday × hour matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixRow {
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    /// Mean rentals per hour 0..=23; `None` where no rows matched.
    pub cells: Vec<Option<f64>>,
}

/// Mean rentals by weekday and hour.
///
/// Always holds seven rows in calendar order and 24 hour columns, whatever
/// the sparsity of the input, so "no data" stays distinct from zero rentals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayHourMatrix {
    pub hours: Vec<u8>,
    pub rows: Vec<MatrixRow>,
}

impl WeekdayHourMatrix {
    /// A matrix with every cell missing.
    pub fn empty() -> Self {
        Self {
            hours: (0..24).collect(),
            rows: WEEKDAY_ORDER
                .iter()
                .map(|&weekday| MatrixRow {
                    weekday,
                    cells: vec![None; 24],
                })
                .collect(),
        }
    }

    pub fn cell(&self, weekday: Weekday, hour: u8) -> Option<f64> {
        self.rows
            .get(weekday.num_days_from_monday() as usize)
            .and_then(|row| row.cells.get(hour as usize).copied().flatten())
    }
}

/// The six dashboard views computed from one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub weekday_average: View<Vec<WeekdayAverage>>,
    pub hourly_average: View<Vec<HourlyAverage>>,
    pub monthly_total: View<Vec<MonthlyTotal>>,
    pub weekday_hour: View<WeekdayHourMatrix>,
    pub weather_total: View<Vec<CategoryTotal>>,
    pub season_total: View<Vec<CategoryTotal>>,
}
