//! Aggregations from filtered rows to view-ready tables.

mod types;
mod views;

pub use types::{
    CategoryTotal, ChartKind, DashboardViews, HourlyAverage, MatrixRow, MonthlyTotal, View,
    WeekdayAverage, WeekdayHourMatrix,
};
pub use views::{
    hourly_average, monthly_total, season_total, weather_total, weekday_average,
    weekday_hour_matrix,
};
