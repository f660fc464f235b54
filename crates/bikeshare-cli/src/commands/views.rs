//! Views command - compute and print the six dashboard views.

use std::path::Path;

use chrono::NaiveDate;
use colored::Colorize;

use bikeshare::aggregate::{CategoryTotal, WeekdayHourMatrix};
use bikeshare::schema::weekday_name;
use bikeshare::{Dashboard, DashboardViews, FilterSpec, Season, View, Weather};

use super::resolve_config;

/// User selection; unset parts fall back to the widest filter.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub seasons: Vec<u8>,
    pub weathers: Vec<u8>,
}

impl Selection {
    /// Narrow `base` by whatever the selection sets. An empty code list
    /// means "not given" here, not "select nothing".
    pub fn apply_to(&self, base: FilterSpec) -> FilterSpec {
        let start = self.start.unwrap_or(base.date_start);
        let end = self.end.unwrap_or(base.date_end);
        let mut filter = base.with_range(start, end);
        if !self.seasons.is_empty() {
            filter = filter.with_seasons(self.seasons.iter().copied().map(Season));
        }
        if !self.weathers.is_empty() {
            filter = filter.with_weathers(self.weathers.iter().copied().map(Weather));
        }
        filter
    }
}

pub fn run(
    config_file: Option<&Path>,
    source: Option<String>,
    selection: Selection,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(config_file, source.as_deref(), None)?;
    let dashboard = Dashboard::new(config);

    let filter = selection.apply_to(dashboard.default_filter()?);
    let views = dashboard.views(&filter)?;

    if json_output {
        let output = serde_json::json!({
            "filter": filter,
            "views": views,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_selection(&dashboard, &filter);
    print_views(&views);
    Ok(())
}

fn print_selection(dashboard: &Dashboard, filter: &FilterSpec) {
    println!(
        "{} {}",
        "Bike-sharing views for".cyan().bold(),
        dashboard.config().data_source.to_string().white()
    );
    println!("  Range:   {} .. {}", filter.date_start, filter.date_end);
    let seasons: Vec<String> = filter.seasons.iter().map(|s| s.label().into_owned()).collect();
    let weathers: Vec<String> = filter.weathers.iter().map(|w| w.label().into_owned()).collect();
    println!("  Seasons: {}", seasons.join(", "));
    println!("  Weather: {}", weathers.join(", "));
    println!();
}

/// Bar scaled to the largest value in its view.
fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

fn heading<T>(view: &View<T>) {
    println!(
        "{} {}",
        view.title.yellow().bold(),
        format!("({})", view.chart).dimmed()
    );
}

fn print_empty_or<F: FnOnce()>(is_empty: bool, print: F) {
    if is_empty {
        println!("  {}", "No data for this selection".dimmed());
    } else {
        print();
    }
    println!();
}

fn print_categories(view: &View<Vec<CategoryTotal>>) {
    heading(view);
    print_empty_or(view.data.is_empty(), || {
        let max = view.data.iter().map(|c| c.total).max().unwrap_or(0) as f64;
        for entry in &view.data {
            println!(
                "  {:<20} {:<30} {}",
                entry.label,
                bar(entry.total as f64, max, 30).cyan(),
                entry.total
            );
        }
    });
}

fn print_matrix(view: &View<WeekdayHourMatrix>) {
    heading(view);
    let matrix = &view.data;
    let has_data = matrix
        .rows
        .iter()
        .any(|row| row.cells.iter().any(Option::is_some));
    print_empty_or(!has_data, || {
        let header: String = matrix.hours.iter().map(|h| format!("{:>5}", h)).collect();
        println!("  {:<4}{}", "", header.dimmed());
        for row in &matrix.rows {
            let cells: String = row
                .cells
                .iter()
                .map(|cell| match cell {
                    Some(mean) => format!("{:>5.0}", mean),
                    None => format!("{:>5}", "-"),
                })
                .collect();
            println!("  {:<4}{}", &weekday_name(row.weekday)[..3], cells);
        }
    });
}

fn print_views(views: &DashboardViews) {
    let weekday = &views.weekday_average;
    heading(weekday);
    print_empty_or(weekday.data.is_empty(), || {
        let max = weekday.data.iter().map(|w| w.mean).fold(0.0, f64::max);
        for entry in &weekday.data {
            println!(
                "  {:<10} {:<30} {:.1}",
                weekday_name(entry.weekday),
                bar(entry.mean, max, 30).cyan(),
                entry.mean
            );
        }
    });

    let hourly = &views.hourly_average;
    heading(hourly);
    print_empty_or(hourly.data.is_empty(), || {
        let max = hourly.data.iter().map(|h| h.mean).fold(0.0, f64::max);
        for entry in &hourly.data {
            println!(
                "  {:02}:00  {:<30} {:.1}",
                entry.hour,
                bar(entry.mean, max, 30).cyan(),
                entry.mean
            );
        }
    });

    let monthly = &views.monthly_total;
    heading(monthly);
    print_empty_or(monthly.data.is_empty(), || {
        let max = monthly.data.iter().map(|m| m.total).max().unwrap_or(0) as f64;
        for entry in &monthly.data {
            println!(
                "  {}  {:<30} {}",
                entry.period,
                bar(entry.total as f64, max, 30).cyan(),
                entry.total
            );
        }
    });

    print_matrix(&views.weekday_hour);
    print_categories(&views.weather_total);
    print_categories(&views.season_total);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> FilterSpec {
        FilterSpec::new(
            NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2012, 12, 31).unwrap(),
            Season::ALL,
            [Weather::CLEAR, Weather::MIST],
        )
    }

    #[test]
    fn test_empty_selection_keeps_base() {
        assert_eq!(Selection::default().apply_to(base()), base());
    }

    #[test]
    fn test_selection_narrows_filter() {
        let selection = Selection {
            start: NaiveDate::from_ymd_opt(2012, 1, 1),
            end: None,
            seasons: vec![2, 3],
            weathers: vec![1],
        };
        let filter = selection.apply_to(base());
        assert_eq!(filter.date_start, NaiveDate::from_ymd_opt(2012, 1, 1).unwrap());
        assert_eq!(filter.date_end, NaiveDate::from_ymd_opt(2012, 12, 31).unwrap());
        assert_eq!(
            filter.seasons.into_iter().collect::<Vec<_>>(),
            vec![Season::SUMMER, Season::FALL]
        );
        assert_eq!(filter.weathers.len(), 1);
    }

    #[test]
    fn test_bar_scales_to_max() {
        assert_eq!(bar(50.0, 100.0, 10).chars().count(), 5);
        assert_eq!(bar(100.0, 100.0, 10).chars().count(), 10);
        assert!(bar(1.0, 0.0, 10).is_empty());
    }
}
