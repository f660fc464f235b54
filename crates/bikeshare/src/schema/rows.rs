//! Derived daily and hourly rows.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};

use super::types::{Season, Weather, weekday_name};
use crate::input::SourceMetadata;

/// Fields shared by daily and hourly rows.
///
/// Filtering and the date/category aggregations only need these, so they are
/// written once against this trait.
pub trait Record {
    fn date(&self) -> NaiveDate;
    fn season(&self) -> Season;
    fn weather(&self) -> Weather;
    fn count(&self) -> u32;

    fn weekday(&self) -> Weekday {
        self.date().weekday()
    }
}

/// A record that also carries an hour of day.
pub trait HourlyRecord: Record {
    fn hour(&self) -> u8;
}

/// One row per calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub season: Season,
    pub weather: Weather,
    pub count: u32,
    pub weekday: Weekday,
    /// Demand-level label carried through from the source; not used in any view.
    pub level: Option<String>,
}

impl DailyRow {
    pub fn new(date: NaiveDate, season: Season, weather: Weather, count: u32) -> Self {
        Self {
            date,
            season,
            weather,
            count,
            weekday: date.weekday(),
            level: None,
        }
    }

    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

impl Record for DailyRow {
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn season(&self) -> Season {
        self.season
    }
    fn weather(&self) -> Weather {
        self.weather
    }
    fn count(&self) -> u32 {
        self.count
    }
    fn weekday(&self) -> Weekday {
        self.weekday
    }
}

/// One row per date and hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRow {
    pub date: NaiveDate,
    pub season: Season,
    pub hour: u8,
    pub weather: Weather,
    pub count: u32,
    pub weekday: Weekday,
    /// Demand-level label carried through from the source; not used in any view.
    pub level: Option<String>,
}

impl HourlyRow {
    pub fn new(date: NaiveDate, season: Season, hour: u8, weather: Weather, count: u32) -> Self {
        Self {
            date,
            season,
            hour,
            weather,
            count,
            weekday: date.weekday(),
            level: None,
        }
    }

    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

impl Record for HourlyRow {
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn season(&self) -> Season {
        self.season
    }
    fn weather(&self) -> Weather {
        self.weather
    }
    fn count(&self) -> u32 {
        self.count
    }
    fn weekday(&self) -> Weekday {
        self.weekday
    }
}

impl HourlyRecord for HourlyRow {
    fn hour(&self) -> u8 {
        self.hour
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }
    fn season(&self) -> Season {
        (**self).season()
    }
    fn weather(&self) -> Weather {
        (**self).weather()
    }
    fn count(&self) -> u32 {
        (**self).count()
    }
    fn weekday(&self) -> Weekday {
        (**self).weekday()
    }
}

impl<R: HourlyRecord + ?Sized> HourlyRecord for &R {
    fn hour(&self) -> u8 {
        (**self).hour()
    }
}

/// The normalized daily and hourly tables.
///
/// The two collections are never joined downstream; each is filtered and
/// aggregated on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BikeTables {
    pub daily: Vec<DailyRow>,
    pub hourly: Vec<HourlyRow>,
    /// The parsed sources the rows were derived from, in load order.
    pub sources: Vec<SourceMetadata>,
}

impl BikeTables {
    pub fn new(daily: Vec<DailyRow>, hourly: Vec<HourlyRow>) -> Self {
        Self {
            daily,
            hourly,
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<SourceMetadata>) -> Self {
        self.sources = sources;
        self
    }

    /// Earliest and latest date in the daily table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.daily.iter().map(|r| r.date).min()?;
        let max = self.daily.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Distinct weather codes present in the daily table, ascending.
    pub fn weather_codes(&self) -> Vec<Weather> {
        self.daily
            .iter()
            .map(|r| r.weather)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_derived_from_date() {
        let row = DailyRow::new(date(2011, 1, 3), Season::SPRING, Weather::CLEAR, 100);
        assert_eq!(row.weekday, Weekday::Mon);
        assert_eq!(row.weekday_name(), "Monday");

        let hourly = HourlyRow::new(date(2011, 1, 1), Season::SPRING, 0, Weather::CLEAR, 16);
        assert_eq!(hourly.weekday_name(), "Saturday");
    }

    #[test]
    fn test_bounds_and_weather_codes() {
        let tables = BikeTables::new(
            vec![
                DailyRow::new(date(2011, 3, 1), Season::SPRING, Weather::MIST, 10),
                DailyRow::new(date(2011, 1, 1), Season::SPRING, Weather::CLEAR, 10),
                DailyRow::new(date(2011, 2, 1), Season::SPRING, Weather::MIST, 10),
            ],
            Vec::new(),
        );
        assert_eq!(tables.date_bounds(), Some((date(2011, 1, 1), date(2011, 3, 1))));
        assert_eq!(tables.weather_codes(), vec![Weather::CLEAR, Weather::MIST]);
    }

    #[test]
    fn test_empty_tables_have_no_bounds() {
        assert_eq!(BikeTables::default().date_bounds(), None);
    }
}
