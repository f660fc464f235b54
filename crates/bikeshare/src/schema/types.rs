//! Categorical codes and weekday naming.

use std::borrow::Cow;
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize, Serializer};

/// Season code. Known codes are 1..=4; any other code is carried as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Season(pub u8);

impl Season {
    pub const SPRING: Season = Season(1);
    pub const SUMMER: Season = Season(2);
    pub const FALL: Season = Season(3);
    pub const WINTER: Season = Season(4);

    /// Every season with a display label, in code order.
    pub const ALL: [Season; 4] = [Self::SPRING, Self::SUMMER, Self::FALL, Self::WINTER];

    /// Raw code.
    pub fn code(self) -> u8 {
        self.0
    }

    /// Display label, falling back to the raw code for unknown seasons.
    pub fn label(self) -> Cow<'static, str> {
        match self.0 {
            1 => Cow::Borrowed("Spring"),
            2 => Cow::Borrowed("Summer"),
            3 => Cow::Borrowed("Fall"),
            4 => Cow::Borrowed("Winter"),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Weather situation code. Known codes are 1..=4; any other code is carried as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weather(pub u8);

impl Weather {
    pub const CLEAR: Weather = Weather(1);
    pub const MIST: Weather = Weather(2);
    pub const LIGHT_PRECIPITATION: Weather = Weather(3);
    pub const HEAVY_PRECIPITATION: Weather = Weather(4);

    /// Every weather situation with a display label, in code order.
    pub const ALL: [Weather; 4] = [
        Self::CLEAR,
        Self::MIST,
        Self::LIGHT_PRECIPITATION,
        Self::HEAVY_PRECIPITATION,
    ];

    /// Raw code.
    pub fn code(self) -> u8 {
        self.0
    }

    /// Display label, falling back to the raw code for unknown situations.
    pub fn label(self) -> Cow<'static, str> {
        match self.0 {
            1 => Cow::Borrowed("Clear/Partly Cloudy"),
            2 => Cow::Borrowed("Mist/Cloudy"),
            3 => Cow::Borrowed("Light Rain/Snow"),
            4 => Cow::Borrowed("Heavy Rain/Snow"),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Calendar order used by every weekday-keyed view.
pub const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English weekday name, independent of locale.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Serialize a weekday by its full name.
pub(crate) fn serialize_weekday<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*day))
}
