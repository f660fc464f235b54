//! Canonical row shapes and the normalizer that derives them from raw tables.

mod columns;
mod normalize;
mod rows;
mod types;

pub use columns::ColumnMapping;
pub use normalize::Normalizer;
pub use rows::{BikeTables, DailyRow, HourlyRecord, HourlyRow, Record};
pub use types::{Season, WEEKDAY_ORDER, Weather, weekday_name};

pub(crate) use types::serialize_weekday;
