// Data providers the classifier reads from but does not own.

pub mod fixtures;
pub mod gameweek;

pub use fixtures::{FixtureCalendar, FixtureService, NEUTRAL_DIFFICULTY};
pub use gameweek::{minutes_percentage, GameweekContext, SeasonClock};
