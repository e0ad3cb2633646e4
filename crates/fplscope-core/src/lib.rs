// Library root: cohort classification over a fantasy football snapshot.
// Re-exports the main entry points so the CLI and integration tests can
// reach them without spelling out module paths.

pub mod classify;
pub mod config;
pub mod metrics;
pub mod model;
pub mod numeric;
pub mod providers;
pub mod snapshot;

pub use classify::{
    Classifier, ClassifyError, Cohort, CohortKind, CohortReport, DifferentialParams, PriceRange,
    TeamCohortKind, TeamReport,
};
pub use config::{ClassifierConfig, Config, ConfigError};
pub use metrics::{calculate_ppm, has_positive_momentum, transfer_momentum};
pub use model::{Player, Position, PositionFilter, Team};
pub use numeric::parse_numeric_or_zero;
pub use providers::{FixtureCalendar, FixtureService, GameweekContext, SeasonClock};
pub use snapshot::{Snapshot, SnapshotError};
