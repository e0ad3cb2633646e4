// Cohort classification: named, ranked player and team subsets.

pub mod cohort;
pub mod differentials;
pub mod ranking;
pub mod teams;

pub use cohort::{Cohort, CohortKind, CohortReport, CohortRule};
pub use differentials::{DifferentialParams, PriceRange, DIFFERENTIALS_CAP};
pub use ranking::{Ranking, SortOrder};
pub use teams::{TeamCohortKind, TeamReport, TEAM_COHORT_CAP};

use crate::config::ClassifierConfig;
use crate::providers::{FixtureService, GameweekContext};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("ownership threshold must be between 1 and 10, got {0}")]
    OwnershipThreshold(u8),

    #[error("unknown cohort `{0}`")]
    UnknownCohort(String),
}

/// Stateless view over the fixture and gameweek providers. Every call
/// recomputes from its inputs; nothing is cached between calls.
pub struct Classifier<'a> {
    fixtures: &'a dyn FixtureService,
    gameweek: &'a dyn GameweekContext,
    config: ClassifierConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(
        fixtures: &'a dyn FixtureService,
        gameweek: &'a dyn GameweekContext,
        config: ClassifierConfig,
    ) -> Self {
        Classifier {
            fixtures,
            gameweek,
            config,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}
