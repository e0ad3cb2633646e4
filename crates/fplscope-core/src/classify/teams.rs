// Team cohorts: fixture runs and strength ratings.

use super::ranking::Ranking;
use super::Classifier;
use crate::model::Team;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Maximum number of teams in each team cohort.
pub const TEAM_COHORT_CAP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TeamCohortKind {
    BestFixtures,
    WorstFixtures,
    BestAttack,
    BestDefence,
}

impl TeamCohortKind {
    pub const ALL: [TeamCohortKind; 4] = [
        TeamCohortKind::BestFixtures,
        TeamCohortKind::WorstFixtures,
        TeamCohortKind::BestAttack,
        TeamCohortKind::BestDefence,
    ];

    pub fn title(self) -> &'static str {
        match self {
            TeamCohortKind::BestFixtures => "Best Fixtures",
            TeamCohortKind::WorstFixtures => "Worst Fixtures",
            TeamCohortKind::BestAttack => "Best Attack",
            TeamCohortKind::BestDefence => "Best Defence",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            TeamCohortKind::BestFixtures => "best-fixtures",
            TeamCohortKind::WorstFixtures => "worst-fixtures",
            TeamCohortKind::BestAttack => "best-attack",
            TeamCohortKind::BestDefence => "best-defence",
        }
    }
}

impl fmt::Display for TeamCohortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Ranked team cohorts, each capped at [`TEAM_COHORT_CAP`].
#[derive(Debug, Clone, Serialize)]
pub struct TeamReport<'t> {
    pub best_fixtures: Vec<&'t Team>,
    pub worst_fixtures: Vec<&'t Team>,
    pub best_attack: Vec<&'t Team>,
    pub best_defence: Vec<&'t Team>,
}

impl<'t> TeamReport<'t> {
    pub fn get(&self, kind: TeamCohortKind) -> &[&'t Team] {
        match kind {
            TeamCohortKind::BestFixtures => &self.best_fixtures,
            TeamCohortKind::WorstFixtures => &self.worst_fixtures,
            TeamCohortKind::BestAttack => &self.best_attack,
            TeamCohortKind::BestDefence => &self.best_defence,
        }
    }
}

impl Classifier<'_> {
    /// Average difficulty of `team_id`'s fixtures over the long horizon.
    pub fn team_difficulty(&self, team_id: u32) -> f64 {
        self.fixtures
            .fixture_difficulty(team_id, self.config.long_horizon)
    }

    /// Rank teams by fixture run and by strength. Sorts are stable, so tied
    /// teams keep their input order in every cohort.
    pub fn classify_teams<'t>(&self, teams: &'t [Team]) -> TeamReport<'t> {
        let fdr = |t: &Team| self.team_difficulty(t.id);
        let all = || teams.iter().collect::<Vec<_>>();

        let report = TeamReport {
            best_fixtures: Ranking::ascending(fdr).top(all(), TEAM_COHORT_CAP),
            worst_fixtures: Ranking::descending(fdr).top(all(), TEAM_COHORT_CAP),
            best_attack: Ranking::descending(|t: &Team| f64::from(t.attack_strength()))
                .top(all(), TEAM_COHORT_CAP),
            best_defence: Ranking::descending(|t: &Team| f64::from(t.defence_strength()))
                .top(all(), TEAM_COHORT_CAP),
        };
        debug!(teams = teams.len(), "team cohorts ranked");
        report
    }
}
