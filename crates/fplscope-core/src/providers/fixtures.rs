// Fixture difficulty over an upcoming horizon.

use crate::model::Fixture;

/// Difficulty rating returned when a team has no upcoming fixtures to average.
pub const NEUTRAL_DIFFICULTY: f64 = 3.0;

/// Source of per-team fixture difficulty.
pub trait FixtureService {
    /// Mean difficulty (1 = easiest, 5 = hardest) of `team_id`'s next
    /// `horizon` fixtures.
    fn fixture_difficulty(&self, team_id: u32, horizon: usize) -> f64;
}

/// Fixture difficulty computed from the season fixture list.
#[derive(Debug, Clone)]
pub struct FixtureCalendar {
    fixtures: Vec<Fixture>,
    current_gw: u32,
}

impl FixtureCalendar {
    /// Build a calendar. Fixtures are ordered by gameweek once here so each
    /// lookup is a forward scan.
    pub fn new(mut fixtures: Vec<Fixture>, current_gw: u32) -> Self {
        fixtures.sort_by_key(|f| (f.event.unwrap_or(u32::MAX), f.id));
        FixtureCalendar {
            fixtures,
            current_gw,
        }
    }

    pub fn current_gw(&self) -> u32 {
        self.current_gw
    }

    /// Upcoming fixtures for a team: unfinished, scheduled after the current
    /// gameweek, earliest first.
    pub fn upcoming(&self, team_id: u32) -> impl Iterator<Item = &Fixture> + '_ {
        let current_gw = self.current_gw;
        self.fixtures.iter().filter(move |f| {
            !f.finished && f.involves(team_id) && f.event.is_some_and(|gw| gw > current_gw)
        })
    }
}

impl FixtureService for FixtureCalendar {
    fn fixture_difficulty(&self, team_id: u32, horizon: usize) -> f64 {
        let ratings: Vec<f64> = self
            .upcoming(team_id)
            .filter_map(|f| f.difficulty_for(team_id))
            .take(horizon)
            .map(f64::from)
            .collect();

        if ratings.is_empty() {
            return NEUTRAL_DIFFICULTY;
        }
        ratings.iter().sum::<f64>() / ratings.len() as f64
    }
}
