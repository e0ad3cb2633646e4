// Player cohorts.
//
// Each cohort is a rule: an optional minutes-share gate, a predicate, a
// ranking and a fixed cap. Rules are rebuilt per call from the current
// gameweek and providers; they hold no state of their own.

use super::ranking::{Ranking, SortOrder};
use super::{ClassifyError, Classifier};
use crate::metrics::{calculate_ppm, momentum_or_zero};
use crate::model::{Player, PositionFilter};
use serde::Serialize;
use std::fmt;
use tracing::debug;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Minutes share for "regular starter" cohorts.
const REGULAR_MINUTES_PCT: f64 = 30.0;
/// Minutes share for the momentum cohorts (rising / sell).
const ROTATION_MINUTES_PCT: f64 = 15.0;
const TURNAROUND_MINUTES_PCT: f64 = 20.0;
const HIDDEN_GEM_MINUTES_PCT: f64 = 40.0;

const HIDDEN_GEM_MAX_OWNERSHIP: f64 = 10.0;
const SELL_MIN_OWNERSHIP: f64 = 1.0;

const IN_FORM: f64 = 3.0;
const TURNAROUND_MIN_FORM: f64 = 2.0;

/// Average FDR at or above which a run of fixtures counts as tough.
const TOUGH_FIXTURES: f64 = 3.8;
/// Average FDR at or below which a run of fixtures counts as kind.
const KIND_FIXTURES: f64 = 3.0;

const SELL_NET_TRANSFERS: f64 = -5000.0;

const XG_OVERPERFORM_MARGIN: f64 = 1.0;
const XG_UNDERPERFORM_MIN_XG: f64 = 2.0;
const XG_UNDERPERFORM_MARGIN: f64 = 1.5;

// ---------------------------------------------------------------------------
// Cohort kinds
// ---------------------------------------------------------------------------

/// Named player cohorts, in dashboard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CohortKind {
    TopPerformers,
    BestValue,
    FormStars,
    PenaltyTakers,
    DefensiveStandouts,
    XgOverperformers,
    XgUnderperformers,
    BonusMagnets,
    HiddenGems,
    RisingStars,
    SellCandidates,
    FixtureTurnarounds,
}

impl CohortKind {
    pub const ALL: [CohortKind; 12] = [
        CohortKind::TopPerformers,
        CohortKind::BestValue,
        CohortKind::FormStars,
        CohortKind::PenaltyTakers,
        CohortKind::DefensiveStandouts,
        CohortKind::XgOverperformers,
        CohortKind::XgUnderperformers,
        CohortKind::BonusMagnets,
        CohortKind::HiddenGems,
        CohortKind::RisingStars,
        CohortKind::SellCandidates,
        CohortKind::FixtureTurnarounds,
    ];

    /// Maximum number of players the cohort returns.
    pub fn cap(self) -> usize {
        match self {
            CohortKind::TopPerformers
            | CohortKind::RisingStars
            | CohortKind::SellCandidates
            | CohortKind::FixtureTurnarounds => 20,
            CohortKind::DefensiveStandouts => 10,
            CohortKind::BestValue
            | CohortKind::FormStars
            | CohortKind::PenaltyTakers
            | CohortKind::XgOverperformers
            | CohortKind::XgUnderperformers
            | CohortKind::BonusMagnets
            | CohortKind::HiddenGems => 15,
        }
    }

    /// Display title.
    pub fn title(self) -> &'static str {
        match self {
            CohortKind::TopPerformers => "Top Performers",
            CohortKind::BestValue => "Best Value",
            CohortKind::FormStars => "Form Stars",
            CohortKind::PenaltyTakers => "Penalty Takers",
            CohortKind::DefensiveStandouts => "Defensive Standouts",
            CohortKind::XgOverperformers => "xG Overperformers",
            CohortKind::XgUnderperformers => "xG Underperformers",
            CohortKind::BonusMagnets => "Bonus Magnets",
            CohortKind::HiddenGems => "Hidden Gems",
            CohortKind::RisingStars => "Rising Stars",
            CohortKind::SellCandidates => "Sell Candidates",
            CohortKind::FixtureTurnarounds => "Fixture Turnarounds",
        }
    }

    /// Kebab-case identifier, as used on the command line and in JSON.
    pub fn slug(self) -> &'static str {
        match self {
            CohortKind::TopPerformers => "top-performers",
            CohortKind::BestValue => "best-value",
            CohortKind::FormStars => "form-stars",
            CohortKind::PenaltyTakers => "penalty-takers",
            CohortKind::DefensiveStandouts => "defensive-standouts",
            CohortKind::XgOverperformers => "xg-overperformers",
            CohortKind::XgUnderperformers => "xg-underperformers",
            CohortKind::BonusMagnets => "bonus-magnets",
            CohortKind::HiddenGems => "hidden-gems",
            CohortKind::RisingStars => "rising-stars",
            CohortKind::SellCandidates => "sell-candidates",
            CohortKind::FixtureTurnarounds => "fixture-turnarounds",
        }
    }

    pub fn from_slug(s: &str) -> Result<Self, ClassifyError> {
        let wanted = s.trim().to_lowercase();
        CohortKind::ALL
            .into_iter()
            .find(|k| k.slug() == wanted)
            .ok_or_else(|| ClassifyError::UnknownCohort(s.to_string()))
    }
}

impl fmt::Display for CohortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

// ---------------------------------------------------------------------------
// Rules and results
// ---------------------------------------------------------------------------

/// One cohort definition, bound to a gameweek and providers.
pub struct CohortRule<'r> {
    pub kind: CohortKind,
    /// Strict lower bound on minutes share, if the cohort is gated.
    pub min_minutes_pct: Option<f64>,
    predicate: Box<dyn Fn(&Player) -> bool + 'r>,
    ranking: Ranking<'r, Player>,
}

impl<'r> CohortRule<'r> {
    fn new(
        kind: CohortKind,
        min_minutes_pct: Option<f64>,
        predicate: impl Fn(&Player) -> bool + 'r,
        ranking: Ranking<'r, Player>,
    ) -> Self {
        CohortRule {
            kind,
            min_minutes_pct,
            predicate: Box::new(predicate),
            ranking,
        }
    }

    /// Whether `player` passes the predicate (the minutes gate is checked separately).
    pub fn matches(&self, player: &Player) -> bool {
        (self.predicate)(player)
    }

    pub fn ranking(&self) -> &Ranking<'r, Player> {
        &self.ranking
    }
}

/// A ranked cohort.
#[derive(Debug, Clone, Serialize)]
pub struct Cohort<'p> {
    pub kind: CohortKind,
    pub players: Vec<&'p Player>,
}

/// Every player cohort for one position filter and gameweek.
#[derive(Debug, Clone, Serialize)]
pub struct CohortReport<'p> {
    pub position: String,
    pub current_gw: u32,
    pub cohorts: Vec<Cohort<'p>>,
}

impl<'p> CohortReport<'p> {
    /// Players in `kind`, empty if the cohort matched nobody.
    pub fn get(&self, kind: CohortKind) -> &[&'p Player] {
        self.cohorts
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.players.as_slice())
            .unwrap_or(&[])
    }

    /// True when no cohort has any player.
    pub fn is_empty(&self) -> bool {
        self.cohorts.iter().all(|c| c.players.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

impl<'a> Classifier<'a> {
    /// Build the rule for `kind` at `current_gw`.
    pub fn rule(&self, kind: CohortKind, current_gw: u32) -> CohortRule<'a> {
        let fixtures = self.fixtures;
        let gameweek = self.gameweek;
        let long = self.config.long_horizon;
        let short = self.config.short_horizon;
        let window = self.config.tie_window;

        let fdr_long = move |p: &Player| fixtures.fixture_difficulty(p.team, long);
        let fdr_short = move |p: &Player| fixtures.fixture_difficulty(p.team, short);
        let mins = move |p: &Player| gameweek.minutes_percentage(p, current_gw);
        let points = |p: &Player| f64::from(p.total_points);
        let form = |p: &Player| p.form;

        match kind {
            CohortKind::TopPerformers => {
                CohortRule::new(kind, None, |_| true, Ranking::descending(points))
            }
            CohortKind::BestValue => CohortRule::new(
                kind,
                Some(REGULAR_MINUTES_PCT),
                |_| true,
                Ranking::descending(calculate_ppm),
            ),
            CohortKind::FormStars => CohortRule::new(
                kind,
                Some(REGULAR_MINUTES_PCT),
                |_| true,
                Ranking::descending(form),
            ),
            CohortKind::PenaltyTakers => CohortRule::new(
                kind,
                None,
                |p| p.position.is_outfield() && p.is_first_penalty_taker(),
                Ranking::ascending(fdr_long),
            ),
            CohortKind::DefensiveStandouts => CohortRule::new(
                kind,
                None,
                |p| p.position.is_outfield() && p.defensive_contribution_per_90().is_some(),
                Ranking::descending(|p: &Player| p.defensive_contribution_per_90().unwrap_or(0.0)),
            ),
            CohortKind::XgOverperformers => CohortRule::new(
                kind,
                Some(REGULAR_MINUTES_PCT),
                |p| f64::from(p.goals_scored) > p.expected_goals + XG_OVERPERFORM_MARGIN,
                Ranking::descending(|p: &Player| p.xg_delta()),
            ),
            CohortKind::XgUnderperformers => CohortRule::new(
                kind,
                Some(REGULAR_MINUTES_PCT),
                |p| {
                    p.expected_goals > XG_UNDERPERFORM_MIN_XG
                        && -p.xg_delta() > XG_UNDERPERFORM_MARGIN
                },
                Ranking::descending(|p: &Player| -p.xg_delta()),
            ),
            CohortKind::BonusMagnets => CohortRule::new(
                kind,
                Some(REGULAR_MINUTES_PCT),
                |p| p.bonus > 0,
                Ranking::descending(|p: &Player| f64::from(p.bonus)),
            ),
            CohortKind::HiddenGems => CohortRule::new(
                kind,
                Some(REGULAR_MINUTES_PCT),
                move |p| {
                    p.ownership() > 0.0
                        && p.ownership() < HIDDEN_GEM_MAX_OWNERSHIP
                        && p.form > IN_FORM
                        && mins(p) > HIDDEN_GEM_MINUTES_PCT
                },
                Ranking::descending(points),
            ),
            CohortKind::RisingStars => CohortRule::new(
                kind,
                Some(ROTATION_MINUTES_PCT),
                move |p| p.form > IN_FORM && fdr_long(p) <= TOUGH_FIXTURES,
                Ranking::descending(form).then_within(
                    window,
                    momentum_or_zero,
                    SortOrder::Descending,
                ),
            ),
            CohortKind::SellCandidates => CohortRule::new(
                kind,
                Some(ROTATION_MINUTES_PCT),
                move |p| {
                    let out_of_form = p.form < IN_FORM;
                    p.ownership() >= SELL_MIN_OWNERSHIP
                        && (out_of_form || fdr_long(p) >= TOUGH_FIXTURES)
                        && (momentum_or_zero(p) < SELL_NET_TRANSFERS || out_of_form)
                },
                Ranking::ascending(form).then_within(
                    window,
                    momentum_or_zero,
                    SortOrder::Ascending,
                ),
            ),
            CohortKind::FixtureTurnarounds => CohortRule::new(
                kind,
                Some(TURNAROUND_MINUTES_PCT),
                move |p| fdr_short(p) <= KIND_FIXTURES && p.form > TURNAROUND_MIN_FORM,
                Ranking::ascending(fdr_long),
            ),
        }
    }

    /// Rank every player cohort for `position` at `current_gw`.
    pub fn classify_players<'p>(
        &self,
        players: &'p [Player],
        current_gw: u32,
        position: PositionFilter,
    ) -> CohortReport<'p> {
        let pool: Vec<&'p Player> = players
            .iter()
            .filter(|p| position.matches(p.position))
            .collect();

        let cohorts = CohortKind::ALL
            .into_iter()
            .map(|kind| Cohort {
                kind,
                players: self.evaluate(&self.rule(kind, current_gw), &pool, current_gw),
            })
            .collect();

        CohortReport {
            position: position.label().to_string(),
            current_gw,
            cohorts,
        }
    }

    /// Rank a single cohort.
    pub fn classify_cohort<'p>(
        &self,
        players: &'p [Player],
        current_gw: u32,
        position: PositionFilter,
        kind: CohortKind,
    ) -> Vec<&'p Player> {
        let pool: Vec<&'p Player> = players
            .iter()
            .filter(|p| position.matches(p.position))
            .collect();
        self.evaluate(&self.rule(kind, current_gw), &pool, current_gw)
    }

    fn evaluate<'p>(
        &self,
        rule: &CohortRule<'_>,
        pool: &[&'p Player],
        current_gw: u32,
    ) -> Vec<&'p Player> {
        let eligible: Vec<&'p Player> = pool
            .iter()
            .copied()
            .filter(|p| {
                rule.min_minutes_pct
                    .map_or(true, |min| self.gameweek.minutes_percentage(p, current_gw) > min)
            })
            .filter(|p| rule.matches(p))
            .collect();
        let eligible_count = eligible.len();

        let ranked = rule.ranking.top(eligible, rule.kind.cap());
        debug!(
            cohort = rule.kind.slug(),
            eligible = eligible_count,
            kept = ranked.len(),
            "cohort ranked"
        );
        ranked
    }
}
