// Interactive differentials filter.
//
// Unlike the fixed cohorts, this one is driven by caller-owned parameters
// (ownership threshold, price band, fixture and momentum toggles). The
// parameters are an immutable value passed in on every call.

use super::ranking::Ranking;
use super::{ClassifyError, Classifier};
use crate::metrics::transfer_momentum;
use crate::model::{Player, Position, PositionFilter};
use std::fmt;
use tracing::debug;

/// Maximum number of differentials returned.
pub const DIFFERENTIALS_CAP: usize = 20;

/// Bounds for the ownership slider, in whole percent.
pub const MIN_OWNERSHIP_THRESHOLD: u8 = 1;
pub const MAX_OWNERSHIP_THRESHOLD: u8 = 10;

/// FDR ceiling for the "good fixtures only" toggle.
pub const GOOD_FIXTURES_MAX_DIFFICULTY: f64 = 3.0;

// ---------------------------------------------------------------------------
// Price bands
// ---------------------------------------------------------------------------

/// Price band, evaluated on `now_cost` (tenths of a million).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PriceRange {
    #[default]
    All,
    /// Under 6.0m.
    Budget,
    /// 6.0m up to (not including) 9.0m.
    Mid,
    /// 9.0m and above.
    Premium,
}

impl PriceRange {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(PriceRange::All),
            "budget" => Some(PriceRange::Budget),
            "mid" => Some(PriceRange::Mid),
            "premium" => Some(PriceRange::Premium),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceRange::All => "all",
            PriceRange::Budget => "budget",
            PriceRange::Mid => "mid",
            PriceRange::Premium => "premium",
        }
    }

    pub fn contains(self, now_cost: u32) -> bool {
        match self {
            PriceRange::All => true,
            PriceRange::Budget => now_cost < 60,
            PriceRange::Mid => (60..90).contains(&now_cost),
            PriceRange::Premium => now_cost >= 90,
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// User-adjustable differentials settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DifferentialParams {
    ownership_threshold: u8,
    price_range: PriceRange,
    good_fixtures_only: bool,
    positive_momentum_only: bool,
}

impl DifferentialParams {
    /// Params with the given ownership threshold (1-10) and every other
    /// filter off.
    pub fn new(ownership_threshold: u8) -> Result<Self, ClassifyError> {
        if !(MIN_OWNERSHIP_THRESHOLD..=MAX_OWNERSHIP_THRESHOLD).contains(&ownership_threshold) {
            return Err(ClassifyError::OwnershipThreshold(ownership_threshold));
        }
        Ok(DifferentialParams {
            ownership_threshold,
            price_range: PriceRange::All,
            good_fixtures_only: false,
            positive_momentum_only: false,
        })
    }

    /// Same filters, different ownership threshold.
    pub fn with_ownership_threshold(self, ownership_threshold: u8) -> Result<Self, ClassifyError> {
        let checked = Self::new(ownership_threshold)?;
        Ok(DifferentialParams {
            ownership_threshold: checked.ownership_threshold,
            ..self
        })
    }

    pub fn with_price_range(self, price_range: PriceRange) -> Self {
        DifferentialParams {
            price_range,
            ..self
        }
    }

    pub fn with_good_fixtures_only(self, good_fixtures_only: bool) -> Self {
        DifferentialParams {
            good_fixtures_only,
            ..self
        }
    }

    pub fn with_positive_momentum_only(self, positive_momentum_only: bool) -> Self {
        DifferentialParams {
            positive_momentum_only,
            ..self
        }
    }

    pub fn ownership_threshold(&self) -> u8 {
        self.ownership_threshold
    }

    pub fn price_range(&self) -> PriceRange {
        self.price_range
    }

    pub fn good_fixtures_only(&self) -> bool {
        self.good_fixtures_only
    }

    pub fn positive_momentum_only(&self) -> bool {
        self.positive_momentum_only
    }
}

impl Default for DifferentialParams {
    fn default() -> Self {
        DifferentialParams {
            ownership_threshold: 5,
            price_range: PriceRange::All,
            good_fixtures_only: false,
            positive_momentum_only: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

impl Classifier<'_> {
    /// Low-owned players passing the caller's filters and a per-position
    /// playing-time gate, best total points first.
    pub fn filter_differentials<'p>(
        &self,
        players: &'p [Player],
        current_gw: u32,
        params: &DifferentialParams,
        position: PositionFilter,
    ) -> Vec<&'p Player> {
        let threshold = f64::from(params.ownership_threshold);

        let eligible: Vec<&Player> = players
            .iter()
            .filter(|p| position.matches(p.position))
            .filter(|p| p.ownership() < threshold)
            .filter(|p| params.price_range.contains(p.now_cost))
            .filter(|p| {
                !params.good_fixtures_only
                    || self.fixtures.fixture_difficulty(p.team, self.config.long_horizon)
                        <= GOOD_FIXTURES_MAX_DIFFICULTY
            })
            .filter(|p| {
                // players with no transfer data are not filtered out
                !params.positive_momentum_only || transfer_momentum(p).map_or(true, |net| net > 0)
            })
            .filter(|p| self.passes_position_gate(p, current_gw))
            .collect();

        let ranked = Ranking::descending(|p: &Player| f64::from(p.total_points))
            .top(eligible, DIFFERENTIALS_CAP);
        debug!(
            threshold = params.ownership_threshold,
            price = %params.price_range,
            position = %position,
            matched = ranked.len(),
            "differentials filtered"
        );
        ranked
    }

    fn passes_position_gate(&self, player: &Player, current_gw: u32) -> bool {
        let mins = self.gameweek.minutes_percentage(player, current_gw);
        match player.position {
            Position::Goalkeeper => mins > 50.0 || player.saves > 20,
            Position::Defender => {
                mins > 40.0 || player.defensive_contribution_per_90().unwrap_or(0.0) > 3.0
            }
            Position::Midfielder | Position::Forward => mins > 30.0 && player.form > 3.0,
        }
    }
}
