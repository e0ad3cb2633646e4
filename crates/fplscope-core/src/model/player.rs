// Player records from the bootstrap `elements` array, plus the position
// lookup shared by every cohort rule.

use crate::numeric::{
    deserialize_count_or_zero, deserialize_numeric_or_zero, deserialize_optional_count,
    deserialize_optional_numeric,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Squad positions. The discriminant is the bootstrap `element_type` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Position {
    Goalkeeper = 1,
    Defender = 2,
    Midfielder = 3,
    Forward = 4,
}

/// All positions in `element_type` order.
pub const ALL_POSITIONS: [Position; 4] = [
    Position::Goalkeeper,
    Position::Defender,
    Position::Midfielder,
    Position::Forward,
];

impl Position {
    /// Map an `element_type` code (1-4) to a position.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Position::Goalkeeper),
            2 => Some(Position::Defender),
            3 => Some(Position::Midfielder),
            4 => Some(Position::Forward),
            _ => None,
        }
    }

    /// The `element_type` code for this position.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Parse a short label. Case-insensitive; accepts the "GK" alias.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GKP" | "GK" => Some(Position::Goalkeeper),
            "DEF" => Some(Position::Defender),
            "MID" => Some(Position::Midfielder),
            "FWD" => Some(Position::Forward),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }

    /// Whether this is an outfield position.
    pub fn is_outfield(self) -> bool {
        !matches!(self, Position::Goalkeeper)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<u8> for Position {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Position::from_code(code).ok_or_else(|| format!("unknown element_type {code}"))
    }
}

impl From<Position> for u8 {
    fn from(pos: Position) -> u8 {
        pos.code()
    }
}

/// Position restriction applied before any cohort rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PositionFilter {
    #[default]
    All,
    Only(Position),
}

impl PositionFilter {
    /// Parse `"all"`, `"GKP"`, `"DEF"`, `"MID"` or `"FWD"`.
    pub fn parse(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Some(PositionFilter::All);
        }
        Position::from_label(s).map(PositionFilter::Only)
    }

    pub fn matches(self, position: Position) -> bool {
        match self {
            PositionFilter::All => true,
            PositionFilter::Only(p) => p == position,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PositionFilter::All => "all",
            PositionFilter::Only(p) => p.label(),
        }
    }
}

impl fmt::Display for PositionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Nested optional stat blocks
// ---------------------------------------------------------------------------

/// Season-level advanced stats merged in from the external stats feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvancedStats {
    #[serde(default, deserialize_with = "deserialize_optional_numeric")]
    pub defensive_contribution_per_90: Option<f64>,
    /// Remaining per-90 columns, carried through untouched.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Season transfer totals merged in from the external stats feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStats {
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub transfers_in: i64,
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub transfers_out: i64,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One bootstrap player. Decimal and integer stat fields have already been
/// through the lenient numeric adapters, so only `id`, `team` and
/// `element_type` can reject a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    #[serde(default)]
    pub web_name: String,
    pub team: u32,
    #[serde(rename = "element_type")]
    pub position: Position,
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub total_points: i32,
    #[serde(default, deserialize_with = "deserialize_numeric_or_zero")]
    pub form: f64,
    #[serde(default, deserialize_with = "deserialize_numeric_or_zero")]
    pub selected_by_percent: f64,
    /// Price in tenths of a million.
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub now_cost: u32,
    #[serde(default, deserialize_with = "deserialize_numeric_or_zero")]
    pub expected_goals: f64,
    #[serde(default, deserialize_with = "deserialize_numeric_or_zero")]
    pub expected_goal_involvements: f64,
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub goals_scored: u32,
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub assists: u32,
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub bonus: u32,
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub penalties_order: Option<u8>,
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub minutes: u32,
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub saves: u32,
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub clean_sheets: u32,
    #[serde(default, deserialize_with = "deserialize_numeric_or_zero")]
    pub expected_goals_conceded_per_90: f64,
    #[serde(default)]
    pub news: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub chance_of_playing_next_round: Option<u8>,
    #[serde(default)]
    pub github_season: Option<AdvancedStats>,
    #[serde(default)]
    pub github_transfers: Option<TransferStats>,
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub transfers_in_event: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub transfers_out_event: Option<i64>,
}

impl Player {
    /// A bare player with every stat zeroed and no optional data.
    pub fn new(id: u32, team: u32, position: Position) -> Self {
        Player {
            id,
            web_name: String::new(),
            team,
            position,
            total_points: 0,
            form: 0.0,
            selected_by_percent: 0.0,
            now_cost: 0,
            expected_goals: 0.0,
            expected_goal_involvements: 0.0,
            goals_scored: 0,
            assists: 0,
            bonus: 0,
            penalties_order: None,
            minutes: 0,
            saves: 0,
            clean_sheets: 0,
            expected_goals_conceded_per_90: 0.0,
            news: None,
            chance_of_playing_next_round: None,
            github_season: None,
            github_transfers: None,
            transfers_in_event: None,
            transfers_out_event: None,
        }
    }

    /// Price in millions.
    pub fn price(&self) -> f64 {
        f64::from(self.now_cost) / 10.0
    }

    /// Ownership percentage.
    pub fn ownership(&self) -> f64 {
        self.selected_by_percent
    }

    /// `goals_scored - expected_goals`; positive means finishing above xG.
    pub fn xg_delta(&self) -> f64 {
        f64::from(self.goals_scored) - self.expected_goals
    }

    /// Per-90 defensive contribution, if the advanced stats feed has it.
    pub fn defensive_contribution_per_90(&self) -> Option<f64> {
        self.github_season
            .as_ref()
            .and_then(|s| s.defensive_contribution_per_90)
    }

    /// Whether this player is first choice on penalties.
    pub fn is_first_penalty_taker(&self) -> bool {
        self.penalties_order == Some(1)
    }
}
