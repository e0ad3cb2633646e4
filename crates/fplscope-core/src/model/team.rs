// Teams, fixtures and gameweek events from the bootstrap payload.

use crate::numeric::deserialize_count_or_zero;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A club with its strength ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub strength_attack_home: u32,
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub strength_attack_away: u32,
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub strength_defence_home: u32,
    #[serde(default, deserialize_with = "deserialize_count_or_zero")]
    pub strength_defence_away: u32,
}

impl Team {
    /// Combined home + away attack rating.
    pub fn attack_strength(&self) -> u32 {
        self.strength_attack_home + self.strength_attack_away
    }

    /// Combined home + away defence rating.
    pub fn defence_strength(&self) -> u32 {
        self.strength_defence_home + self.strength_defence_away
    }
}

/// A single scheduled or played match. `event` is `None` for fixtures that
/// have not been assigned a gameweek yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub event: Option<u32>,
    pub team_h: u32,
    pub team_a: u32,
    pub team_h_difficulty: u8,
    pub team_a_difficulty: u8,
    #[serde(default)]
    pub finished: bool,
}

impl Fixture {
    pub fn involves(&self, team_id: u32) -> bool {
        self.team_h == team_id || self.team_a == team_id
    }

    /// Difficulty rating from `team_id`'s side of the fixture.
    pub fn difficulty_for(&self, team_id: u32) -> Option<u8> {
        if self.team_h == team_id {
            Some(self.team_h_difficulty)
        } else if self.team_a == team_id {
            Some(self.team_a_difficulty)
        } else {
            None
        }
    }
}

/// A gameweek from the bootstrap `events` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameweekEvent {
    pub id: u32,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub is_next: bool,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub deadline_time: Option<DateTime<Utc>>,
}
