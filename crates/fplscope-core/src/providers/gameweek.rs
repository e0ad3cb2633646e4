// Current gameweek resolution and minutes share.

use crate::model::{GameweekEvent, Player};
use chrono::{DateTime, Utc};

/// Minutes available per match.
pub const MINUTES_PER_MATCH: f64 = 90.0;

/// Source of the current gameweek and playing-time share.
pub trait GameweekContext {
    fn current_gw(&self) -> u32;

    /// Share of available minutes played through `gw`, as a percentage in
    /// `0.0..=100.0`.
    fn minutes_percentage(&self, player: &Player, gw: u32) -> f64 {
        minutes_percentage(player, gw)
    }
}

/// `minutes / (gw * 90) * 100`, capped at 100. Zero before gameweek 1.
pub fn minutes_percentage(player: &Player, gw: u32) -> f64 {
    if gw == 0 {
        return 0.0;
    }
    let available = f64::from(gw) * MINUTES_PER_MATCH;
    (f64::from(player.minutes) / available * 100.0).min(100.0)
}

/// Gameweek context derived from the bootstrap `events` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonClock {
    current_gw: u32,
}

impl SeasonClock {
    /// A clock pinned to a given gameweek.
    pub fn fixed(current_gw: u32) -> Self {
        SeasonClock { current_gw }
    }

    /// Resolve the current gameweek from the events list, using the wall clock
    /// only as a last resort.
    pub fn from_events(events: &[GameweekEvent]) -> Self {
        Self::from_events_at(events, Utc::now())
    }

    /// Resolve the current gameweek, in order of preference:
    /// 1. the event flagged `is_current`;
    /// 2. the event flagged `is_next`, minus one;
    /// 3. the latest event whose deadline is at or before `now`;
    /// 4. gameweek 1.
    pub fn from_events_at(events: &[GameweekEvent], now: DateTime<Utc>) -> Self {
        if let Some(ev) = events.iter().find(|e| e.is_current) {
            return Self::fixed(ev.id);
        }
        if let Some(ev) = events.iter().find(|e| e.is_next) {
            return Self::fixed(ev.id.saturating_sub(1).max(1));
        }
        let passed = events
            .iter()
            .filter(|e| e.deadline_time.is_some_and(|d| d <= now))
            .map(|e| e.id)
            .max();
        Self::fixed(passed.unwrap_or(1))
    }
}

impl GameweekContext for SeasonClock {
    fn current_gw(&self) -> u32 {
        self.current_gw
    }
}
