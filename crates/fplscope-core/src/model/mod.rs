// Read-only views over the bootstrap snapshot.

pub mod player;
pub mod team;

pub use player::{AdvancedStats, Player, Position, PositionFilter, TransferStats, ALL_POSITIONS};
pub use team::{Fixture, GameweekEvent, Team};
