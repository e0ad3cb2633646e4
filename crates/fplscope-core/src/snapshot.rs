// Bootstrap and fixture snapshot loading.
//
// Reads the bootstrap payload (`elements`, `teams`, `events`) and the season
// fixture list. Rows that fail to deserialize are skipped with a warning so a
// single bad element never hides the rest of the game.

use crate::model::{Fixture, GameweekEvent, Player, Team};
use crate::providers::{FixtureCalendar, SeasonClock};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} has no `{key}` array")]
    MissingKey { path: String, key: &'static str },
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One consistent view of players, teams, gameweeks and fixtures.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub teams: Vec<Team>,
    pub events: Vec<GameweekEvent>,
    pub fixtures: Vec<Fixture>,
}

impl Snapshot {
    /// Load from the bootstrap and fixtures files on disk.
    pub fn load(bootstrap_path: &Path, fixtures_path: &Path) -> Result<Self, SnapshotError> {
        let bootstrap_label = bootstrap_path.display().to_string();
        let fixtures_label = fixtures_path.display().to_string();
        let bootstrap = read_value(open(bootstrap_path)?, &bootstrap_label)?;
        let fixtures = read_value(open(fixtures_path)?, &fixtures_label)?;
        Self::from_values(&bootstrap, &bootstrap_label, &fixtures, &fixtures_label)
    }

    /// Load from any pair of readers.
    pub fn from_reader<B: Read, F: Read>(bootstrap: B, fixtures: F) -> Result<Self, SnapshotError> {
        let bootstrap = read_value(bootstrap, "bootstrap")?;
        let fixtures = read_value(fixtures, "fixtures")?;
        Self::from_values(&bootstrap, "bootstrap", &fixtures, "fixtures")
    }

    /// Load from JSON text already in memory.
    pub fn from_json(bootstrap: &str, fixtures: &str) -> Result<Self, SnapshotError> {
        Self::from_reader(bootstrap.as_bytes(), fixtures.as_bytes())
    }

    fn from_values(
        bootstrap: &Value,
        bootstrap_label: &str,
        fixtures: &Value,
        fixtures_label: &str,
    ) -> Result<Self, SnapshotError> {
        let elements = array_field(bootstrap, "elements", bootstrap_label)?;
        let teams = array_field(bootstrap, "teams", bootstrap_label)?;
        let events = array_field(bootstrap, "events", bootstrap_label)?;
        // The fixtures endpoint returns a bare array; a wrapped object is accepted too.
        let fixture_rows = match fixtures {
            Value::Array(rows) => rows.as_slice(),
            other => array_field(other, "fixtures", fixtures_label)?,
        };

        let snapshot = Snapshot {
            players: parse_rows(elements, "player"),
            teams: parse_rows(teams, "team"),
            events: parse_rows(events, "gameweek"),
            fixtures: parse_rows(fixture_rows, "fixture"),
        };
        info!(
            "Loaded snapshot: {} players, {} teams, {} gameweeks, {} fixtures",
            snapshot.players.len(),
            snapshot.teams.len(),
            snapshot.events.len(),
            snapshot.fixtures.len()
        );
        Ok(snapshot)
    }

    pub fn team(&self, team_id: u32) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }

    /// Current gameweek as reported by the event flags and deadlines.
    pub fn season_clock(&self) -> SeasonClock {
        SeasonClock::from_events(&self.events)
    }

    pub fn fixture_calendar(&self, current_gw: u32) -> FixtureCalendar {
        FixtureCalendar::new(self.fixtures.clone(), current_gw)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<BufReader<File>, SnapshotError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| SnapshotError::Io {
            path: path.display().to_string(),
            source: e,
        })
}

fn read_value<R: Read>(rdr: R, label: &str) -> Result<Value, SnapshotError> {
    serde_json::from_reader(rdr).map_err(|e| {
        if e.is_io() {
            SnapshotError::Io {
                path: label.to_string(),
                source: e.into(),
            }
        } else {
            SnapshotError::Json {
                path: label.to_string(),
                source: e,
            }
        }
    })
}

fn array_field<'v>(
    value: &'v Value,
    key: &'static str,
    label: &str,
) -> Result<&'v [Value], SnapshotError> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| SnapshotError::MissingKey {
            path: label.to_string(),
            key,
        })
}

/// Deserialize each row, skipping the ones that don't fit.
fn parse_rows<T: DeserializeOwned>(rows: &[Value], what: &str) -> Vec<T> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        match T::deserialize(row) {
            Ok(item) => out.push(item),
            Err(e) => {
                let id = row.get("id").map_or_else(|| "?".to_string(), Value::to_string);
                warn!("skipping malformed {} row (id {}): {}", what, id, e);
            }
        }
    }
    out
}
