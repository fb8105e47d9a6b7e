//! Save files: a JSON snapshot of the table between hands.
//!
//! Loading always validates; anything structurally wrong is `SaveError::Corrupt`
//! and the session is not resumed.

use crate::agents::BotProfile;
use crate::stats::PlayerStats;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const FORMAT_VERSION: u32 = 1;
pub const MAX_PLAYERS: usize = 8;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SaveError {
    #[error("corrupt save: {0}")]
    Corrupt(String),
    #[error("save file i/o failed: {0}")]
    Io(String),
    #[error("cannot save while a hand is in progress")]
    HandInProgress,
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "profile")]
pub enum SeatKind {
    Human,
    Bot(BotProfile),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub stack: u64,
    pub seat: SeatKind,
    #[serde(default)]
    pub stats: PlayerStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub format_version: u32,
    /// Hands dealt so far.
    pub hand_number: u32,
    /// Seat that dealt the last hand.
    pub dealer: usize,
    pub blind_level: usize,
    pub small_blind: u64,
    pub big_blind: u64,
    pub players: Vec<PlayerSnapshot>,
}

impl SessionSnapshot {
    pub fn validate(&self) -> Result<(), SaveError> {
        let corrupt = |msg: String| Err(SaveError::Corrupt(msg));
        if self.format_version != FORMAT_VERSION {
            return corrupt(format!(
                "format version {} (expected {FORMAT_VERSION})",
                self.format_version
            ));
        }
        let n = self.players.len();
        if !(2..=MAX_PLAYERS).contains(&n) {
            return corrupt(format!("{n} players, need 2..={MAX_PLAYERS}"));
        }
        let humans = self.players.iter().filter(|p| p.seat == SeatKind::Human).count();
        if humans != 1 {
            return corrupt(format!("{humans} human seats, need exactly one"));
        }
        let mut names = HashSet::new();
        for p in &self.players {
            if p.name.trim().is_empty() {
                return corrupt("player with an empty name".into());
            }
            if !names.insert(p.name.as_str()) {
                return corrupt(format!("duplicate player name {:?}", p.name));
            }
        }
        if self.small_blind == 0 || self.big_blind < self.small_blind {
            return corrupt(format!("blinds {}/{}", self.small_blind, self.big_blind));
        }
        if self.dealer >= n {
            return corrupt(format!("dealer seat {} with {n} players", self.dealer));
        }
        if self.players.iter().all(|p| p.stack == 0) {
            return corrupt("no player has chips".into());
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        serde_json::to_string_pretty(self).map_err(|e| SaveError::Io(e.to_string()))
    }

    pub fn from_json(s: &str) -> Result<Self, SaveError> {
        let snapshot: SessionSnapshot =
            serde_json::from_str(s).map_err(|e| SaveError::Corrupt(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        self.validate()?;
        fs::write(path.as_ref(), self.to_json()?)?;
        tracing::info!(path = %path.as_ref().display(), hand = self.hand_number, "session saved");
        Ok(())
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        let text = fs::read_to_string(path.as_ref())?;
        let snapshot = Self::from_json(&text)?;
        tracing::info!(path = %path.as_ref().display(), hand = snapshot.hand_number, "session loaded");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionSnapshot {
        SessionSnapshot {
            format_version: FORMAT_VERSION,
            hand_number: 12,
            dealer: 1,
            blind_level: 0,
            small_blind: 5,
            big_blind: 10,
            players: vec![
                PlayerSnapshot {
                    name: "You".into(),
                    stack: 900,
                    seat: SeatKind::Human,
                    stats: PlayerStats::default(),
                },
                PlayerSnapshot {
                    name: "Bot 1".into(),
                    stack: 1100,
                    seat: SeatKind::Bot(BotProfile::default()),
                    stats: PlayerStats { hands_played: 12, hands_won: 7, ..PlayerStats::default() },
                },
            ],
        }
    }

    #[test]
    fn json_preserves_everything() {
        let snap = sample();
        let back = SessionSnapshot::from_json(&snap.to_json().unwrap()).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn structural_problems_are_corrupt() {
        let mutations: [fn(&mut SessionSnapshot); 7] = [
            |s| s.format_version = 99,
            |s| s.players.truncate(1),
            |s| s.players[1].seat = SeatKind::Human,
            |s| s.players[1].name = "You".into(),
            |s| s.big_blind = 2,
            |s| s.dealer = 5,
            |s| s.players.iter_mut().for_each(|p| p.stack = 0),
        ];
        for mutate in mutations {
            let mut snap = sample();
            mutate(&mut snap);
            assert!(matches!(snap.validate(), Err(SaveError::Corrupt(_))), "{snap:?}");
        }
    }

    #[test]
    fn garbage_is_corrupt() {
        assert!(matches!(SessionSnapshot::from_json("{\"format_version\": 1"), Err(SaveError::Corrupt(_))));
        assert!(matches!(SessionSnapshot::from_json("[]"), Err(SaveError::Corrupt(_))));
    }
}
