//! Table setup: stacks, blinds, opponents, and bot tuning, read from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid table.
//! `HOLDEM_CONFIG` points at a file and `HOLDEM_SEED` overrides the seed.

use crate::agents::{BotProfile, BotTuning, Difficulty};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_ENV: &str = "HOLDEM_CONFIG";
pub const SEED_ENV: &str = "HOLDEM_SEED";

pub const MAX_BOTS: usize = 7;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(String),
    #[error("could not parse config: {0}")]
    Parse(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindLevel {
    pub small: u64,
    pub big: u64,
}

/// Blinds step up every `every_hands` hands and stay at the last level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindSchedule {
    pub every_hands: u32,
    pub levels: Vec<BlindLevel>,
}

impl BlindSchedule {
    /// Level index for the hand after `hands_started` hands have been dealt.
    pub fn level_index(&self, hands_started: u32) -> usize {
        let idx = (hands_started / self.every_hands.max(1)) as usize;
        idx.min(self.levels.len().saturating_sub(1))
    }

    pub fn level_for(&self, hands_started: u32) -> Option<BlindLevel> {
        self.levels.get(self.level_index(hands_started)).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub player_name: String,
    pub starting_stack: u64,
    pub small_blind: u64,
    pub big_blind: u64,
    pub num_bots: usize,
    pub difficulty: Difficulty,
    /// Explicit profiles for the first bots; the rest are drawn for `difficulty`.
    pub bots: Vec<BotProfile>,
    pub blind_schedule: Option<BlindSchedule>,
    /// Monte Carlo trials for the odds display.
    pub equity_trials: u32,
    pub seed: Option<u64>,
    pub bot_delay_ms: u64,
    pub bot_tuning: BotTuning,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            player_name: "You".into(),
            starting_stack: 1000,
            small_blind: 5,
            big_blind: 10,
            num_bots: 3,
            difficulty: Difficulty::Medium,
            bots: Vec::new(),
            blind_schedule: None,
            equity_trials: 1000,
            seed: None,
            bot_delay_ms: 400,
            bot_tuning: BotTuning::default(),
        }
    }
}

impl TableConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: TableConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Defaults, then the file named by `HOLDEM_CONFIG`, then `HOLDEM_SEED`.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => Self::load(path)?,
            _ => Self::default(),
        };
        if let Ok(seed) = std::env::var(SEED_ENV) {
            if !seed.is_empty() {
                let seed = seed
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("{SEED_ENV} must be a u64, got {seed:?}")))?;
                cfg.seed = Some(seed);
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        if self.player_name.trim().is_empty() {
            return invalid("player_name must not be empty".into());
        }
        if self.starting_stack == 0 {
            return invalid("starting_stack must be > 0".into());
        }
        check_blinds(self.small_blind, self.big_blind)?;
        if !(1..=MAX_BOTS).contains(&self.num_bots) {
            return invalid(format!("num_bots must be 1..={MAX_BOTS}, got {}", self.num_bots));
        }
        if self.bots.len() > self.num_bots {
            return invalid(format!(
                "{} bot profiles given for {} bots",
                self.bots.len(),
                self.num_bots
            ));
        }
        if let Some(schedule) = &self.blind_schedule {
            if schedule.every_hands == 0 {
                return invalid("blind_schedule.every_hands must be > 0".into());
            }
            if schedule.levels.is_empty() {
                return invalid("blind_schedule.levels must not be empty".into());
            }
            for level in &schedule.levels {
                check_blinds(level.small, level.big)?;
            }
        }
        if self.equity_trials == 0 {
            return invalid("equity_trials must be >= 1".into());
        }
        let t = &self.bot_tuning;
        let probabilities = [
            t.mistake_easy,
            t.mistake_medium,
            t.mistake_hard,
            t.bluff_tight,
            t.bluff_loose,
            t.bluff_unpredictable,
        ];
        if probabilities.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return invalid("bot_tuning probabilities must be within [0, 1]".into());
        }
        let widths = [t.noise_tight, t.noise_loose, t.noise_unpredictable, t.conservative_noise_scale];
        if widths.iter().any(|w| !(0.0..=1.0).contains(w)) {
            return invalid("bot_tuning noise widths must be within [0, 1]".into());
        }
        Ok(())
    }

    /// Blinds for the next hand, honouring the schedule when there is one.
    pub fn blinds_for(&self, hands_started: u32) -> (usize, BlindLevel) {
        match &self.blind_schedule {
            Some(s) => match s.level_for(hands_started) {
                Some(level) => (s.level_index(hands_started), level),
                None => (0, BlindLevel { small: self.small_blind, big: self.big_blind }),
            },
            None => (0, BlindLevel { small: self.small_blind, big: self.big_blind }),
        }
    }

    /// One profile per bot: explicit ones first, then random draws for `difficulty`.
    pub fn bot_profiles<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<BotProfile> {
        let mut profiles: Vec<BotProfile> = self.bots.iter().take(self.num_bots).copied().collect();
        while profiles.len() < self.num_bots {
            profiles.push(BotProfile::random_for(self.difficulty, rng));
        }
        profiles
    }
}

fn check_blinds(small: u64, big: u64) -> Result<(), ConfigError> {
    if small == 0 || big == 0 {
        return Err(ConfigError::Invalid("blinds must be > 0".into()));
    }
    if big < small {
        return Err(ConfigError::Invalid(format!("big blind {big} is below small blind {small}")));
    }
    if big != small * 2 {
        tracing::warn!(small, big, "big blind is not twice the small blind");
    }
    Ok(())
}
