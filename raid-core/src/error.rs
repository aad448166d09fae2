//! Contract violations and loot configuration errors.
use thiserror::Error;

use crate::constants::{MAX_TEAM_SIZE, MIN_TEAM_SIZE};
use crate::stats::CombatStyle;

/// Contract violations raised by the engine.
///
/// Ineligibility is never reported through this type; it is an expected
/// outcome returned as [`crate::EncounterResult::Ineligible`].
#[derive(Debug, Error, PartialEq)]
pub enum RaidError {
    #[error("team size {size} outside {MIN_TEAM_SIZE}..={MAX_TEAM_SIZE}")]
    TeamSize { size: usize },
    #[error("participant {id} appears more than once in the team")]
    DuplicateParticipant { id: String },
    #[error("{style:?} effectiveness {value:.2} outside 0..=100")]
    ScoreOutOfRange { style: CombatStyle, value: f64 },
    #[error("total effectiveness {value:.2} outside 0..=100")]
    EffectivenessOutOfRange { value: f64 },
    #[error("simulated duration {value} is negative or non-finite")]
    InvalidDuration { value: f64 },
    #[error("unknown difficulty tier {level}")]
    UnknownTier { level: u16 },
}

/// Errors raised when loot configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{table} table is empty")]
    EmptyTable { table: &'static str },
    #[error("{table} entry {item} has zero weight")]
    ZeroWeight { table: &'static str, item: String },
    #[error("{table} entry {item} has a zero divisor or drop rate")]
    ZeroDivisor { table: &'static str, item: String },
    #[error("downgrade chance {value}% exceeds 100%")]
    DowngradeChance { value: u8 },
    #[error("transmog chance must be at least 1 in 1 (got 0)")]
    TransmogChance,
}
