//! Discrete raid difficulty tiers and their per-tier tables.
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

use crate::constants::MINUTE_MS;
use crate::error::RaidError;

/// Difficulty level of a raid. Serialized as its numeric level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum DifficultyTier {
    Entry,
    L100,
    L200,
    L300,
    L350,
    L400,
    L500,
    L600,
}

impl DifficultyTier {
    pub const ALL: [Self; 8] = [
        Self::Entry,
        Self::L100,
        Self::L200,
        Self::L300,
        Self::L350,
        Self::L400,
        Self::L500,
        Self::L600,
    ];

    #[must_use]
    pub const fn level(self) -> u16 {
        match self {
            Self::Entry => 1,
            Self::L100 => 100,
            Self::L200 => 200,
            Self::L300 => 300,
            Self::L350 => 350,
            Self::L400 => 400,
            Self::L500 => 500,
            Self::L600 => 600,
        }
    }

    /// Base trip length before any team reductions, in milliseconds.
    #[must_use]
    pub const fn base_duration_ms(self) -> u64 {
        let minutes = match self {
            Self::Entry | Self::L100 => 50,
            Self::L200 => 65,
            Self::L300 => 70,
            Self::L350 => 75,
            Self::L400 => 80,
            Self::L500 => 90,
            Self::L600 => 100,
        };
        minutes * MINUTE_MS
    }

    /// Base per-raid death chance in percent, before experience scaling.
    #[must_use]
    pub const fn base_death_chance(self) -> f64 {
        match self {
            Self::Entry => 5.0,
            Self::L100 => 10.0,
            Self::L200 => 15.0,
            Self::L300 => 20.0,
            Self::L350 => 25.5,
            Self::L400 => 29.0,
            Self::L500 => 33.0,
            Self::L600 => 40.0,
        }
    }
}

impl TryFrom<u16> for DifficultyTier {
    type Error = RaidError;

    fn try_from(level: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.level() == level)
            .ok_or(RaidError::UnknownTier { level })
    }
}

impl From<DifficultyTier> for u16 {
    fn from(tier: DifficultyTier) -> Self {
        tier.level()
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "level {}", self.level())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_roundtrip_and_reject_unknown() {
        for tier in DifficultyTier::ALL {
            assert_eq!(DifficultyTier::try_from(tier.level()), Ok(tier));
        }
        assert_eq!(
            DifficultyTier::try_from(250),
            Err(RaidError::UnknownTier { level: 250 })
        );
    }

    #[test]
    fn tables_are_monotonic() {
        for pair in DifficultyTier::ALL.windows(2) {
            assert!(pair[0].base_death_chance() < pair[1].base_death_chance());
            assert!(pair[0].base_duration_ms() <= pair[1].base_duration_ms());
        }
    }

    #[test]
    fn serializes_as_level() {
        assert_eq!(serde_json::to_string(&DifficultyTier::L350).unwrap(), "350");
        let parsed: DifficultyTier = serde_json::from_str("500").unwrap();
        assert_eq!(parsed, DifficultyTier::L500);
        assert!(serde_json::from_str::<DifficultyTier>("7").is_err());
    }
}
