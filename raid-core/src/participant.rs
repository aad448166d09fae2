//! Participant snapshots supplied by the calling service.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::items::ItemBank;
use crate::stats::{CombatStyle, StatVector};

/// Stable participant identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Skills checked by the raid requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Attack,
    Strength,
    Defence,
    Magic,
    Prayer,
    Ranged,
}

impl Skill {
    pub const ALL: [Self; 6] = [
        Self::Attack,
        Self::Strength,
        Self::Defence,
        Self::Magic,
        Self::Prayer,
        Self::Ranged,
    ];

    /// Offensive skills that feed overall effectiveness.
    pub const OFFENSIVE: [Self; 4] = [Self::Attack, Self::Strength, Self::Magic, Self::Ranged];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Attack => "Attack",
            Self::Strength => "Strength",
            Self::Defence => "Defence",
            Self::Magic => "Magic",
            Self::Prayer => "Prayer",
            Self::Ranged => "Ranged",
        }
    }
}

/// Stack of ammunition equipped in a setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedAmmo {
    pub item: String,
    pub quantity: u32,
}

/// One combat setup: its aggregated stats, equipped item names and ammo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GearSetup {
    #[serde(default)]
    pub stats: StatVector,
    #[serde(default)]
    pub equipped: BTreeSet<String>,
    #[serde(default)]
    pub ammo: Option<EquippedAmmo>,
}

impl GearSetup {
    #[must_use]
    pub fn has_equipped(&self, item: &str) -> bool {
        self.equipped.contains(item)
            || self.ammo.as_ref().is_some_and(|ammo| ammo.item == item)
    }

    #[must_use]
    pub fn has_any_equipped(&self, items: &[&str]) -> bool {
        items.iter().any(|item| self.has_equipped(item))
    }
}

/// The three setups a participant brings into the raid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GearSetups {
    #[serde(default)]
    pub melee: GearSetup,
    #[serde(default)]
    pub range: GearSetup,
    #[serde(default)]
    pub mage: GearSetup,
}

impl GearSetups {
    #[must_use]
    pub const fn get(&self, style: CombatStyle) -> &GearSetup {
        match style {
            CombatStyle::Melee => &self.melee,
            CombatStyle::Range => &self.range,
            CombatStyle::Mage => &self.mage,
        }
    }
}

/// Rapid-fire secondary weapon state: loaded darts and charge scales.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlowpipeLoadout {
    #[serde(default)]
    pub dart: Option<String>,
    #[serde(default)]
    pub dart_quantity: u32,
    #[serde(default)]
    pub scales: u32,
}

/// Immutable snapshot of one raid participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    #[serde(default)]
    pub setups: GearSetups,
    #[serde(default)]
    pub skills: BTreeMap<Skill, u8>,
    /// Items owned outside of the equipped setups.
    #[serde(default)]
    pub bank: ItemBank,
    /// Every item the participant has ever received.
    #[serde(default)]
    pub collection_log: ItemBank,
    #[serde(default)]
    pub blowpipe: BlowpipeLoadout,
    #[serde(default)]
    pub helm_charges: u32,
    /// Successful raid completions.
    #[serde(default)]
    pub completions: u32,
    /// Raids started, successful or not.
    #[serde(default)]
    pub attempts: u32,
    /// Consecutive failed raids leading into this one; carried for the scheduler.
    #[serde(default)]
    pub prior_failure_streak: u32,
}

impl Participant {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: ParticipantId::new(id),
            setups: GearSetups::default(),
            skills: BTreeMap::new(),
            bank: ItemBank::new(),
            collection_log: ItemBank::new(),
            blowpipe: BlowpipeLoadout::default(),
            helm_charges: 0,
            completions: 0,
            attempts: 0,
            prior_failure_streak: 0,
        }
    }

    #[must_use]
    pub fn skill(&self, skill: Skill) -> u8 {
        self.skills.get(&skill).copied().unwrap_or(1)
    }

    /// Owned in the bank or equipped in any setup.
    #[must_use]
    pub fn owns(&self, item: &str) -> bool {
        self.bank.has(item)
            || CombatStyle::ALL
                .into_iter()
                .any(|style| self.setups.get(style).has_equipped(item))
    }
}
