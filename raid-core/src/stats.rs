//! Combat stat vectors and styles.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named combat-stat dimension of an equipment setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatDimension {
    AttackStab,
    AttackSlash,
    AttackCrush,
    AttackMagic,
    AttackRanged,
    DefenceStab,
    DefenceSlash,
    DefenceCrush,
    DefenceMagic,
    DefenceRanged,
    MeleeStrength,
    RangedStrength,
    MagicDamage,
    Prayer,
}

impl StatDimension {
    pub const ALL: [Self; 14] = [
        Self::AttackStab,
        Self::AttackSlash,
        Self::AttackCrush,
        Self::AttackMagic,
        Self::AttackRanged,
        Self::DefenceStab,
        Self::DefenceSlash,
        Self::DefenceCrush,
        Self::DefenceMagic,
        Self::DefenceRanged,
        Self::MeleeStrength,
        Self::RangedStrength,
        Self::MagicDamage,
        Self::Prayer,
    ];

    /// Offense dimensions compared by weapon tier for melee setups.
    pub const MELEE_OFFENSE: [Self; 3] = [Self::AttackStab, Self::AttackSlash, Self::AttackCrush];
}

/// Combat style a gear setup is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatStyle {
    Melee,
    Range,
    Mage,
}

impl CombatStyle {
    pub const ALL: [Self; 3] = [Self::Melee, Self::Range, Self::Mage];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Melee => "melee",
            Self::Range => "range",
            Self::Mage => "mage",
        }
    }
}

/// Non-negative aggregate stats of one equipment setup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<StatDimension, f64>", into = "BTreeMap<StatDimension, f64>")]
pub struct StatVector {
    values: BTreeMap<StatDimension, f64>,
}

impl StatVector {
    /// Build a vector from dimension/value pairs. Negative and non-finite
    /// values are stored as zero.
    #[must_use]
    pub fn new(pairs: impl IntoIterator<Item = (StatDimension, f64)>) -> Self {
        let values = pairs
            .into_iter()
            .map(|(dim, value)| (dim, sanitize(value)))
            .collect();
        Self { values }
    }

    /// Value for a dimension, 0.0 when absent.
    #[must_use]
    pub fn get(&self, dim: StatDimension) -> f64 {
        self.values.get(&dim).copied().unwrap_or(0.0)
    }

    /// Largest value among the given dimensions.
    #[must_use]
    pub fn max_of(&self, dims: &[StatDimension]) -> f64 {
        dims.iter()
            .map(|dim| self.get(*dim))
            .fold(0.0, f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatDimension, f64)> + '_ {
        self.values.iter().map(|(dim, value)| (*dim, *value))
    }
}

impl From<BTreeMap<StatDimension, f64>> for StatVector {
    fn from(values: BTreeMap<StatDimension, f64>) -> Self {
        Self::new(values)
    }
}

impl From<StatVector> for BTreeMap<StatDimension, f64> {
    fn from(vector: StatVector) -> Self {
        vector.values
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
