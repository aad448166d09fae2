//! Gear effectiveness scoring against the reference loadouts.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    EFFECTIVENESS_COUNTER_FOR_MAX, EFFECTIVENESS_RANDOM_MAX, EFFECTIVENESS_RANDOM_MIN,
    MAX_SKILL_LEVEL,
};
use crate::error::RaidError;
use crate::numbers::{usize_to_f64, what_percent};
use crate::participant::{GearSetups, Participant, Skill};
use crate::reference::reference_loadout;
use crate::stats::{CombatStyle, StatDimension, StatVector};
use crate::tier::DifficultyTier;

/// Per-style gear scores and their unweighted mean, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectivenessScore {
    pub melee: f64,
    pub range: f64,
    pub mage: f64,
    pub total: f64,
}

impl EffectivenessScore {
    /// Build from per-style scores, rejecting anything outside `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns `RaidError::ScoreOutOfRange` when a style score is out of bounds.
    pub fn new(melee: f64, range: f64, mage: f64) -> Result<Self, RaidError> {
        for (style, value) in [
            (CombatStyle::Melee, melee),
            (CombatStyle::Range, range),
            (CombatStyle::Mage, mage),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(RaidError::ScoreOutOfRange { style, value });
            }
        }
        Ok(Self {
            melee,
            range,
            mage,
            total: (melee + range + mage) / 3.0,
        })
    }

    #[must_use]
    pub const fn style(&self, style: CombatStyle) -> f64 {
        match style {
            CombatStyle::Melee => self.melee,
            CombatStyle::Range => self.range,
            CombatStyle::Mage => self.mage,
        }
    }
}

/// How a style's setup is compared to its reference.
#[derive(Debug, Clone, Copy)]
pub struct SetupProfile {
    /// Dimension that must reach half the reference or the score is halved.
    pub primary: StatDimension,
    pub ignored: &'static [StatDimension],
    /// Fold the best melee offense ratio in as an extra term.
    pub weapon_tier_compare: bool,
}

impl SetupProfile {
    #[must_use]
    pub const fn for_style(style: CombatStyle) -> Self {
        use StatDimension as D;
        match style {
            CombatStyle::Melee => Self {
                primary: D::MeleeStrength,
                ignored: &[
                    D::AttackStab,
                    D::AttackSlash,
                    D::AttackCrush,
                    D::AttackRanged,
                    D::AttackMagic,
                ],
                weapon_tier_compare: true,
            },
            CombatStyle::Range => Self {
                primary: D::RangedStrength,
                ignored: &[D::AttackStab, D::AttackSlash, D::AttackCrush, D::AttackMagic],
                weapon_tier_compare: false,
            },
            CombatStyle::Mage => Self {
                primary: D::MagicDamage,
                ignored: &[D::AttackStab, D::AttackSlash, D::AttackCrush, D::AttackRanged],
                weapon_tier_compare: false,
            },
        }
    }
}

fn capped_ratio(value: f64, reference: f64) -> f64 {
    what_percent(value, reference).min(100.0)
}

/// Mean capped ratio across the counted dimensions, before the penalty rule.
#[must_use]
pub fn unpenalized_setup_percent(
    stats: &StatVector,
    reference: &StatVector,
    profile: &SetupProfile,
) -> f64 {
    let mut total = 0.0;
    let mut counted = 0usize;
    for (dim, reference_value) in reference.iter() {
        if reference_value <= 0.0 || profile.ignored.contains(&dim) {
            continue;
        }
        total += capped_ratio(stats.get(dim), reference_value);
        counted += 1;
    }
    if profile.weapon_tier_compare {
        let reference_best = reference.max_of(&StatDimension::MELEE_OFFENSE);
        if reference_best > 0.0 {
            total += capped_ratio(stats.max_of(&StatDimension::MELEE_OFFENSE), reference_best);
            counted += 1;
        }
    }
    if counted == 0 {
        return 0.0;
    }
    total / usize_to_f64(counted)
}

/// Score a setup against its reference in `0..=100`.
///
/// Falling below half the reference in the primary dimension halves the
/// score, so an off-style loadout never scores well on incidental stats.
#[must_use]
pub fn score_setup(stats: &StatVector, reference: &StatVector, profile: &SetupProfile) -> f64 {
    let percent = unpenalized_setup_percent(stats, reference, profile);
    if stats.get(profile.primary) < reference.get(profile.primary) / 2.0 {
        return (percent / 2.0).max(0.0).floor();
    }
    percent
}

/// Score all three setups at a tier.
///
/// # Errors
///
/// Returns `RaidError::ScoreOutOfRange` if a style score leaves `0..=100`.
pub fn score_gear(setups: &GearSetups, tier: DifficultyTier) -> Result<EffectivenessScore, RaidError> {
    let [melee, range, mage] = CombatStyle::ALL.map(|style| {
        score_setup(
            &setups.get(style).stats,
            reference_loadout(style, tier),
            &SetupProfile::for_style(style),
        )
    });
    EffectivenessScore::new(melee, range, mage)
}

/// Overall effectiveness in `0..=100` used to cap contribution points.
///
/// Averages experience, skills and gear, plus one random term in `50..=100`
/// when `rng` is supplied.
///
/// # Errors
///
/// Returns `RaidError::EffectivenessOutOfRange` if the mean leaves `0..=100`.
pub fn overall_effectiveness<R: Rng + ?Sized>(
    participant: &Participant,
    gear: &EffectivenessScore,
    rng: Option<&mut R>,
) -> Result<f64, RaidError> {
    let mut percents = Vec::with_capacity(5);
    percents.push(
        what_percent(f64::from(participant.completions), EFFECTIVENESS_COUNTER_FOR_MAX)
            .clamp(0.0, 100.0),
    );
    percents.push(
        what_percent(f64::from(participant.attempts), EFFECTIVENESS_COUNTER_FOR_MAX)
            .clamp(0.0, 100.0),
    );
    let skill_total: f64 = Skill::OFFENSIVE
        .iter()
        .map(|skill| f64::from(participant.skill(*skill)))
        .sum();
    let skill_max = usize_to_f64(Skill::OFFENSIVE.len()) * MAX_SKILL_LEVEL;
    percents.push(what_percent(skill_total, skill_max).clamp(0.0, 100.0));
    percents.push(gear.total);
    if let Some(rng) = rng {
        let roll = rng.gen_range(EFFECTIVENESS_RANDOM_MIN..=EFFECTIVENESS_RANDOM_MAX);
        percents.push(f64::from(roll));
    }

    let value = percents.iter().sum::<f64>() / usize_to_f64(percents.len());
    if !(0.0..=100.0).contains(&value) {
        return Err(RaidError::EffectivenessOutOfRange { value });
    }
    Ok(value)
}
