//! Best-in-class reference loadouts that define 100% gear effectiveness.
//!
//! Each table is the summed equipment bonuses of the strongest loadout for
//! that combat style. Negative bonuses are omitted since scoring skips any
//! dimension the reference does not reward.

use std::sync::OnceLock;

use crate::constants::REFERENCE_MELEE_SWITCH_LEVEL;
use crate::stats::{CombatStyle, StatDimension as D, StatVector};
use crate::tier::DifficultyTier;

/// Torva, torture, infernal cape, ferocious gloves, primordial boots,
/// Ghrazi rapier, avernic defender, berserker ring (i).
const MELEE_RAPIER: [(D, f64); 9] = [
    (D::AttackStab, 161.0),
    (D::AttackSlash, 121.0),
    (D::AttackCrush, 65.0),
    (D::DefenceStab, 327.0),
    (D::DefenceSlash, 312.0),
    (D::DefenceCrush, 320.0),
    (D::DefenceRanged, 309.0),
    (D::MeleeStrength, 160.0),
    (D::Prayer, 7.0),
];

/// Same as [`MELEE_RAPIER`] with Osmumten's fang in the weapon slot.
const MELEE_FANG: [(D, f64); 9] = [
    (D::AttackStab, 172.0),
    (D::AttackSlash, 141.0),
    (D::AttackCrush, 65.0),
    (D::DefenceStab, 327.0),
    (D::DefenceSlash, 312.0),
    (D::DefenceCrush, 320.0),
    (D::DefenceRanged, 309.0),
    (D::MeleeStrength, 174.0),
    (D::Prayer, 7.0),
];

/// Masori (f), anguish, assembler, zaryte vambraces, pegasian boots,
/// twisted bow with dragon arrows, archers ring (i).
const RANGE: [(D, f64); 8] = [
    (D::AttackRanged, 213.0),
    (D::DefenceStab, 116.0),
    (D::DefenceSlash, 106.0),
    (D::DefenceCrush, 129.0),
    (D::DefenceMagic, 150.0),
    (D::DefenceRanged, 121.0),
    (D::RangedStrength, 97.0),
    (D::Prayer, 6.0),
];

/// Ancestral, occult, imbued cape, tormented bracelet, eternal boots,
/// Tumeken's shadow, Elidinis' ward (f), lightbearer.
const MAGE: [(D, f64); 8] = [
    (D::AttackMagic, 174.0),
    (D::DefenceStab, 134.0),
    (D::DefenceSlash, 121.0),
    (D::DefenceCrush, 167.0),
    (D::DefenceMagic, 78.0),
    (D::DefenceRanged, 57.0),
    (D::MagicDamage, 23.0),
    (D::Prayer, 5.0),
];

fn cached(cell: &'static OnceLock<StatVector>, table: &[(D, f64)]) -> &'static StatVector {
    cell.get_or_init(|| StatVector::new(table.iter().copied()))
}

/// Reference loadout for a style at the given tier.
///
/// Melee switches weapon reference at level 300, where the fang overtakes
/// the rapier.
#[must_use]
pub fn reference_loadout(style: CombatStyle, tier: DifficultyTier) -> &'static StatVector {
    static MELEE_LOW: OnceLock<StatVector> = OnceLock::new();
    static MELEE_HIGH: OnceLock<StatVector> = OnceLock::new();
    static RANGE_REF: OnceLock<StatVector> = OnceLock::new();
    static MAGE_REF: OnceLock<StatVector> = OnceLock::new();

    match style {
        CombatStyle::Melee if tier.level() < REFERENCE_MELEE_SWITCH_LEVEL => {
            cached(&MELEE_LOW, &MELEE_RAPIER)
        }
        CombatStyle::Melee => cached(&MELEE_HIGH, &MELEE_FANG),
        CombatStyle::Range => cached(&RANGE_REF, &RANGE),
        CombatStyle::Mage => cached(&MAGE_REF, &MAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn melee_reference_switches_at_level_300() {
        let low = reference_loadout(CombatStyle::Melee, DifficultyTier::L200);
        let high = reference_loadout(CombatStyle::Melee, DifficultyTier::L300);
        assert!(high.get(D::MeleeStrength) > low.get(D::MeleeStrength));
        assert_eq!(
            reference_loadout(CombatStyle::Range, DifficultyTier::Entry),
            reference_loadout(CombatStyle::Range, DifficultyTier::L600)
        );
    }

    #[test]
    fn every_reference_rewards_its_primary_dimension() {
        for tier in DifficultyTier::ALL {
            assert!(reference_loadout(CombatStyle::Melee, tier).get(D::MeleeStrength) > 0.0);
            assert!(reference_loadout(CombatStyle::Range, tier).get(D::RangedStrength) > 0.0);
            assert!(reference_loadout(CombatStyle::Mage, tier).get(D::MagicDamage) > 0.0);
        }
    }
}
