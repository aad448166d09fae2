//! Trip duration: per-participant speed changes, team aggregation and the
//! final duration with its floor, small-team penalty and variation.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DURATION_FLOOR_MS, DURATION_VARIATION_PERCENT, EXPERIENCE_ATTEMPTS_FOR_MAX,
    EXPERIENCE_ATTEMPTS_SCALING_CAP, EXPERIENCE_CURVE_CAP, EXPERIENCE_CURVE_FACTOR, MAX_TEAM_SIZE,
    MIN_TEAM_SIZE, MINUTE_MS, NOMINAL_TEAM_SIZE, REFERENCE_MELEE_SWITCH_LEVEL,
    SPEED_REDUCTION_FOR_EXPERIENCE, SPEED_REDUCTION_FOR_GEAR, UNDERSIZED_TEAM_PENALTY_MS,
    WORST_CONTRIBUTOR_DROP_MIN_SIZE,
};
use crate::error::RaidError;
use crate::numbers::{
    floor_f64_to_u64, percent_of, reduce_by_percent, round_to, u64_to_f64, usize_to_f64,
    what_percent,
};
use crate::participant::Participant;
use crate::rng::apply_variation;
use crate::tier::DifficultyTier;

/// Where a flat boost item has to be for the boost to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostScope {
    MeleeSetup,
    RangeSetup,
    Owned,
}

/// Ordered `(item, percent)` table. The first item found wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoostCategory {
    pub name: &'static str,
    pub scope: BoostScope,
    pub boosts: &'static [(&'static str, f64)],
}

const MELEE_WEAPON_LOW: &[(&str, f64)] = &[("Ghrazi rapier", 15.0), ("Osmumten's fang", 6.0)];
const MELEE_WEAPON_HIGH: &[(&str, f64)] = &[("Osmumten's fang", 15.0), ("Ghrazi rapier", 6.0)];
const RANGE_WEAPON: &[(&str, f64)] = &[("Twisted bow", 4.0)];
const PRIMARY_SPEC_WEAPON: &[(&str, f64)] = &[("Dragon claws", 6.0), ("Crystal halberd", 3.0)];
const SECONDARY_SPEC_WEAPON: &[(&str, f64)] = &[
    ("Dragon warhammer", 6.0),
    ("Bandos godsword", 3.0),
    ("Dragon dagger", 1.0),
];

/// Boost categories in evaluation order for a tier.
#[must_use]
pub const fn boost_categories(tier: DifficultyTier) -> [BoostCategory; 4] {
    let melee_weapons = if tier.level() < REFERENCE_MELEE_SWITCH_LEVEL {
        MELEE_WEAPON_LOW
    } else {
        MELEE_WEAPON_HIGH
    };
    [
        BoostCategory {
            name: "melee weapon",
            scope: BoostScope::MeleeSetup,
            boosts: melee_weapons,
        },
        BoostCategory {
            name: "range weapon",
            scope: BoostScope::RangeSetup,
            boosts: RANGE_WEAPON,
        },
        BoostCategory {
            name: "primary special weapon",
            scope: BoostScope::Owned,
            boosts: PRIMARY_SPEC_WEAPON,
        },
        BoostCategory {
            name: "secondary special weapon",
            scope: BoostScope::Owned,
            boosts: SECONDARY_SPEC_WEAPON,
        },
    ]
}

fn has_boost_item(participant: &Participant, scope: BoostScope, item: &str) -> bool {
    match scope {
        BoostScope::MeleeSetup => participant.setups.melee.has_equipped(item),
        BoostScope::RangeSetup => participant.setups.range.has_equipped(item),
        BoostScope::Owned => participant.owns(item),
    }
}

/// Sum of the first matching boost in every category.
#[must_use]
pub fn flat_boost_percent(participant: &Participant, tier: DifficultyTier) -> f64 {
    boost_categories(tier)
        .iter()
        .filter_map(|category| {
            category
                .boosts
                .iter()
                .find(|(item, _)| has_boost_item(participant, category.scope, item))
                .map(|(_, percent)| *percent)
        })
        .sum()
}

fn ceil_percent_of(percent: f64, value: f64) -> f64 {
    percent_of(percent.ceil(), value).ceil()
}

/// Experience percent from attempts, scaled against a fixed target.
#[must_use]
pub fn experience_percent(attempts: u32) -> f64 {
    let attempts = attempts.min(EXPERIENCE_ATTEMPTS_SCALING_CAP);
    what_percent(f64::from(attempts), EXPERIENCE_ATTEMPTS_FOR_MAX).min(100.0)
}

/// Percent a participant shaves off the trip before team averaging.
#[must_use]
pub fn participant_speed_change(
    participant: &Participant,
    gear_total: f64,
    tier: DifficultyTier,
) -> f64 {
    let experience = experience_percent(participant.attempts);
    let mut change = ceil_percent_of(gear_total, SPEED_REDUCTION_FOR_GEAR)
        + ceil_percent_of(experience, SPEED_REDUCTION_FOR_EXPERIENCE);
    let curve_bonus = (experience * EXPERIENCE_CURVE_FACTOR).min(EXPERIENCE_CURVE_CAP);
    change *= 1.0 + curve_bonus / 100.0;
    change + flat_boost_percent(participant, tier)
}

/// Team reduction percent, rounded to two decimals.
///
/// Teams of three or more drop their single smallest change and average over
/// the rest; smaller teams average over everyone.
#[must_use]
pub fn aggregate_team_reduction(changes: &[f64]) -> f64 {
    if changes.is_empty() {
        return 0.0;
    }
    let total: f64 = changes.iter().sum();
    let reduction = if changes.len() >= WORST_CONTRIBUTOR_DROP_MIN_SIZE {
        let worst = changes.iter().copied().fold(f64::INFINITY, f64::min);
        (total - worst) / usize_to_f64(changes.len() - 1)
    } else {
        total / usize_to_f64(changes.len())
    };
    let reduction = round_to(reduction, 2);
    log::debug!(
        "team reduction {reduction:.2}% from {} contributors",
        changes.len()
    );
    reduction
}

/// Untruncated trip length before team reductions.
///
/// Tiers above 100 add one minute per hundred levels on top of the base.
#[must_use]
pub fn base_trip_ms(tier: DifficultyTier) -> f64 {
    let mut duration = u64_to_f64(tier.base_duration_ms());
    if tier.level() > 100 {
        duration += f64::from(tier.level()) / 100.0 * u64_to_f64(MINUTE_MS);
    }
    duration
}

/// Apply the team reduction to a base duration.
#[must_use]
pub fn reduced_duration(base_ms: f64, team_reduction: f64) -> f64 {
    reduce_by_percent(base_ms, team_reduction)
}

/// Full trip duration in milliseconds.
///
/// Passing `None` for `rng` skips the ±5% variation.
///
/// # Errors
///
/// Returns `RaidError::TeamSize` for rosters outside `1..=8` and
/// `RaidError::InvalidDuration` when the arithmetic produces a non-finite or
/// negative value.
pub fn trip_duration_ms<R: Rng + ?Sized>(
    tier: DifficultyTier,
    team_size: usize,
    team_reduction: f64,
    rng: Option<&mut R>,
) -> Result<u64, RaidError> {
    if !(MIN_TEAM_SIZE..=MAX_TEAM_SIZE).contains(&team_size) {
        return Err(RaidError::TeamSize { size: team_size });
    }
    if !team_reduction.is_finite() {
        return Err(RaidError::InvalidDuration {
            value: team_reduction,
        });
    }
    let floor = u64_to_f64(DURATION_FLOOR_MS);
    let mut duration = reduced_duration(base_trip_ms(tier), team_reduction).max(floor);
    if team_size < NOMINAL_TEAM_SIZE {
        duration += usize_to_f64(NOMINAL_TEAM_SIZE - team_size) * UNDERSIZED_TEAM_PENALTY_MS;
    }
    if let Some(rng) = rng {
        duration = apply_variation(rng, duration, DURATION_VARIATION_PERCENT);
    }
    if !duration.is_finite() || duration < 0.0 {
        return Err(RaidError::InvalidDuration { value: duration });
    }
    Ok(floor_f64_to_u64(duration).max(DURATION_FLOOR_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::HOUR_MS;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn duo_reduction_averages_over_both() {
        let reduction = aggregate_team_reduction(&[20.0, 20.0]);
        assert!((reduction - 20.0).abs() < f64::EPSILON);
        assert!((reduced_duration(3_000.0, reduction) - 2_400.0).abs() < 1e-9);
    }

    #[test]
    fn larger_teams_drop_the_worst_contributor() {
        let changes = [30.0, 30.0, 30.0, 0.0];
        let dropped = aggregate_team_reduction(&changes);
        let naive = round_to(changes.iter().sum::<f64>() / 4.0, 2);
        assert!((dropped - 30.0).abs() < f64::EPSILON);
        assert!(dropped > naive);
        assert!((aggregate_team_reduction(&[10.0, 0.0]) - 5.0).abs() < f64::EPSILON);
        assert!((aggregate_team_reduction(&[1.0, 2.0, 2.0]) - 2.0).abs() < f64::EPSILON);
        assert!(aggregate_team_reduction(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn reduction_rounds_to_two_decimals() {
        let reduction = aggregate_team_reduction(&[10.0, 10.0, 11.0, 12.0]);
        assert!((reduction - 11.0).abs() < f64::EPSILON);
        let reduction = aggregate_team_reduction(&[1.0, 1.0, 1.0, 2.0]);
        assert!((reduction - 1.33).abs() < f64::EPSILON);
    }

    #[test]
    fn base_adds_a_minute_per_hundred_levels() {
        assert!((base_trip_ms(DifficultyTier::L100) - 50.0 * 60_000.0).abs() < 1e-9);
        assert!((base_trip_ms(DifficultyTier::L300) - 73.0 * 60_000.0).abs() < 1e-9);
        assert!((base_trip_ms(DifficultyTier::L350) - 78.5 * 60_000.0).abs() < 1e-9);
    }

    #[test]
    fn duration_respects_floor_and_team_penalty() {
        let solo = trip_duration_ms::<SmallRng>(DifficultyTier::Entry, 1, 0.0, None).unwrap();
        let full = trip_duration_ms::<SmallRng>(DifficultyTier::Entry, 5, 0.0, None).unwrap();
        assert_eq!(full, 50 * MINUTE_MS);
        assert_eq!(solo, full + 4 * 78_000);

        let floored = trip_duration_ms::<SmallRng>(DifficultyTier::L600, 8, 95.0, None).unwrap();
        assert_eq!(floored, DURATION_FLOOR_MS);
        let overshoot = trip_duration_ms::<SmallRng>(DifficultyTier::L600, 8, 140.0, None).unwrap();
        assert_eq!(overshoot, DURATION_FLOOR_MS);
    }

    #[test]
    fn variation_stays_within_five_percent() {
        let mut rng = SmallRng::seed_from_u64(21);
        let nominal = trip_duration_ms::<SmallRng>(DifficultyTier::L400, 4, 12.5, None).unwrap();
        for _ in 0..200 {
            let varied = trip_duration_ms(DifficultyTier::L400, 4, 12.5, Some(&mut rng)).unwrap();
            let nominal = u64_to_f64(nominal);
            let varied = u64_to_f64(varied);
            assert!(varied >= nominal * 0.95 - 1.0 && varied <= nominal * 1.05 + 1.0);
            assert!(varied < u64_to_f64(2 * HOUR_MS));
        }
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert_eq!(
            trip_duration_ms::<SmallRng>(DifficultyTier::Entry, 0, 0.0, None),
            Err(RaidError::TeamSize { size: 0 })
        );
        assert_eq!(
            trip_duration_ms::<SmallRng>(DifficultyTier::Entry, 9, 0.0, None),
            Err(RaidError::TeamSize { size: 9 })
        );
        assert!(matches!(
            trip_duration_ms::<SmallRng>(DifficultyTier::Entry, 3, f64::NAN, None),
            Err(RaidError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn speed_change_rewards_gear_experience_and_boosts() {
        let mut fresh = Participant::new("fresh");
        assert!(participant_speed_change(&fresh, 0.0, DifficultyTier::L300).abs() < f64::EPSILON);

        fresh.attempts = 400;
        let veteran = participant_speed_change(&fresh, 100.0, DifficultyTier::L300);
        // gear 16, experience ceil(87.5 -> 88) * 40% = 35.2 -> 36, curve +30%
        assert!((veteran - (16.0 + 36.0) * 1.3).abs() < 1e-9);

        fresh.setups.melee.equipped.insert("Osmumten's fang".to_string());
        fresh.setups.melee.equipped.insert("Ghrazi rapier".to_string());
        fresh.bank.add("Dragon claws", 1);
        fresh.bank.add("Crystal halberd", 1);
        fresh.bank.add("Dragon dagger", 1);
        assert!((flat_boost_percent(&fresh, DifficultyTier::L300) - 22.0).abs() < f64::EPSILON);
        assert!((flat_boost_percent(&fresh, DifficultyTier::L200) - 22.0).abs() < f64::EPSILON);

        fresh.setups.melee.equipped.remove("Ghrazi rapier");
        assert!((flat_boost_percent(&fresh, DifficultyTier::L200) - 13.0).abs() < f64::EPSILON);
    }

    #[test]
    fn owned_melee_weapon_outside_setup_does_not_boost() {
        let mut participant = Participant::new("banked");
        participant.bank.add("Osmumten's fang", 1);
        participant.bank.add("Twisted bow", 1);
        assert!(flat_boost_percent(&participant, DifficultyTier::L500).abs() < f64::EPSILON);
    }
}
