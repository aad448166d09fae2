//! Per-trip supply cost of one participant.
use serde::Serialize;

use crate::constants::{
    BLOWPIPE_DARTS_NEEDED, HELM_CHARGES_PER_HOUR, HOUR_MS, ITEM_BLOOD_RUNE, ITEM_BREW,
    ITEM_DEATH_RUNE, ITEM_FALLBACK_DART, ITEM_RANGING_POTION, ITEM_RESTORE, ITEM_SANFEW,
    ITEM_SERPENTINE_HELM, ITEM_SUPER_COMBAT, ITEM_WATER_RUNE, RANGE_AMMO_NEEDED,
    TRIP_BLOOD_RUNES, TRIP_BREW_KC_STEP, TRIP_BREWS_MAX, TRIP_DEATH_RUNES, TRIP_RESTORES_MIN,
    TRIP_WATER_RUNES,
};
use crate::items::ItemBank;
use crate::numbers::ceil_f64_to_u32;
use crate::participant::Participant;

/// Supplies consumed by one trip. Deducting them is the caller's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TripCost {
    pub supplies: ItemBank,
    /// Darts and arrows fired by the ranged weapons.
    pub blowpipe: ItemBank,
    pub helm_charges: u64,
}

impl TripCost {
    /// Supplies and ammunition combined.
    #[must_use]
    pub fn total_items(&self) -> ItemBank {
        let mut total = self.supplies.clone();
        total.add_bank(&self.blowpipe);
        total
    }
}

/// Helm charges drained over a trip of `duration_ms`.
#[must_use]
pub const fn helm_charges_for(duration_ms: u64) -> u64 {
    duration_ms / (HOUR_MS / HELM_CHARGES_PER_HOUR)
}

/// Brews needed, shrinking from eight towards one as completions grow.
#[must_use]
pub fn brews_needed(completions: u32) -> u32 {
    let step = ceil_f64_to_u32((f64::from(completions) + 1.0) / TRIP_BREW_KC_STEP).max(1);
    TRIP_BREWS_MAX.saturating_sub(step).max(1)
}

#[must_use]
pub fn trip_cost(participant: &Participant, duration_ms: u64) -> TripCost {
    let mut supplies = ItemBank::new()
        .with(ITEM_SUPER_COMBAT, 1)
        .with(ITEM_RANGING_POTION, 1);

    let helm_charges = if participant.setups.melee.has_equipped(ITEM_SERPENTINE_HELM) {
        helm_charges_for(duration_ms)
    } else {
        supplies.add(ITEM_SANFEW, 1);
        0
    };

    let brews = brews_needed(participant.completions);
    supplies.add(ITEM_BREW, brews);
    supplies.add(ITEM_RESTORE, (brews / 3).max(TRIP_RESTORES_MIN));
    supplies.add(ITEM_BLOOD_RUNE, TRIP_BLOOD_RUNES);
    supplies.add(ITEM_DEATH_RUNE, TRIP_DEATH_RUNES);
    supplies.add(ITEM_WATER_RUNE, TRIP_WATER_RUNES);

    let loadout = &participant.blowpipe;
    let (dart, darts) = loadout.dart.as_deref().map_or(
        (ITEM_FALLBACK_DART, BLOWPIPE_DARTS_NEEDED),
        |dart| (dart, loadout.dart_quantity.min(BLOWPIPE_DARTS_NEEDED)),
    );
    let mut blowpipe = ItemBank::new().with(dart, darts);
    if let Some(ammo) = &participant.setups.range.ammo {
        blowpipe.add(&ammo.item, RANGE_AMMO_NEEDED);
    }

    TripCost {
        supplies,
        blowpipe,
        helm_charges,
    }
}
