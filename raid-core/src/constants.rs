//! Centralized balance and tuning constants for the raid engine.
//!
//! These values define the deterministic math for the simulation. Loot
//! tables live in [`crate::loot::LootConfig`] so they can be tuned per
//! encounter; everything here changes only through reviewed code.

// Team bounds ----------------------------------------------------------------
pub const MIN_TEAM_SIZE: usize = 1;
pub const MAX_TEAM_SIZE: usize = 8;
/// Team size the base durations are balanced around.
pub(crate) const NOMINAL_TEAM_SIZE: usize = 5;
/// Teams larger than this drop their slowest member from the speed average.
pub(crate) const WORST_CONTRIBUTOR_DROP_MIN_SIZE: usize = 3;

// Time -------------------------------------------------------------------------
pub const MINUTE_MS: u64 = 60_000;
pub const HOUR_MS: u64 = 60 * MINUTE_MS;
pub(crate) const DURATION_FLOOR_MS: u64 = 20 * MINUTE_MS;
pub(crate) const UNDERSIZED_TEAM_PENALTY_MS: f64 = 1.3 * 60_000.0;
pub(crate) const DURATION_VARIATION_PERCENT: f64 = 5.0;

// Speed reductions -------------------------------------------------------------
pub(crate) const SPEED_REDUCTION_FOR_GEAR: f64 = 16.0;
pub(crate) const SPEED_REDUCTION_FOR_EXPERIENCE: f64 = 40.0;
pub(crate) const EXPERIENCE_ATTEMPTS_SCALING_CAP: u32 = 350;
pub(crate) const EXPERIENCE_ATTEMPTS_FOR_MAX: f64 = 400.0;
pub(crate) const EXPERIENCE_CURVE_CAP: f64 = 30.0;
pub(crate) const EXPERIENCE_CURVE_FACTOR: f64 = 0.6;

// Effectiveness ------------------------------------------------------------------
pub(crate) const REFERENCE_MELEE_SWITCH_LEVEL: u16 = 300;
pub(crate) const EFFECTIVENESS_COUNTER_FOR_MAX: f64 = 20.0;
pub(crate) const EFFECTIVENESS_RANDOM_MIN: u32 = 50;
pub(crate) const EFFECTIVENESS_RANDOM_MAX: u32 = 100;
pub(crate) const MAX_SKILL_LEVEL: f64 = 99.0;

// Points -------------------------------------------------------------------------
pub(crate) const STAGE_POINT_VALUE: f64 = 20_000.0;
pub(crate) const MIN_POINTS: u32 = 1;
pub(crate) const MAX_POINTS: u32 = 64_000;
pub(crate) const FILLER_POINT_CAP: u32 = 60_000;
pub(crate) const CONSOLATION_POINT_THRESHOLD: u32 = 1_500;

// Loot curves --------------------------------------------------------------------
pub(crate) const LOOT_CURVE_PRIMARY_LEVEL_CAP: u16 = 400;
pub(crate) const LOOT_CURVE_SECONDARY_LEVEL_SPAN: u16 = 150;
pub(crate) const UNIQUE_POINTS_BASE: f64 = 10_500.0;
pub(crate) const UNIQUE_POINTS_PER_LEVEL: f64 = 20.0;
pub(crate) const PET_POINTS_BASE: f64 = 350_000.0;
pub(crate) const PET_POINTS_PER_LEVEL: f64 = 700.0;
pub(crate) const CHANCE_HARD_CAP_PERCENT: f64 = 55.0;
pub(crate) const FILLER_DRAWS: usize = 3;
pub(crate) const PITY_COMPLETIONS_PER_ROLL: u32 = 5;
pub(crate) const PITY_MAX_ROLLS: u32 = 3;

// Requirements -------------------------------------------------------------------
pub(crate) const MIN_STYLE_SCORE: f64 = 25.0;
pub(crate) const MIN_SKILL_LEVEL: u8 = 90;
pub(crate) const BLOWPIPE_DARTS_NEEDED: u32 = 150;
pub(crate) const BLOWPIPE_SCALES_NEEDED: u32 = 1_000;
pub(crate) const RANGE_AMMO_NEEDED: u32 = 150;
pub(crate) const HELM_CHARGES_PER_HOUR: u64 = 600;
pub(crate) const SMALL_TEAM_KC_MAX_SIZE: usize = 2;
pub(crate) const SMALL_TEAM_KC_MIN_LEVEL: u16 = 200;
pub(crate) const SMALL_TEAM_KC_LEVEL_DIVISOR: f64 = 10.0;

// Item names ---------------------------------------------------------------------
pub(crate) const ITEM_BLOWPIPE: &str = "Toxic blowpipe";
pub(crate) const ITEM_SERPENTINE_HELM: &str = "Serpentine helm";
pub(crate) const ITEM_SANFEW: &str = "Sanfew serum(4)";
pub(crate) const ITEM_BREW: &str = "Saradomin brew(4)";
pub(crate) const ITEM_RESTORE: &str = "Super restore(4)";
pub(crate) const ITEM_RUNE_POUCH: &str = "Rune pouch";
pub(crate) const ITEM_SUPER_COMBAT: &str = "Super combat potion(4)";
pub(crate) const ITEM_RANGING_POTION: &str = "Ranging potion(4)";
pub(crate) const ITEM_BLOOD_RUNE: &str = "Blood rune";
pub(crate) const ITEM_DEATH_RUNE: &str = "Death rune";
pub(crate) const ITEM_WATER_RUNE: &str = "Water rune";
pub(crate) const ITEM_FALLBACK_DART: &str = "Rune dart";

pub(crate) const ALLOWED_DARTS: [&str; 4] = ["Adamant dart", "Rune dart", "Amethyst dart", "Dragon dart"];
pub(crate) const REQUIRED_ARROWS: [&str; 4] =
    ["Dragon arrow", "Amethyst arrow", "Rune arrow", "Adamant arrow"];
pub(crate) const REQUIRED_RANGE_WEAPONS: [&str; 3] =
    ["Dragon crossbow", "Armadyl crossbow", "Zaryte crossbow"];
pub(crate) const MELEE_REQUIRED_WEAPONS: [&str; 3] =
    ["Zamorakian hasta", "Ghrazi rapier", "Osmumten's fang"];
pub(crate) const MELEE_REQUIRED_ARMOUR: [&str; 2] = ["Fire cape", "Infernal cape"];

// Trip costs -------------------------------------------------------------------
pub(crate) const TRIP_BLOOD_RUNES: u32 = 110;
pub(crate) const TRIP_DEATH_RUNES: u32 = 100;
pub(crate) const TRIP_WATER_RUNES: u32 = 800;
pub(crate) const TRIP_BREWS_MAX: u32 = 9;
pub(crate) const TRIP_BREW_KC_STEP: f64 = 12.0;
pub(crate) const TRIP_RESTORES_MIN: u32 = 2;
