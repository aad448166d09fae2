//! Loot distribution: jackpot unique, pity rolls, filler, pet and the
//! flawless-run team bonus.
pub mod tables;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{
    CHANCE_HARD_CAP_PERCENT, CONSOLATION_POINT_THRESHOLD, FILLER_DRAWS, FILLER_POINT_CAP,
    LOOT_CURVE_PRIMARY_LEVEL_CAP, LOOT_CURVE_SECONDARY_LEVEL_SPAN, MIN_POINTS, PET_POINTS_BASE,
    PET_POINTS_PER_LEVEL, PITY_COMPLETIONS_PER_ROLL, PITY_MAX_ROLLS, UNIQUE_POINTS_BASE,
    UNIQUE_POINTS_PER_LEVEL,
};
use crate::error::ConfigError;
use crate::items::ItemBank;
use crate::numbers::{ceil_f64_to_u32, u64_to_f64};
use crate::participant::ParticipantId;
use crate::rng::{RngProvider, StreamDomain, one_in, percent_chance};
use crate::tier::DifficultyTier;
use crate::weighted::{WeightedTable, pick_by_weight};

pub use tables::{CosmeticKit, FillerEntry, PityEntry, UniqueEntry};

/// Tunable loot tables for one encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootConfig {
    #[serde(default = "tables::default_uniques")]
    pub uniques: Vec<UniqueEntry>,
    /// Percent chance a unique below its tier threshold becomes a pity roll.
    #[serde(default = "LootConfig::default_downgrade_chance")]
    pub downgrade_chance: u8,
    #[serde(default = "tables::default_pity_items")]
    pub pity_items: Vec<PityEntry>,
    #[serde(default = "tables::default_filler")]
    pub filler: Vec<FillerEntry>,
    #[serde(default = "LootConfig::default_consolation_item")]
    pub consolation_item: String,
    /// Flawless-run kits; the highest unlocked one is awarded.
    #[serde(default = "tables::default_cosmetic_kits")]
    pub cosmetic_kits: Vec<CosmeticKit>,
    #[serde(default = "tables::default_transmog_items")]
    pub transmog_items: Vec<String>,
    #[serde(default = "LootConfig::default_transmog_min_level")]
    pub transmog_min_level: u16,
    #[serde(default = "LootConfig::default_transmog_one_in")]
    pub transmog_one_in: u32,
    #[serde(default = "LootConfig::default_pet_item")]
    pub pet_item: String,
}

impl LootConfig {
    const fn default_downgrade_chance() -> u8 {
        50
    }

    fn default_consolation_item() -> String {
        String::from("Fossilised dung")
    }

    const fn default_transmog_min_level() -> u16 {
        450
    }

    const fn default_transmog_one_in() -> u32 {
        3
    }

    fn default_pet_item() -> String {
        String::from("Tumeken's guardian")
    }

    /// Validate table invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for empty tables, zero weights or drop rates,
    /// and out-of-range chances.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_uniques()?;
        self.validate_pity_items()?;
        self.validate_filler()?;
        if self.downgrade_chance > 100 {
            return Err(ConfigError::DowngradeChance {
                value: self.downgrade_chance,
            });
        }
        if self.transmog_one_in == 0 {
            return Err(ConfigError::TransmogChance);
        }
        Ok(())
    }

    fn validate_uniques(&self) -> Result<(), ConfigError> {
        if self.uniques.is_empty() {
            return Err(ConfigError::EmptyTable { table: "unique" });
        }
        if let Some(entry) = self.uniques.iter().find(|entry| entry.weight == 0) {
            return Err(ConfigError::ZeroWeight {
                table: "unique",
                item: entry.item.clone(),
            });
        }
        Ok(())
    }

    fn validate_pity_items(&self) -> Result<(), ConfigError> {
        if let Some(entry) = self.pity_items.iter().find(|entry| entry.drop_rate == 0) {
            return Err(ConfigError::ZeroDivisor {
                table: "pity",
                item: entry.item.clone(),
            });
        }
        Ok(())
    }

    fn validate_filler(&self) -> Result<(), ConfigError> {
        if self.filler.is_empty() {
            return Err(ConfigError::EmptyTable { table: "filler" });
        }
        if let Some(entry) = self.filler.iter().find(|entry| entry.divisor == Some(0)) {
            return Err(ConfigError::ZeroDivisor {
                table: "filler",
                item: entry.item.clone(),
            });
        }
        Ok(())
    }

    fn unique_table(&self) -> WeightedTable<&UniqueEntry> {
        self.uniques
            .iter()
            .fold(WeightedTable::new(), |table, entry| table.with(entry, entry.weight))
    }
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            uniques: tables::default_uniques(),
            downgrade_chance: Self::default_downgrade_chance(),
            pity_items: tables::default_pity_items(),
            filler: tables::default_filler(),
            consolation_item: Self::default_consolation_item(),
            cosmetic_kits: tables::default_cosmetic_kits(),
            transmog_items: tables::default_transmog_items(),
            transmog_min_level: Self::default_transmog_min_level(),
            transmog_one_in: Self::default_transmog_one_in(),
            pet_item: Self::default_pet_item(),
        }
    }
}

/// Tier levels feeding the loot curves: up to 400 counts fully, the next
/// 150 count a third.
fn curve_levels(tier: DifficultyTier) -> f64 {
    let level = tier.level();
    let primary = level.min(LOOT_CURVE_PRIMARY_LEVEL_CAP);
    let secondary = level
        .saturating_sub(LOOT_CURVE_PRIMARY_LEVEL_CAP)
        .min(LOOT_CURVE_SECONDARY_LEVEL_SPAN);
    f64::from(primary) + f64::from(secondary) / 3.0
}

/// Team chance in percent that one unique drops.
#[must_use]
pub fn unique_chance(team_points: u64, tier: DifficultyTier) -> f64 {
    let points_per_percent = UNIQUE_POINTS_BASE - UNIQUE_POINTS_PER_LEVEL * curve_levels(tier);
    (u64_to_f64(team_points) / points_per_percent).min(CHANCE_HARD_CAP_PERCENT)
}

/// Per-participant pet chance in percent.
#[must_use]
pub fn pet_chance(points: u32, tier: DifficultyTier) -> f64 {
    let points_per_percent = PET_POINTS_BASE - PET_POINTS_PER_LEVEL * curve_levels(tier);
    (f64::from(points) / points_per_percent).min(CHANCE_HARD_CAP_PERCENT)
}

/// Choose the jackpot recipient with probability proportional to points.
pub fn pick_recipient<'a, R: Rng + ?Sized>(
    points: &'a [(ParticipantId, u32)],
    rng: &mut R,
) -> Option<&'a ParticipantId> {
    pick_by_weight(points, rng)
}

/// Rolls granted for a pity item.
///
/// Unowned items earn one roll per five completions, up to three, once
/// completions pass five. Owned items always get exactly one.
#[must_use]
pub fn pity_roll_count(completions: u32, already_owned: bool) -> u32 {
    if already_owned || completions <= PITY_COMPLETIONS_PER_ROLL {
        return 1;
    }
    (completions / PITY_COMPLETIONS_PER_ROLL).min(PITY_MAX_ROLLS)
}

/// Roll every pity item, stopping an item's rolls at its first success.
pub fn roll_pity_items<R: Rng + ?Sized>(
    config: &LootConfig,
    completions: u32,
    collection_log: &ItemBank,
    rng: &mut R,
) -> ItemBank {
    let mut loot = ItemBank::new();
    for entry in &config.pity_items {
        let rolls = pity_roll_count(completions, collection_log.has(&entry.item));
        if (0..rolls).any(|_| one_in(rng, entry.drop_rate)) {
            loot.add(&entry.item, 1);
        }
    }
    loot
}

/// Draw the jackpot unique for its recipient.
///
/// Below an item's downgrade tier the draw may be swapped for a pity roll.
pub fn roll_unique<R: Rng + ?Sized>(
    config: &LootConfig,
    tier: DifficultyTier,
    completions: u32,
    collection_log: &ItemBank,
    rng: &mut R,
) -> ItemBank {
    let table = config.unique_table();
    let Some(entry) = table.roll(rng).copied() else {
        return ItemBank::new();
    };
    if tier.level() < entry.downgrade_below
        && percent_chance(rng, f64::from(config.downgrade_chance))
    {
        log::debug!("{} downgraded to a pity roll at {tier}", entry.item);
        return roll_pity_items(config, completions, collection_log, rng);
    }
    ItemBank::new().with(&entry.item, 1)
}

/// Three independent common drops scaled by points.
pub fn roll_filler<R: Rng + ?Sized>(config: &LootConfig, points: u32, rng: &mut R) -> ItemBank {
    let mut loot = ItemBank::new();
    if config.filler.is_empty() {
        return loot;
    }
    let points = f64::from(points.clamp(MIN_POINTS, FILLER_POINT_CAP));
    for _ in 0..FILLER_DRAWS {
        let entry = &config.filler[rng.gen_range(0..config.filler.len())];
        let quantity = entry
            .divisor
            .map_or(1, |divisor| ceil_f64_to_u32(points / f64::from(divisor)));
        loot.add(&entry.item, quantity);
    }
    loot
}

/// Items every member receives for a run without any failed stage.
pub fn flawless_bonus<R: Rng + ?Sized>(
    config: &LootConfig,
    tier: DifficultyTier,
    rng: &mut R,
) -> Vec<String> {
    let mut items = Vec::new();
    if let Some(kit) = config
        .cosmetic_kits
        .iter()
        .filter(|kit| tier.level() >= kit.min_level)
        .max_by_key(|kit| kit.min_level)
    {
        items.push(kit.item.clone());
    }
    if tier.level() >= config.transmog_min_level
        && !config.transmog_items.is_empty()
        && one_in(rng, config.transmog_one_in)
    {
        let idx = rng.gen_range(0..config.transmog_items.len());
        items.push(config.transmog_items[idx].clone());
    }
    items
}

/// What the distributor needs to know about one participant.
#[derive(Debug, Clone, Copy)]
pub struct LootMember<'a> {
    pub id: &'a ParticipantId,
    pub points: u32,
    pub completions: u32,
    pub collection_log: &'a ItemBank,
    pub failed_any_stage: bool,
}

/// Everything handed out by one distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LootOutcome {
    pub per_participant_loot: BTreeMap<ParticipantId, ItemBank>,
    pub team_bonus_items: Vec<String>,
    pub messages: Vec<String>,
    pub unique_chance: f64,
    pub unique_recipient: Option<ParticipantId>,
}

fn member_loot<R: Rng + ?Sized>(
    config: &LootConfig,
    tier: DifficultyTier,
    member: &LootMember<'_>,
    is_recipient: bool,
    rng: &mut R,
) -> ItemBank {
    if member.points < CONSOLATION_POINT_THRESHOLD {
        return ItemBank::new().with(&config.consolation_item, 1);
    }
    let mut loot = if is_recipient {
        roll_unique(config, tier, member.completions, member.collection_log, rng)
    } else {
        roll_filler(config, member.points, rng)
    };
    loot.add_bank(&roll_pity_items(
        config,
        member.completions,
        member.collection_log,
        rng,
    ));
    if percent_chance(rng, pet_chance(member.points, tier)) {
        loot.add(&config.pet_item, 1);
    }
    loot
}

/// Distribute loot across the team.
pub fn distribute_loot<P: RngProvider>(
    members: &[LootMember<'_>],
    tier: DifficultyTier,
    config: &LootConfig,
    provider: &mut P,
) -> LootOutcome {
    let mut team_rng = provider.team_stream(StreamDomain::TeamLoot);
    let team_points: u64 = members.iter().map(|member| u64::from(member.points)).sum();
    let chance = unique_chance(team_points, tier);
    let unique_recipient = if percent_chance(&mut team_rng, chance) {
        let weights: Vec<(ParticipantId, u32)> = members
            .iter()
            .map(|member| (member.id.clone(), member.points))
            .collect();
        pick_recipient(&weights, &mut team_rng).cloned()
    } else {
        None
    };
    log::debug!(
        "unique chance {chance:.2}% over {team_points} points, recipient {unique_recipient:?}"
    );

    let mut messages = vec![format!(
        "Your team had a {chance:.2}% chance of getting a unique drop."
    )];
    let mut per_participant_loot = BTreeMap::new();
    for member in members {
        let mut rng = provider.participant_stream(StreamDomain::ParticipantLoot, member.id);
        let is_recipient = unique_recipient.as_ref() == Some(member.id);
        let loot = member_loot(config, tier, member, is_recipient, &mut rng);
        per_participant_loot.insert(member.id.clone(), loot);
    }

    let mut team_bonus_items = Vec::new();
    if !members.is_empty() && members.iter().all(|member| !member.failed_any_stage) {
        team_bonus_items = flawless_bonus(config, tier, &mut team_rng);
        if !team_bonus_items.is_empty() {
            for loot in per_participant_loot.values_mut() {
                for item in &team_bonus_items {
                    loot.add(item, 1);
                }
            }
            messages.push(format!(
                "You all received a {} for completing the raid without any deaths!",
                team_bonus_items.join(", ")
            ));
        }
    }

    LootOutcome {
        per_participant_loot,
        team_bonus_items,
        messages,
        unique_chance: chance,
        unique_recipient,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRngProvider;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(LootConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_broken_tables() {
        let mut config = LootConfig::default();
        config.uniques[2].weight = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroWeight {
                table: "unique",
                item: "Elidinis' ward".to_string()
            })
        );

        let mut config = LootConfig::default();
        config.filler.clear();
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyTable { table: "filler" })
        );

        let mut config = LootConfig::default();
        config.downgrade_chance = 101;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DowngradeChance { value: 101 })
        ));
    }

    #[test]
    fn partial_json_falls_back_to_default_tables() {
        let config: LootConfig =
            serde_json::from_str(r#"{"downgrade_chance": 98, "pet_item": "Pet"}"#).unwrap();
        assert_eq!(config.downgrade_chance, 98);
        assert_eq!(config.pet_item, "Pet");
        assert_eq!(config.uniques, LootConfig::default().uniques);
        assert_eq!(config.filler.len(), 27);
    }

    #[test]
    fn unique_chance_follows_the_level_curve() {
        assert!((unique_chance(10_480, DifficultyTier::Entry) - 1.0).abs() < 1e-9);
        assert!((unique_chance(2_500, DifficultyTier::L400) - 1.0).abs() < 1e-9);
        // 500 counts 400 plus a third of 100.
        let threshold = 10_500.0 - 20.0 * (400.0 + 100.0 / 3.0);
        assert!((unique_chance(10_000, DifficultyTier::L500) - 10_000.0 / threshold).abs() < 1e-9);
        assert!((unique_chance(u64::from(u32::MAX), DifficultyTier::L600) - 55.0).abs() < 1e-9);
        assert!(unique_chance(0, DifficultyTier::L600).abs() < f64::EPSILON);
    }

    #[test]
    fn pet_chance_is_capped() {
        assert!((pet_chance(64_000, DifficultyTier::L600) - 64_000.0 / (350_000.0 - 700.0 * 450.0)).abs() < 1e-9);
        assert!(pet_chance(64_000, DifficultyTier::L600) <= 55.0);
    }

    #[test]
    fn pity_rolls_only_scale_for_unowned_items() {
        assert_eq!(pity_roll_count(0, false), 1);
        assert_eq!(pity_roll_count(5, false), 1);
        assert_eq!(pity_roll_count(10, false), 2);
        assert_eq!(pity_roll_count(500, false), 3);
        for completions in [0, 6, 10, 50, 10_000] {
            assert_eq!(pity_roll_count(completions, true), 1);
        }
    }

    #[test]
    fn filler_quantities_scale_with_points() {
        let config = LootConfig {
            filler: vec![FillerEntry {
                item: "Sapphire".to_string(),
                divisor: Some(200),
            }],
            ..LootConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let loot = roll_filler(&config, 10_001, &mut rng);
        assert_eq!(loot.amount("Sapphire"), 3 * 51);

        let capped = roll_filler(&config, 64_000, &mut rng);
        assert_eq!(capped.amount("Sapphire"), 3 * 300);

        let cache = LootConfig {
            filler: vec![FillerEntry {
                item: "Cache of runes".to_string(),
                divisor: None,
            }],
            ..LootConfig::default()
        };
        assert_eq!(roll_filler(&cache, 50_000, &mut rng).amount("Cache of runes"), 3);
    }

    #[test]
    fn downgrade_only_applies_below_threshold() {
        let config = LootConfig {
            uniques: vec![UniqueEntry {
                item: "Masori body".to_string(),
                weight: 1,
                downgrade_below: 150,
            }],
            downgrade_chance: 100,
            pity_items: Vec::new(),
            ..LootConfig::default()
        };
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let log = ItemBank::new();
        assert!(roll_unique(&config, DifficultyTier::L100, 0, &log, &mut rng).is_empty());
        assert_eq!(
            roll_unique(&config, DifficultyTier::L200, 0, &log, &mut rng).amount("Masori body"),
            1
        );
    }

    #[test]
    fn flawless_bonus_picks_highest_kit() {
        let config = LootConfig {
            transmog_one_in: 1,
            ..LootConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(2);
        assert!(flawless_bonus(&config, DifficultyTier::L300, &mut rng).is_empty());
        assert_eq!(
            flawless_bonus(&config, DifficultyTier::L400, &mut rng),
            vec!["Masori crafting kit".to_string()]
        );
        let top = flawless_bonus(&config, DifficultyTier::L500, &mut rng);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0], "Cursed phalanx");
        assert!(config.transmog_items.contains(&top[1]));
    }

    #[test]
    fn flawless_bonus_ignores_kit_order() {
        let mut kits = tables::default_cosmetic_kits();
        kits.reverse();
        let config = LootConfig {
            cosmetic_kits: kits,
            ..LootConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(8);
        assert_eq!(
            flawless_bonus(&config, DifficultyTier::L400, &mut rng),
            vec!["Masori crafting kit".to_string()]
        );
        let top = flawless_bonus(&config, DifficultyTier::L600, &mut rng);
        assert_eq!(top[0], "Cursed phalanx");
    }

    #[test]
    fn low_points_receive_only_consolation() {
        let config = LootConfig::default();
        let id = ParticipantId::new("low");
        let log = ItemBank::new();
        let members = [LootMember {
            id: &id,
            points: 1_499,
            completions: 100,
            collection_log: &log,
            failed_any_stage: true,
        }];
        let outcome = distribute_loot(
            &members,
            DifficultyTier::L300,
            &config,
            &mut SeededRngProvider::new(5),
        );
        assert_eq!(
            outcome.per_participant_loot.get(&id),
            Some(&ItemBank::new().with("Fossilised dung", 1))
        );
        assert!(outcome.team_bonus_items.is_empty());
        assert_eq!(outcome.messages.len(), 1);
        assert!(outcome.messages[0].starts_with("Your team had a "));
    }

    #[test]
    fn flawless_team_shares_bonus_items() {
        let config = LootConfig::default();
        let a = ParticipantId::new("a");
        let b = ParticipantId::new("b");
        let log = ItemBank::new();
        let members = [
            LootMember {
                id: &a,
                points: 20_000,
                completions: 10,
                collection_log: &log,
                failed_any_stage: false,
            },
            LootMember {
                id: &b,
                points: 30_000,
                completions: 10,
                collection_log: &log,
                failed_any_stage: false,
            },
        ];
        let outcome = distribute_loot(
            &members,
            DifficultyTier::L400,
            &config,
            &mut SeededRngProvider::new(77),
        );
        assert_eq!(outcome.team_bonus_items, vec!["Masori crafting kit".to_string()]);
        for id in [&a, &b] {
            assert_eq!(outcome.per_participant_loot[id].amount("Masori crafting kit"), 1);
        }
        assert!(outcome.messages[1].contains("without any deaths"));
    }
}
