//! Default loot tables.
use serde::{Deserialize, Serialize};

/// A jackpot item with its draw weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueEntry {
    pub item: String,
    pub weight: u32,
    /// Below this tier level the drop may be downgraded to a pity roll.
    #[serde(default)]
    pub downgrade_below: u16,
}

/// Rare untradeable item rolled once in `drop_rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PityEntry {
    pub item: String,
    pub drop_rate: u32,
}

/// Common drop. Quantity is `ceil(points / divisor)`, or 1 without a divisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillerEntry {
    pub item: String,
    #[serde(default)]
    pub divisor: Option<u32>,
}

/// Cosmetic reward unlocked by flawless runs from `min_level` upwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmeticKit {
    pub item: String,
    pub min_level: u16,
}

fn unique(item: &str, weight: u32, downgrade_below: u16) -> UniqueEntry {
    UniqueEntry {
        item: item.to_string(),
        weight,
        downgrade_below,
    }
}

pub(crate) fn default_uniques() -> Vec<UniqueEntry> {
    vec![
        unique("Lightbearer", 7, 50),
        unique("Osmumten's fang", 7, 50),
        unique("Elidinis' ward", 3, 150),
        unique("Masori mask", 2, 150),
        unique("Masori body", 2, 150),
        unique("Masori chaps", 2, 150),
        unique("Tumeken's shadow (uncharged)", 1, 150),
    ]
}

pub(crate) fn default_pity_items() -> Vec<PityEntry> {
    [
        ("Thread of elidinis", 10),
        ("Eye of the corruptor", 60),
        ("Jewel of the sun", 60),
        ("Breach of the scarab", 60),
    ]
    .into_iter()
    .map(|(item, drop_rate)| PityEntry {
        item: item.to_string(),
        drop_rate,
    })
    .collect()
}

const FILLER: [(&str, Option<u32>); 27] = [
    ("Coins", Some(1)),
    ("Death rune", Some(20)),
    ("Soul rune", Some(40)),
    ("Gold ore", Some(90)),
    ("Dragon dart tip", Some(100)),
    ("Mahogany logs", Some(180)),
    ("Sapphire", Some(200)),
    ("Emerald", Some(250)),
    ("Gold bar", Some(250)),
    ("Potato cactus", Some(250)),
    ("Raw shark", Some(250)),
    ("Ruby", Some(300)),
    ("Diamond", Some(400)),
    ("Raw manta ray", Some(450)),
    ("Cactus spine", Some(600)),
    ("Dragonstone", Some(600)),
    ("Battlestaff", Some(1_100)),
    ("Coconut milk", Some(1_100)),
    ("Lily of the sands", Some(1_100)),
    ("Toadflax seed", Some(1_400)),
    ("Ranarr seed", Some(1_800)),
    ("Torstol seed", Some(2_200)),
    ("Snapdragon seed", Some(2_200)),
    ("Dragon med helm", Some(4_000)),
    ("Magic seed", Some(6_500)),
    ("Blood essence", Some(7_500)),
    ("Cache of runes", None),
];

pub(crate) fn default_filler() -> Vec<FillerEntry> {
    FILLER
        .iter()
        .map(|(item, divisor)| FillerEntry {
            item: (*item).to_string(),
            divisor: *divisor,
        })
        .collect()
}

pub(crate) fn default_cosmetic_kits() -> Vec<CosmeticKit> {
    [
        ("Cursed phalanx", 500),
        ("Menaphite ornament kit", 425),
        ("Masori crafting kit", 350),
    ]
    .into_iter()
    .map(|(item, min_level)| CosmeticKit {
        item: item.to_string(),
        min_level,
    })
    .collect()
}

pub(crate) fn default_transmog_items() -> Vec<String> {
    [
        "Remnant of zebak",
        "Ancient remnant",
        "Remnant of kephri",
        "Remnant of ba-ba",
        "Remnant of akkha",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
