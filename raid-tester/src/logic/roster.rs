use anyhow::{Context, Result, bail};
use raid_core::{
    BlowpipeLoadout, CombatStyle, DifficultyTier, EquippedAmmo, GearSetup, GearSetups, ItemBank,
    Participant, Skill, StatVector, reference_loadout,
};
use serde::Deserialize;
use std::collections::BTreeSet;

const ARCHETYPES_JSON: &str = include_str!("../../assets/archetypes.json");
const ROSTERS_JSON: &str = include_str!("../../assets/rosters.json");

/// Reference tier the archetype stats are scaled from.
const REFERENCE_TIER: DifficultyTier = DifficultyTier::L600;
const HELM_CHARGES: u32 = 20_000;

/// Template describing one kind of participant.
#[derive(Debug, Clone, Deserialize)]
pub struct Archetype {
    pub key: String,
    pub description: String,
    /// Share of the reference loadout each stat reaches.
    pub gear_factor: f64,
    pub skill_level: u8,
    pub completions: u32,
    pub attempts: u32,
    pub melee_weapon: String,
    pub melee_cape: String,
    pub range_weapon: String,
    pub arrows: String,
    pub dart: String,
    #[serde(default)]
    pub serpentine_helm: bool,
}

impl Archetype {
    fn scaled_stats(&self, style: CombatStyle) -> StatVector {
        StatVector::new(
            reference_loadout(style, REFERENCE_TIER)
                .iter()
                .map(|(dim, value)| (dim, (value * self.gear_factor).round())),
        )
    }

    fn setup(&self, style: CombatStyle, equipped: &[&str]) -> GearSetup {
        GearSetup {
            stats: self.scaled_stats(style),
            equipped: equipped.iter().map(|item| (*item).to_string()).collect(),
            ammo: None,
        }
    }

    /// Build a participant with the given id from this template.
    pub fn build(&self, id: &str) -> Participant {
        let mut melee_items = vec![self.melee_weapon.as_str(), self.melee_cape.as_str()];
        if self.serpentine_helm {
            melee_items.push("Serpentine helm");
        }
        let mut range = self.setup(CombatStyle::Range, &[self.range_weapon.as_str()]);
        range.ammo = Some(EquippedAmmo {
            item: self.arrows.clone(),
            quantity: 2_000,
        });

        let mut bank = ItemBank::new()
            .with("Toxic blowpipe", 1)
            .with("Saradomin brew(4)", 100)
            .with("Super restore(4)", 50)
            .with("Rune pouch", 1)
            .with("Super combat potion(4)", 10)
            .with("Ranging potion(4)", 10)
            .with("Blood rune", 5_000)
            .with("Death rune", 5_000)
            .with("Water rune", 50_000);
        if !self.serpentine_helm {
            bank.add("Sanfew serum(4)", 20);
        }

        let mut participant = Participant::new(id);
        participant.setups = GearSetups {
            melee: self.setup(CombatStyle::Melee, &melee_items),
            range,
            mage: self.setup(CombatStyle::Mage, &["Tumeken's shadow"]),
        };
        participant.skills = Skill::ALL
            .iter()
            .map(|skill| (*skill, self.skill_level))
            .collect();
        participant.bank = bank;
        participant.blowpipe = BlowpipeLoadout {
            dart: Some(self.dart.clone()),
            dart_quantity: 5_000,
            scales: 20_000,
        };
        participant.helm_charges = if self.serpentine_helm { HELM_CHARGES } else { 0 };
        participant.completions = self.completions;
        participant.attempts = self.attempts;
        participant
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RosterMember {
    pub archetype: String,
    pub count: usize,
}

/// A named team composition.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterSpec {
    pub key: String,
    pub description: String,
    pub members: Vec<RosterMember>,
}

/// Archetypes and rosters bundled with the tester.
#[derive(Debug, Clone)]
pub struct RosterCatalog {
    archetypes: Vec<Archetype>,
    rosters: Vec<RosterSpec>,
}

impl RosterCatalog {
    /// Load the bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled JSON is malformed or a roster names
    /// an unknown archetype.
    pub fn load_default() -> Result<Self> {
        let archetypes: Vec<Archetype> =
            serde_json::from_str(ARCHETYPES_JSON).context("parsing archetypes.json")?;
        let rosters: Vec<RosterSpec> =
            serde_json::from_str(ROSTERS_JSON).context("parsing rosters.json")?;
        let catalog = Self {
            archetypes,
            rosters,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        let mut keys = BTreeSet::new();
        for roster in &self.rosters {
            if !keys.insert(roster.key.as_str()) {
                bail!("duplicate roster key: {}", roster.key);
            }
            for member in &roster.members {
                if self.archetype(&member.archetype).is_none() {
                    bail!(
                        "roster {} references unknown archetype {}",
                        roster.key,
                        member.archetype
                    );
                }
            }
        }
        Ok(())
    }

    pub fn archetype(&self, key: &str) -> Option<&Archetype> {
        self.archetypes.iter().find(|archetype| archetype.key == key)
    }

    pub fn rosters(&self) -> &[RosterSpec] {
        &self.rosters
    }

    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// Expand roster keys, honouring the `all` keyword.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown roster key.
    pub fn select(&self, keys: &[String]) -> Result<Vec<&RosterSpec>> {
        if keys.iter().any(|key| key.eq_ignore_ascii_case("all")) {
            return Ok(self.rosters.iter().collect());
        }
        keys.iter()
            .map(|key| {
                self.rosters
                    .iter()
                    .find(|roster| roster.key == *key)
                    .with_context(|| format!("unknown roster: {key}"))
            })
            .collect()
    }

    /// Build the participants for a roster with stable, unique ids.
    ///
    /// # Errors
    ///
    /// Returns an error if a member names an unknown archetype.
    pub fn build(&self, roster: &RosterSpec) -> Result<Vec<Participant>> {
        let mut team = Vec::new();
        for member in &roster.members {
            let archetype = self
                .archetype(&member.archetype)
                .with_context(|| format!("unknown archetype: {}", member.archetype))?;
            for idx in 0..member.count {
                let id = format!("{}-{}", archetype.key, idx + 1);
                team.push(archetype.build(&id));
            }
        }
        Ok(team)
    }
}
