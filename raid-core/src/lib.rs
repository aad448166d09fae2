//! Raid Outcome Engine
//!
//! Platform-agnostic simulation core for a tiered cooperative raid: the
//! requirement gate, gear effectiveness scoring, duration and failure
//! simulation, and loot distribution. The crate performs no I/O; randomness
//! is injected through [`RngProvider`].

pub mod constants;
pub mod duration;
pub mod encounter;
pub mod error;
pub mod failure;
pub mod gate;
pub mod items;
pub mod loot;
pub mod numbers;
pub mod participant;
pub mod reference;
pub mod rng;
pub mod scoring;
pub mod stages;
pub mod stats;
pub mod supplies;
pub mod tier;
pub mod weighted;

// Re-export commonly used types
pub use duration::{aggregate_team_reduction, participant_speed_change, trip_duration_ms};
pub use encounter::{
    EncounterOptions, EncounterOutcome, EncounterResult, run_encounter, run_encounter_with,
    simulate,
};
pub use error::{ConfigError, RaidError};
pub use failure::{DeathChanceRow, FailedStages, death_chance, death_chance_table};
pub use gate::{
    ActivityLookup, ChecklistEntry, GateVerdict, NoActiveRuns, RequirementRule, RuleContext,
    check_participant, check_team, requirement_checklist,
};
pub use items::ItemBank;
pub use loot::{LootConfig, LootOutcome, distribute_loot};
pub use participant::{
    BlowpipeLoadout, EquippedAmmo, GearSetup, GearSetups, Participant, ParticipantId, Skill,
};
pub use reference::reference_loadout;
pub use rng::{CountingRng, EntropyRngProvider, RngProvider, SeededRngProvider, StreamDomain};
pub use scoring::{EffectivenessScore, score_gear, score_setup};
pub use stages::{STAGES, Stage};
pub use stats::{CombatStyle, StatDimension, StatVector};
pub use supplies::{TripCost, trip_cost};
pub use tier::DifficultyTier;
pub use weighted::{WeightedTable, pick_by_weight};

/// Raid engine bundling the busy lookup and validated loot tables.
pub struct RaidEngine<A>
where
    A: ActivityLookup,
{
    activities: A,
    loot_config: LootConfig,
}

impl<A> RaidEngine<A>
where
    A: ActivityLookup,
{
    /// Create an engine with the default loot tables.
    pub fn new(activities: A) -> Self {
        Self {
            activities,
            loot_config: LootConfig::default(),
        }
    }

    /// Create an engine with custom loot tables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the tables fail validation.
    pub fn with_loot_config(activities: A, loot_config: LootConfig) -> Result<Self, ConfigError> {
        loot_config.validate()?;
        Ok(Self {
            activities,
            loot_config,
        })
    }

    #[must_use]
    pub const fn loot_config(&self) -> &LootConfig {
        &self.loot_config
    }

    /// Gate a roster without simulating it.
    ///
    /// # Errors
    ///
    /// Returns `RaidError` if a member's gear cannot be scored.
    pub fn check(
        &self,
        team: &[Participant],
        tier: DifficultyTier,
    ) -> Result<GateVerdict, RaidError> {
        check_team(team, tier, &self.activities)
    }

    /// Gate and, when eligible, simulate one run.
    ///
    /// # Errors
    ///
    /// Returns `RaidError` for contract violations only.
    pub fn run<P: RngProvider>(
        &self,
        team: &[Participant],
        tier: DifficultyTier,
        options: EncounterOptions,
        provider: &mut P,
    ) -> Result<EncounterResult, RaidError> {
        run_encounter_with(
            team,
            tier,
            options,
            &self.activities,
            &self.loot_config,
            provider,
        )
    }
}
