//! End-to-end encounter: gate, score, simulate, distribute.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::constants::{MAX_TEAM_SIZE, MIN_TEAM_SIZE};
use crate::duration::{aggregate_team_reduction, participant_speed_change, trip_duration_ms};
use crate::error::RaidError;
use crate::failure::{FailedStages, StageEntrant, run_team_stages, truncated_duration_ms};
use crate::gate::{ActivityLookup, NoActiveRuns, check_team};
use crate::items::ItemBank;
use crate::loot::{LootConfig, LootMember, distribute_loot};
use crate::numbers::{round_to, usize_to_f64};
use crate::participant::{Participant, ParticipantId};
use crate::rng::{RngProvider, StreamDomain};
use crate::scoring::{EffectivenessScore, overall_effectiveness, score_gear};
use crate::stages::stage_by_id;
use crate::supplies::{TripCost, trip_cost};
use crate::tier::DifficultyTier;

/// Caller switches for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterOptions {
    /// Skip the duration variation and randomized wipe share.
    #[serde(default)]
    pub disable_variation: bool,
}

/// Everything produced by a run that passed the gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncounterOutcome {
    pub tier: DifficultyTier,
    /// Time actually spent, truncated when the team wiped.
    pub duration_ms: u64,
    /// Time the full run would have taken.
    pub full_duration_ms: u64,
    pub wiped_stage_id: Option<u8>,
    pub team_reduction: f64,
    pub per_participant_scores: BTreeMap<ParticipantId, EffectivenessScore>,
    pub per_participant_points: BTreeMap<ParticipantId, u32>,
    pub per_participant_failed_stages: BTreeMap<ParticipantId, FailedStages>,
    /// Each member's share of the team reduction, in percent.
    pub per_participant_reduction: BTreeMap<ParticipantId, f64>,
    pub per_participant_loot: BTreeMap<ParticipantId, ItemBank>,
    pub per_participant_cost: BTreeMap<ParticipantId, TripCost>,
    pub team_bonus_items: Vec<String>,
    pub narrative_messages: Vec<String>,
    pub unique_chance: f64,
    pub unique_recipient: Option<ParticipantId>,
}

impl EncounterOutcome {
    #[must_use]
    pub const fn wiped(&self) -> bool {
        self.wiped_stage_id.is_some()
    }

    /// True when nobody failed a single stage.
    #[must_use]
    pub fn flawless(&self) -> bool {
        self.per_participant_failed_stages
            .values()
            .all(|stages| stages.is_empty())
    }
}

/// Result of [`run_encounter`]: either the gate's reasons or a full outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EncounterResult {
    Ineligible { reasons: Vec<String> },
    Completed(Box<EncounterOutcome>),
}

impl EncounterResult {
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&EncounterOutcome> {
        match self {
            Self::Completed(outcome) => Some(outcome.as_ref()),
            Self::Ineligible { .. } => None,
        }
    }
}

/// Run one encounter with the default loot tables and no busy tracking.
///
/// # Errors
///
/// Returns `RaidError` only for contract violations; an ineligible team is
/// reported as [`EncounterResult::Ineligible`].
pub fn run_encounter<P: RngProvider>(
    team: &[Participant],
    tier: DifficultyTier,
    options: EncounterOptions,
    provider: &mut P,
) -> Result<EncounterResult, RaidError> {
    run_encounter_with(
        team,
        tier,
        options,
        &NoActiveRuns,
        &LootConfig::default(),
        provider,
    )
}

/// Run one encounter with an explicit busy lookup and loot tables.
///
/// # Errors
///
/// Returns `RaidError` only for contract violations.
pub fn run_encounter_with<A, P>(
    team: &[Participant],
    tier: DifficultyTier,
    options: EncounterOptions,
    lookup: &A,
    loot_config: &LootConfig,
    provider: &mut P,
) -> Result<EncounterResult, RaidError>
where
    A: ActivityLookup + ?Sized,
    P: RngProvider,
{
    let verdict = check_team(team, tier, lookup)?;
    if !verdict.eligible {
        return Ok(EncounterResult::Ineligible {
            reasons: verdict.reasons,
        });
    }
    simulate(team, tier, options, loot_config, provider)
        .map(|outcome| EncounterResult::Completed(Box::new(outcome)))
}

fn validate_roster(team: &[Participant]) -> Result<(), RaidError> {
    if !(MIN_TEAM_SIZE..=MAX_TEAM_SIZE).contains(&team.len()) {
        return Err(RaidError::TeamSize { size: team.len() });
    }
    let mut seen = HashSet::new();
    for participant in team {
        if !seen.insert(participant.id.as_str()) {
            return Err(RaidError::DuplicateParticipant {
                id: participant.id.to_string(),
            });
        }
    }
    Ok(())
}

struct MemberProfile {
    score: EffectivenessScore,
    speed_change: f64,
}

fn prepare_member<P: RngProvider>(
    participant: &Participant,
    tier: DifficultyTier,
    provider: &mut P,
) -> Result<(MemberProfile, StageEntrant<P::Stream>), RaidError> {
    let score = score_gear(&participant.setups, tier)?;
    let mut effectiveness_rng =
        provider.participant_stream(StreamDomain::Effectiveness, &participant.id);
    let effectiveness = overall_effectiveness(participant, &score, Some(&mut effectiveness_rng))?;
    log::trace!("{}: effectiveness {effectiveness:.1}", participant.id);
    let entrant = StageEntrant {
        effectiveness,
        attempts: participant.attempts,
        rng: provider.participant_stream(StreamDomain::Stages, &participant.id),
    };
    let profile = MemberProfile {
        score,
        speed_change: participant_speed_change(participant, score.total, tier),
    };
    Ok((profile, entrant))
}

/// Simulate an already-gated team.
///
/// # Errors
///
/// Returns `RaidError` for an invalid roster or out-of-range scores.
pub fn simulate<P: RngProvider>(
    team: &[Participant],
    tier: DifficultyTier,
    options: EncounterOptions,
    loot_config: &LootConfig,
    provider: &mut P,
) -> Result<EncounterOutcome, RaidError> {
    validate_roster(team)?;
    let (profiles, mut entrants): (Vec<_>, Vec<_>) = team
        .iter()
        .map(|participant| prepare_member(participant, tier, &mut *provider))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .unzip();
    let stages = run_team_stages(&mut entrants, tier);
    let wiped_stage_id = stages.wiped_stage;

    let changes: Vec<f64> = profiles.iter().map(|profile| profile.speed_change).collect();
    let team_reduction = aggregate_team_reduction(&changes);
    let mut duration_rng = provider.team_stream(StreamDomain::Duration);
    let full_duration_ms = if options.disable_variation {
        trip_duration_ms::<P::Stream>(tier, team.len(), team_reduction, None)?
    } else {
        trip_duration_ms(tier, team.len(), team_reduction, Some(&mut duration_rng))?
    };

    let duration_ms = match wiped_stage_id {
        Some(stage) if options.disable_variation => {
            truncated_duration_ms::<P::Stream>(full_duration_ms, stage, None)
        }
        Some(stage) => truncated_duration_ms(full_duration_ms, stage, Some(&mut duration_rng)),
        None => full_duration_ms,
    };

    let team_size = usize_to_f64(team.len());
    let mut outcome = EncounterOutcome {
        tier,
        duration_ms,
        full_duration_ms,
        wiped_stage_id,
        team_reduction,
        per_participant_scores: BTreeMap::new(),
        per_participant_points: BTreeMap::new(),
        per_participant_failed_stages: BTreeMap::new(),
        per_participant_reduction: BTreeMap::new(),
        per_participant_loot: BTreeMap::new(),
        per_participant_cost: BTreeMap::new(),
        team_bonus_items: Vec::new(),
        narrative_messages: Vec::new(),
        unique_chance: 0.0,
        unique_recipient: None,
    };
    for ((participant, profile), run) in team.iter().zip(&profiles).zip(&stages.runs) {
        log::trace!(
            "{}: points {}, failed {:?}",
            participant.id,
            run.points,
            run.failed_stages
        );
        let id = participant.id.clone();
        outcome.per_participant_scores.insert(id.clone(), profile.score);
        outcome.per_participant_points.insert(id.clone(), run.points);
        outcome
            .per_participant_failed_stages
            .insert(id.clone(), run.failed_stages.clone());
        outcome
            .per_participant_reduction
            .insert(id.clone(), round_to(profile.speed_change / team_size, 1));
        outcome
            .per_participant_cost
            .insert(id, trip_cost(participant, full_duration_ms));
    }

    if let Some(stage) = wiped_stage_id.and_then(stage_by_id) {
        log::debug!("team wiped at stage {} ({})", stage.id, stage.name);
        outcome
            .narrative_messages
            .push(format!("Your team wiped in the {} room.", stage.name));
        return Ok(outcome);
    }

    let members: Vec<LootMember<'_>> = team
        .iter()
        .zip(&stages.runs)
        .map(|(participant, run)| LootMember {
            id: &participant.id,
            points: run.points,
            completions: participant.completions,
            collection_log: &participant.collection_log,
            failed_any_stage: !run.failed_stages.is_empty(),
        })
        .collect();
    let loot = distribute_loot(&members, tier, loot_config, provider);
    outcome.per_participant_loot = loot.per_participant_loot;
    outcome.team_bonus_items = loot.team_bonus_items;
    outcome.narrative_messages = loot.messages;
    outcome.unique_chance = loot.unique_chance;
    outcome.unique_recipient = loot.unique_recipient;
    Ok(outcome)
}
