//! Requirement gate: per-participant rules and team-level eligibility.
//!
//! Every rule is evaluated and every unmet reason reported; nothing fails
//! fast. Ineligibility is an ordinary verdict, never an error.
pub mod rules;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::constants::{
    HOUR_MS, MAX_TEAM_SIZE, MIN_TEAM_SIZE, SMALL_TEAM_KC_LEVEL_DIVISOR, SMALL_TEAM_KC_MAX_SIZE,
    SMALL_TEAM_KC_MIN_LEVEL,
};
use crate::error::RaidError;
use crate::participant::{Participant, ParticipantId};
use crate::scoring::{EffectivenessScore, score_gear};
use crate::supplies::trip_cost;
use crate::tier::DifficultyTier;

pub use rules::{REQUIREMENT_RULES, minimum_supplies};

/// Inputs a requirement rule may inspect.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub participant: &'a Participant,
    pub score: &'a EffectivenessScore,
}

/// A named eligibility predicate with a human-readable description.
#[derive(Debug, Clone, Copy)]
pub struct RequirementRule {
    pub name: &'static str,
    /// `None` when met, otherwise the reason it is not.
    pub check: fn(&RuleContext<'_>) -> Option<String>,
    pub describe: fn() -> String,
}

/// Result of a gate check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateVerdict {
    pub eligible: bool,
    pub reasons: Vec<String>,
}

impl GateVerdict {
    fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            eligible: reasons.is_empty(),
            reasons,
        }
    }
}

/// One line of the readiness checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistEntry {
    pub name: &'static str,
    pub description: String,
    pub unmet: Option<String>,
}

/// Reports whether a participant is already committed to another activity.
pub trait ActivityLookup {
    fn is_busy(&self, id: &ParticipantId) -> bool;
}

/// Lookup for callers that track no other activities.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoActiveRuns;

impl ActivityLookup for NoActiveRuns {
    fn is_busy(&self, _id: &ParticipantId) -> bool {
        false
    }
}

impl ActivityLookup for BTreeSet<ParticipantId> {
    fn is_busy(&self, id: &ParticipantId) -> bool {
        self.contains(id)
    }
}

impl<A: ActivityLookup + ?Sized> ActivityLookup for &A {
    fn is_busy(&self, id: &ParticipantId) -> bool {
        (**self).is_busy(id)
    }
}

/// Run every requirement rule against one participant.
#[must_use]
pub fn check_participant(participant: &Participant, score: &EffectivenessScore) -> GateVerdict {
    let ctx = RuleContext { participant, score };
    let reasons = REQUIREMENT_RULES
        .iter()
        .filter_map(|rule| (rule.check)(&ctx))
        .collect();
    GateVerdict::from_reasons(reasons)
}

/// Every rule with its description and, when unmet, the reason.
///
/// # Errors
///
/// Returns `RaidError::ScoreOutOfRange` if the gear cannot be scored.
pub fn requirement_checklist(
    participant: &Participant,
    tier: DifficultyTier,
) -> Result<Vec<ChecklistEntry>, RaidError> {
    let score = score_gear(&participant.setups, tier)?;
    let ctx = RuleContext {
        participant,
        score: &score,
    };
    Ok(REQUIREMENT_RULES
        .iter()
        .map(|rule| ChecklistEntry {
            name: rule.name,
            description: (rule.describe)(),
            unmet: (rule.check)(&ctx),
        })
        .collect())
}

/// Completions a member of a small team needs at this tier, if any.
#[must_use]
pub fn small_team_completions_needed(team_size: usize, tier: DifficultyTier) -> Option<f64> {
    if team_size > SMALL_TEAM_KC_MAX_SIZE || tier.level() <= SMALL_TEAM_KC_MIN_LEVEL {
        return None;
    }
    let needed = f64::from(tier.level()) / SMALL_TEAM_KC_LEVEL_DIVISOR;
    Some(if team_size == 2 { needed / 2.0 } else { needed })
}

fn member_reasons(
    participant: &Participant,
    team_size: usize,
    tier: DifficultyTier,
) -> Result<Vec<String>, RaidError> {
    let id = &participant.id;
    let score = score_gear(&participant.setups, tier)?;
    let mut reasons: Vec<String> = check_participant(participant, &score)
        .reasons
        .into_iter()
        .map(|reason| format!("{id}: {reason}"))
        .collect();

    let cost = trip_cost(participant, HOUR_MS);
    let missing = participant.bank.shortfall(&cost.supplies);
    if !missing.is_empty() {
        reasons.push(format!(
            "{id}: doesn't own the required supplies: {missing}"
        ));
    }
    if u64::from(participant.helm_charges) < cost.helm_charges {
        reasons.push(format!(
            "{id}: needs at least {} helm charges for a one hour raid",
            cost.helm_charges
        ));
    }

    if let Some(needed) = small_team_completions_needed(team_size, tier)
        && f64::from(participant.completions) < needed
    {
        let mode = if team_size == 2 { "duo" } else { "solo" };
        reasons.push(format!(
            "{id}: needs at least {needed} completions to {mode} a {tier} raid"
        ));
    }
    Ok(reasons)
}

/// Gate a whole roster.
///
/// Roster size, duplicate ids and busy members are reported alongside every
/// member's own reasons, each prefixed with the member id.
///
/// # Errors
///
/// Returns `RaidError::ScoreOutOfRange` if a member's gear cannot be scored.
pub fn check_team<A: ActivityLookup + ?Sized>(
    team: &[Participant],
    tier: DifficultyTier,
    lookup: &A,
) -> Result<GateVerdict, RaidError> {
    let mut reasons = Vec::new();
    if !(MIN_TEAM_SIZE..=MAX_TEAM_SIZE).contains(&team.len()) {
        reasons.push(format!(
            "team must have {MIN_TEAM_SIZE}-{MAX_TEAM_SIZE} participants (got {})",
            team.len()
        ));
    }

    let mut seen = HashSet::new();
    for participant in team {
        if !seen.insert(participant.id.as_str()) {
            reasons.push(format!("{} is in the team more than once", participant.id));
        }
    }

    for participant in team {
        if lookup.is_busy(&participant.id) {
            reasons.push(format!("{} is busy with another activity", participant.id));
        }
        reasons.extend(member_reasons(participant, team.len(), tier)?);
    }

    let verdict = GateVerdict::from_reasons(reasons);
    log::debug!(
        "gate for {} participants at {tier}: eligible={} reasons={}",
        team.len(),
        verdict.eligible,
        verdict.reasons.len()
    );
    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::EquippedAmmo;

    fn score(value: f64) -> EffectivenessScore {
        EffectivenessScore::new(value, value, value).unwrap()
    }

    fn ready_participant(id: &str) -> Participant {
        let mut participant = Participant::new(id);
        participant.bank = minimum_supplies()
            .with("Toxic blowpipe", 1)
            .with("Sanfew serum(4)", 2)
            .with("Super combat potion(4)", 1)
            .with("Ranging potion(4)", 1)
            .with("Blood rune", 110)
            .with("Death rune", 100)
            .with("Water rune", 800);
        participant.blowpipe.dart = Some("Dragon dart".to_string());
        participant.blowpipe.dart_quantity = 500;
        participant.blowpipe.scales = 5_000;
        participant.setups.range.equipped.insert("Zaryte crossbow".to_string());
        participant.setups.range.ammo = Some(EquippedAmmo {
            item: "Dragon arrow".to_string(),
            quantity: 1_000,
        });
        participant.setups.melee.equipped.insert("Osmumten's fang".to_string());
        participant.setups.melee.equipped.insert("Infernal cape".to_string());
        for skill in crate::participant::Skill::ALL {
            participant.skills.insert(skill, 99);
        }
        participant
    }

    #[test]
    fn ready_participant_passes_every_rule() {
        let verdict = check_participant(&ready_participant("p1"), &score(60.0));
        assert!(verdict.eligible, "{:?}", verdict.reasons);
        assert!(verdict.reasons.is_empty());
    }

    #[test]
    fn weak_unarmed_participant_collects_every_reason() {
        let participant = Participant::new("weak");
        let verdict = check_participant(&participant, &score(10.0));
        assert!(!verdict.eligible);
        let joined = verdict.reasons.join("\n");
        assert!(joined.contains("Terrible melee gear"));
        assert!(joined.contains("Terrible range gear"));
        assert!(joined.contains("Terrible mage gear"));
        assert!(joined.contains("Must have one of these equipped"));
        assert!(joined.contains("Need one of these weapons in your melee setup"));
        assert_eq!(verdict.reasons.len(), REQUIREMENT_RULES.len());
    }

    #[test]
    fn gate_is_idempotent() {
        let participant = Participant::new("same");
        let first = check_participant(&participant, &score(10.0));
        let second = check_participant(&participant, &score(10.0));
        assert_eq!(first, second);
    }

    #[test]
    fn blowpipe_reasons_are_specific() {
        let mut participant = ready_participant("bp");
        participant.blowpipe.dart_quantity = 20;
        let reasons = check_participant(&participant, &score(60.0)).reasons;
        assert_eq!(reasons, vec!["Needs 150x darts".to_string()]);

        participant.blowpipe.dart_quantity = 500;
        participant.blowpipe.dart = Some("Bronze dart".to_string());
        let reasons = check_participant(&participant, &score(60.0)).reasons;
        assert_eq!(reasons, vec!["Darts are too weak".to_string()]);
    }

    #[test]
    fn charged_helm_replaces_sanfew() {
        let mut participant = ready_participant("helm");
        participant.bank = minimum_supplies().with("Toxic blowpipe", 1);
        participant
            .setups
            .melee
            .equipped
            .insert("Serpentine helm".to_string());
        participant.helm_charges = 599;
        let reasons = check_participant(&participant, &score(60.0)).reasons;
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("Serpentine helm"));

        participant.helm_charges = 600;
        assert!(check_participant(&participant, &score(60.0)).eligible);
    }

    #[test]
    fn checklist_lists_every_rule_with_descriptions() {
        let checklist = requirement_checklist(&Participant::new("c"), DifficultyTier::L200).unwrap();
        assert_eq!(checklist.len(), REQUIREMENT_RULES.len());
        assert!(checklist.iter().all(|entry| !entry.description.is_empty()));
        assert_eq!(checklist[0].name, "Blowpipe");
        assert!(checklist.iter().all(|entry| entry.unmet.is_some()));
    }

    #[test]
    fn team_gate_reports_roster_problems_as_data() {
        let empty = check_team(&[], DifficultyTier::Entry, &NoActiveRuns).unwrap();
        assert!(!empty.eligible);
        assert!(empty.reasons[0].contains("team must have 1-8"));

        let twin = Participant::new("twin");
        let verdict =
            check_team(&[twin.clone(), twin], DifficultyTier::Entry, &NoActiveRuns).unwrap();
        assert!(verdict.reasons.iter().any(|r| r.contains("more than once")));

        let busy: BTreeSet<ParticipantId> = [ParticipantId::new("twin")].into_iter().collect();
        let verdict = check_team(&[Participant::new("twin")], DifficultyTier::Entry, &busy).unwrap();
        assert!(verdict.reasons.iter().any(|r| r.contains("busy")));
        assert!(verdict.reasons.iter().any(|r| r.starts_with("twin: ")));
    }

    #[test]
    fn small_teams_need_completions_at_high_tiers() {
        assert_eq!(small_team_completions_needed(1, DifficultyTier::L200), None);
        assert_eq!(small_team_completions_needed(3, DifficultyTier::L500), None);
        assert_eq!(small_team_completions_needed(1, DifficultyTier::L300), Some(30.0));
        assert_eq!(small_team_completions_needed(2, DifficultyTier::L300), Some(15.0));

        let mut participant = ready_participant("solo");
        let verdict = check_team(&[participant.clone()], DifficultyTier::L300, &NoActiveRuns).unwrap();
        assert!(
            verdict
                .reasons
                .iter()
                .any(|r| r.contains("completions to solo"))
        );
        participant.completions = 30;
        let verdict = check_team(&[participant], DifficultyTier::L300, &NoActiveRuns).unwrap();
        assert!(!verdict.reasons.iter().any(|r| r.contains("completions")));
    }

    #[test]
    fn trip_supplies_are_checked_for_an_hour() {
        let mut participant = ready_participant("poor");
        participant.bank = minimum_supplies().with("Toxic blowpipe", 1).with("Sanfew serum(4)", 1);
        let verdict = check_team(&[participant], DifficultyTier::Entry, &NoActiveRuns).unwrap();
        assert!(
            verdict
                .reasons
                .iter()
                .any(|r| r.contains("doesn't own the required supplies"))
        );
    }
}
