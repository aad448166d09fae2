use anyhow::Result;
use raid_core::{
    ChecklistEntry, DifficultyTier, NoActiveRuns, Participant, RaidEngine, requirement_checklist,
};
use serde::Serialize;

/// Gate verdict for one roster plus each member's readiness checklist.
#[derive(Debug, Clone, Serialize)]
pub struct GateReport {
    pub roster: String,
    pub tier: DifficultyTier,
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub members: Vec<MemberChecklist>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberChecklist {
    pub id: String,
    pub entries: Vec<ChecklistEntry>,
}

impl MemberChecklist {
    pub fn unmet(&self) -> impl Iterator<Item = &ChecklistEntry> {
        self.entries.iter().filter(|entry| entry.unmet.is_some())
    }
}

/// Gate a roster without simulating it.
///
/// # Errors
///
/// Returns an error if a member's gear cannot be scored.
pub fn run_check(roster_key: &str, team: &[Participant], tier: DifficultyTier) -> Result<GateReport> {
    let engine = RaidEngine::new(NoActiveRuns);
    let verdict = engine.check(team, tier)?;
    let members = team
        .iter()
        .map(|participant| -> Result<MemberChecklist> {
            Ok(MemberChecklist {
                id: participant.id.to_string(),
                entries: requirement_checklist(participant, tier)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    log::debug!(
        "{roster_key} at {tier}: eligible={} ({} reasons)",
        verdict.eligible,
        verdict.reasons.len()
    );
    Ok(GateReport {
        roster: roster_key.to_string(),
        tier,
        eligible: verdict.eligible,
        reasons: verdict.reasons,
        members,
    })
}
