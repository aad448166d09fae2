//! Per-stage failure trials, contribution points and wipe resolution.
use rand::Rng;
use serde::Serialize;
use smallvec::SmallVec;

use crate::constants::{MAX_POINTS, MIN_POINTS, STAGE_POINT_VALUE};
use crate::numbers::{
    floor_f64_to_u32, floor_f64_to_u64, increase_by_percent, u64_to_f64, usize_to_f64,
};
use crate::rng::percent_chance;
use crate::stages::{STAGES, total_time_weight};
use crate::tier::DifficultyTier;

/// Ids of the stages a participant failed, in stage order.
pub type FailedStages = SmallVec<[u8; 5]>;

/// Attempt counts reported by [`death_chance_table`].
pub const DEATH_TABLE_ATTEMPTS: [u32; 7] = [0, 10, 20, 30, 50, 100, 500];

/// Percent the base death chance is inflated by for inexperienced players.
#[must_use]
pub const fn inexperience_inflation(attempts: u32) -> f64 {
    match attempts {
        0 => 99.0,
        1..=4 => 75.0,
        5..=9 => 55.0,
        10..=19 => 25.0,
        20..=29 => 15.0,
        30..=49 => 5.0,
        _ => 0.0,
    }
}

/// Whole-raid death chance in percent. Deterministic for its inputs.
#[must_use]
pub fn death_chance(attempts: u32, tier: DifficultyTier) -> f64 {
    increase_by_percent(tier.base_death_chance(), inexperience_inflation(attempts))
}

/// Failure chance applied to each individual stage.
#[must_use]
pub fn per_stage_chance(death_chance: f64) -> f64 {
    death_chance / usize_to_f64(STAGES.len())
}

/// Outcome of one participant's pass through the stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRun {
    pub points: u32,
    pub failed_stages: FailedStages,
}

/// One participant entering the stage sequence with their own stream.
#[derive(Debug)]
pub struct StageEntrant<R> {
    pub effectiveness: f64,
    pub attempts: u32,
    pub rng: R,
}

/// Stage results for the whole team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamStageRun {
    /// Per-entrant results, in entrant order.
    pub runs: Vec<StageRun>,
    /// First stage every entrant failed; no later stage was rolled.
    pub wiped_stage: Option<u8>,
}

struct StageRoller {
    stage_chance: f64,
    ceiling: u32,
    points: u32,
    failed_stages: FailedStages,
}

impl StageRoller {
    fn new(effectiveness: f64, attempts: u32, tier: DifficultyTier) -> Self {
        Self {
            stage_chance: per_stage_chance(death_chance(attempts, tier)),
            ceiling: floor_f64_to_u32(effectiveness / 100.0 * STAGE_POINT_VALUE).max(MIN_POINTS),
            points: 0,
            failed_stages: FailedStages::new(),
        }
    }

    /// Returns true when the stage was failed.
    fn roll<R: Rng + ?Sized>(&mut self, stage_id: u8, rng: &mut R) -> bool {
        if percent_chance(rng, self.stage_chance) {
            self.failed_stages.push(stage_id);
            return true;
        }
        self.points = rng.gen_range(MIN_POINTS..=self.ceiling);
        false
    }

    fn finish(self) -> StageRun {
        StageRun {
            points: self.points.clamp(MIN_POINTS, MAX_POINTS),
            failed_stages: self.failed_stages,
        }
    }
}

/// Resolve the stages in order across the whole team.
///
/// Every entrant rolls each stage from their own stream. A failed stage
/// records its id; a survived stage draws fresh points in
/// `1..=effectiveness% of 20_000`, replacing the previous draw. When every
/// entrant fails the same stage the team wipes there and the remaining
/// stages are never rolled. Points are clamped to `1..=64_000`.
pub fn run_team_stages<R: Rng>(
    entrants: &mut [StageEntrant<R>],
    tier: DifficultyTier,
) -> TeamStageRun {
    let mut rollers: Vec<StageRoller> = entrants
        .iter()
        .map(|entrant| StageRoller::new(entrant.effectiveness, entrant.attempts, tier))
        .collect();
    let mut wiped_stage = None;
    if !entrants.is_empty() {
        for stage in &STAGES {
            let mut survivors = 0_usize;
            for (roller, entrant) in rollers.iter_mut().zip(entrants.iter_mut()) {
                if !roller.roll(stage.id, &mut entrant.rng) {
                    survivors += 1;
                }
            }
            if survivors == 0 {
                wiped_stage = Some(stage.id);
                break;
            }
        }
    }
    TeamStageRun {
        runs: rollers.into_iter().map(StageRoller::finish).collect(),
        wiped_stage,
    }
}

/// Duration actually spent when the team wipes at `wiped_stage`.
///
/// Earlier stages count in full. The wipe stage counts a uniform share
/// between half and all of its weight, or all of it when `rng` is `None`.
pub fn truncated_duration_ms<R: Rng + ?Sized>(
    duration_ms: u64,
    wiped_stage: u8,
    rng: Option<&mut R>,
) -> u64 {
    let mut elapsed_weight = 0.0;
    for stage in &STAGES {
        let weight = f64::from(stage.time_weight);
        if stage.id == wiped_stage {
            elapsed_weight += match rng {
                Some(rng) => rng.gen_range(weight / 2.0..=weight),
                None => weight,
            };
            break;
        }
        elapsed_weight += weight;
    }
    let elapsed = u64_to_f64(duration_ms) * elapsed_weight / f64::from(total_time_weight());
    floor_f64_to_u64(elapsed).min(duration_ms)
}

/// One row of the death chance report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeathChanceRow {
    pub attempts: u32,
    pub tier: DifficultyTier,
    pub chance: f64,
}

/// Death chance for each reported attempt count at every tier.
#[must_use]
pub fn death_chance_table() -> Vec<DeathChanceRow> {
    DifficultyTier::ALL
        .iter()
        .flat_map(|tier| {
            DEATH_TABLE_ATTEMPTS.iter().map(|attempts| DeathChanceRow {
                attempts: *attempts,
                tier: *tier,
                chance: death_chance(*attempts, *tier),
            })
        })
        .collect()
}
