use anyhow::Result;
use raid_core::numbers::u64_to_f64;
use raid_core::{
    DifficultyTier, EncounterOptions, EncounterResult, LootConfig, NoActiveRuns, Participant,
    RaidEngine, SeededRngProvider,
};
use serde::Serialize;
use std::collections::BTreeMap;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Inputs for one Monte Carlo sweep over a roster.
#[derive(Debug, Clone)]
pub struct SweepPlan<'a> {
    pub roster_key: &'a str,
    pub team: &'a [Participant],
    pub tier: DifficultyTier,
    pub seeds: &'a [u64],
    pub iterations: usize,
    pub options: EncounterOptions,
}

/// Aggregated behaviour of one roster at one tier.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepAggregate {
    pub roster: String,
    pub tier: u16,
    pub team_size: usize,
    pub runs: u32,
    pub eligible_runs: u32,
    pub gate_reasons: Vec<String>,
    pub wipe_rate: f64,
    pub flawless_rate: f64,
    pub unique_rate: f64,
    pub mean_unique_chance: f64,
    pub mean_duration_min: f64,
    pub std_duration_min: f64,
    pub min_duration_min: f64,
    pub max_duration_min: f64,
    pub mean_points: f64,
    pub participant_death_rate: f64,
    pub wipes_by_stage: BTreeMap<u8, u32>,
    pub top_items: Vec<(String, u64)>,
}

/// Mix the CLI seed and iteration index into one run nonce.
pub const fn run_nonce(seed: u64, iteration: usize) -> u64 {
    seed ^ (iteration as u64).rotate_left(32)
}

/// Run a roster repeatedly and fold the outcomes into an aggregate.
///
/// # Errors
///
/// Propagates contract violations reported by the engine.
pub fn run_sweep(plan: &SweepPlan<'_>, loot_config: &LootConfig) -> Result<SweepAggregate> {
    let engine = RaidEngine::with_loot_config(NoActiveRuns, loot_config.clone())?;
    let mut builder = AggregateBuilder::new(plan);

    for &seed in plan.seeds {
        for iteration in 0..plan.iterations {
            let mut provider = SeededRngProvider::new(run_nonce(seed, iteration));
            let result = engine.run(plan.team, plan.tier, plan.options, &mut provider)?;
            builder.ingest(&result);
        }
    }

    Ok(builder.finish())
}

struct AggregateBuilder {
    aggregate: SweepAggregate,
    durations: RunningStats,
    points: RunningStats,
    unique_chance: RunningStats,
    min_duration: f64,
    max_duration: f64,
    wipes: u32,
    flawless: u32,
    uniques: u32,
    participant_runs: u32,
    participant_deaths: u32,
    items: BTreeMap<String, u64>,
}

impl AggregateBuilder {
    fn new(plan: &SweepPlan<'_>) -> Self {
        Self {
            aggregate: SweepAggregate {
                roster: plan.roster_key.to_string(),
                tier: plan.tier.level(),
                team_size: plan.team.len(),
                ..SweepAggregate::default()
            },
            durations: RunningStats::default(),
            points: RunningStats::default(),
            unique_chance: RunningStats::default(),
            min_duration: f64::INFINITY,
            max_duration: 0.0,
            wipes: 0,
            flawless: 0,
            uniques: 0,
            participant_runs: 0,
            participant_deaths: 0,
            items: BTreeMap::new(),
        }
    }

    fn ingest(&mut self, result: &EncounterResult) {
        self.aggregate.runs += 1;
        let outcome = match result {
            EncounterResult::Ineligible { reasons } => {
                if self.aggregate.gate_reasons.is_empty() {
                    self.aggregate.gate_reasons.clone_from(reasons);
                }
                return;
            }
            EncounterResult::Completed(outcome) => outcome,
        };
        self.aggregate.eligible_runs += 1;

        let minutes = u64_to_f64(outcome.duration_ms) / MS_PER_MINUTE;
        self.durations.add(minutes);
        self.min_duration = self.min_duration.min(minutes);
        self.max_duration = self.max_duration.max(minutes);
        self.unique_chance.add(outcome.unique_chance);

        if let Some(stage) = outcome.wiped_stage_id {
            self.wipes += 1;
            *self.aggregate.wipes_by_stage.entry(stage).or_insert(0) += 1;
        }
        if outcome.flawless() {
            self.flawless += 1;
        }
        if outcome.unique_recipient.is_some() {
            self.uniques += 1;
        }
        for points in outcome.per_participant_points.values() {
            self.points.add(f64::from(*points));
        }
        for stages in outcome.per_participant_failed_stages.values() {
            self.participant_runs += 1;
            if !stages.is_empty() {
                self.participant_deaths += 1;
            }
        }
        for loot in outcome.per_participant_loot.values() {
            for (item, quantity) in loot.iter() {
                *self.items.entry(item.to_string()).or_insert(0) += u64::from(quantity);
            }
        }
    }

    fn finish(mut self) -> SweepAggregate {
        let eligible = f64::from(self.aggregate.eligible_runs.max(1));
        self.aggregate.wipe_rate = f64::from(self.wipes) / eligible;
        self.aggregate.flawless_rate = f64::from(self.flawless) / eligible;
        self.aggregate.unique_rate = f64::from(self.uniques) / eligible;
        self.aggregate.mean_unique_chance = self.unique_chance.mean();
        self.aggregate.mean_duration_min = self.durations.mean();
        self.aggregate.std_duration_min = self.durations.std_dev();
        self.aggregate.min_duration_min = if self.min_duration.is_finite() {
            self.min_duration
        } else {
            0.0
        };
        self.aggregate.max_duration_min = self.max_duration;
        self.aggregate.mean_points = self.points.mean();
        self.aggregate.participant_death_rate = if self.participant_runs == 0 {
            0.0
        } else {
            f64::from(self.participant_deaths) / f64::from(self.participant_runs)
        };

        let mut items: Vec<(String, u64)> = self.items.into_iter().collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        items.truncate(5);
        self.aggregate.top_items = items;
        self.aggregate
    }
}

#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn std_dev(&self) -> f64 {
        if self.count > 1 {
            (self.m2 / f64::from(self.count - 1)).sqrt()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::roster::RosterCatalog;

    fn sweep(key: &str, tier: DifficultyTier, iterations: usize) -> SweepAggregate {
        let catalog = RosterCatalog::load_default().unwrap();
        let roster = catalog.select(&[key.to_string()]).unwrap()[0];
        let team = catalog.build(roster).unwrap();
        let plan = SweepPlan {
            roster_key: key,
            team: &team,
            tier,
            seeds: &[1, 2],
            iterations,
            options: EncounterOptions::default(),
        };
        run_sweep(&plan, &LootConfig::default()).unwrap()
    }

    #[test]
    fn running_stats_tracks_mean_and_spread() {
        let mut stats = RunningStats::default();
        for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            stats.add(value);
        }
        assert!((stats.mean() - 5.0).abs() < 1e-9);
        assert!((stats.std_dev() - 2.138_089_935).abs() < 1e-6);
        assert!(RunningStats::default().mean().abs() < f64::EPSILON);
    }

    #[test]
    fn run_nonce_separates_iterations() {
        assert_ne!(run_nonce(1, 0), run_nonce(1, 1));
        assert_ne!(run_nonce(1, 0), run_nonce(2, 0));
        assert_eq!(run_nonce(5, 0), 5);
    }

    #[test]
    fn eligible_roster_sweep_produces_durations() {
        let aggregate = sweep("mixed", DifficultyTier::L300, 5);
        assert_eq!(aggregate.runs, 10);
        assert_eq!(aggregate.eligible_runs, 10);
        assert!(aggregate.mean_duration_min >= 20.0);
        assert!(aggregate.min_duration_min <= aggregate.max_duration_min);
        assert!((0.0..=1.0).contains(&aggregate.wipe_rate));
        assert!(aggregate.gate_reasons.is_empty());
    }

    #[test]
    fn ineligible_roster_records_gate_reasons() {
        let aggregate = sweep("novice", DifficultyTier::Entry, 2);
        assert_eq!(aggregate.runs, 4);
        assert_eq!(aggregate.eligible_runs, 0);
        assert!(!aggregate.gate_reasons.is_empty());
        assert!(aggregate.min_duration_min.abs() < f64::EPSILON);
    }

    #[test]
    fn sweeps_are_reproducible() {
        let first = sweep("trio", DifficultyTier::L400, 3);
        let second = sweep("trio", DifficultyTier::L400, 3);
        assert!((first.mean_duration_min - second.mean_duration_min).abs() < f64::EPSILON);
        assert_eq!(first.wipes_by_stage, second.wipes_by_stage);
        assert_eq!(first.top_items, second.top_items);
    }
}
