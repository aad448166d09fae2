mod common;
mod logic;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use raid_core::{DifficultyTier, EncounterOptions, LootConfig, death_chance_table};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use common::{report_stamp, split_csv};
use logic::{
    GateReport, RosterCatalog, SweepAggregate, SweepPlan, reports, resolve_seed_inputs, run_check,
    run_sweep,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RunMode {
    /// Monte Carlo sweep of every roster and tier (fast, deterministic per seed)
    Sweep,
    /// Gate each roster and print the readiness checklist
    Check,
    /// Print the death chance table for every tier
    DeathTable,
}

#[derive(Debug, Parser)]
#[command(name = "raid-tester", version = "0.1.0")]
#[command(about = "Balance sweeps and gate checks for the raid outcome engine")]
struct Args {
    /// What to run: sweep, check, or death-table
    #[arg(long, value_enum, default_value_t = RunMode::Sweep)]
    mode: RunMode,

    /// Rosters to run (comma-separated, or "all")
    #[arg(long, default_value = "mixed")]
    rosters: String,

    /// List all bundled rosters and archetypes and exit
    #[arg(long)]
    list_rosters: bool,

    /// Tier levels to run (comma-separated, or "all")
    #[arg(long, default_value = "300")]
    tiers: String,

    /// Seeds to run (comma-separated; supports hex and start..end ranges)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of runs per roster, tier and seed
    #[arg(long, default_value_t = 100)]
    iterations: usize,

    /// Skip duration variation and randomized wipe shares
    #[arg(long)]
    no_variation: bool,

    /// JSON file overriding the default loot tables
    #[arg(long)]
    loot_config: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let catalog = RosterCatalog::load_default()?;

    if maybe_list_rosters(&args, &catalog)? {
        return Ok(());
    }

    announce_banner();
    let start_time = Instant::now();
    let tiers = expand_tiers(&args.tiers)?;

    match args.mode {
        RunMode::Sweep => {
            let loot_config = load_loot_config(args.loot_config.as_deref())?;
            let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
            let aggregates = run_sweeps(&args, &catalog, &tiers, &seeds, &loot_config)?;
            write_sweep_report(&args, &aggregates, start_time)?;
        }
        RunMode::Check => {
            let gate_reports = run_checks(&args, &catalog, &tiers)?;
            write_gate_report(&args, &gate_reports)?;
        }
        RunMode::DeathTable => write_death_table(&args)?,
    }

    Ok(())
}

fn maybe_list_rosters(args: &Args, catalog: &RosterCatalog) -> Result<bool> {
    if !args.list_rosters {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available rosters:")?;
    for roster in catalog.rosters() {
        writeln!(
            output_target.writer(),
            "  {:15} - {}",
            roster.key,
            roster.description
        )?;
    }
    writeln!(output_target.writer(), "Archetypes:")?;
    for archetype in catalog.archetypes() {
        writeln!(
            output_target.writer(),
            "  {:15} - {}",
            archetype.key,
            archetype.description
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "⚔️  Raid Outcome Tester".bright_cyan().bold());
    println!("{}", "========================".cyan());
}

fn expand_tiers(tiers_arg: &str) -> Result<Vec<DifficultyTier>> {
    let tokens = split_csv(tiers_arg);
    if tokens.iter().any(|token| token.eq_ignore_ascii_case("all")) {
        return Ok(DifficultyTier::ALL.to_vec());
    }
    let mut tiers = Vec::new();
    for token in tokens {
        let level: u16 = token
            .parse()
            .with_context(|| format!("invalid tier level: {token}"))?;
        let tier = DifficultyTier::try_from(level)?;
        if !tiers.contains(&tier) {
            tiers.push(tier);
        }
    }
    if tiers.is_empty() {
        bail!("no tiers selected");
    }
    Ok(tiers)
}

fn load_loot_config(path: Option<&Path>) -> Result<LootConfig> {
    let Some(path) = path else {
        return Ok(LootConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: LootConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn run_sweeps(
    args: &Args,
    catalog: &RosterCatalog,
    tiers: &[DifficultyTier],
    seeds: &[u64],
    loot_config: &LootConfig,
) -> Result<Vec<SweepAggregate>> {
    println!("{}", "🎲 Running Sweeps".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let options = EncounterOptions {
        disable_variation: args.no_variation,
    };
    let mut aggregates = Vec::new();
    for roster in catalog.select(&split_csv(&args.rosters))? {
        let team = catalog.build(roster)?;
        for &tier in tiers {
            let sweep_start = Instant::now();
            let plan = SweepPlan {
                roster_key: &roster.key,
                team: &team,
                tier,
                seeds,
                iterations: args.iterations,
                options,
            };
            let aggregate = run_sweep(&plan, loot_config)?;
            if args.verbose {
                println!(
                    "✅ [{} {}] {} runs - {:?}",
                    roster.key.green(),
                    tier,
                    aggregate.runs,
                    sweep_start.elapsed()
                );
            }
            aggregates.push(aggregate);
        }
    }
    Ok(aggregates)
}

fn run_checks(
    args: &Args,
    catalog: &RosterCatalog,
    tiers: &[DifficultyTier],
) -> Result<Vec<GateReport>> {
    let mut gate_reports = Vec::new();
    for roster in catalog.select(&split_csv(&args.rosters))? {
        let team = catalog.build(roster)?;
        for &tier in tiers {
            gate_reports.push(run_check(&roster.key, &team, tier)?);
        }
    }
    Ok(gate_reports)
}

fn write_sweep_report(
    args: &Args,
    aggregates: &[SweepAggregate],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let stamp = report_stamp(Utc::now());

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, aggregates)?,
        "markdown" => reports::generate_sweep_markdown(&mut output_target, aggregates, &stamp)?,
        _ => {
            reports::generate_sweep_console(&mut output_target, aggregates, &stamp)?;
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }
    output_target.flush_inner()?;
    Ok(())
}

fn write_gate_report(args: &Args, gate_reports: &[GateReport]) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, gate_reports)?,
        "markdown" => reports::generate_gate_markdown(&mut output_target, gate_reports)?,
        _ => reports::generate_gate_console(&mut output_target, gate_reports)?,
    }
    output_target.flush_inner()?;
    Ok(())
}

fn write_death_table(args: &Args) -> Result<()> {
    let rows = death_chance_table();
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, &rows)?,
        "markdown" => reports::generate_death_table_markdown(&mut output_target, &rows)?,
        _ => reports::generate_death_table_console(&mut output_target, &rows)?,
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
