use anyhow::Result;
use colored::Colorize;
use raid_core::DeathChanceRow;
use std::io::Write;

use super::check::GateReport;
use super::sweep::SweepAggregate;

pub fn generate_sweep_console<W: Write + ?Sized>(
    writer: &mut W,
    aggregates: &[SweepAggregate],
    stamp: &str,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Raid Sweep Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "=====================".cyan())?;
    writeln!(writer, "Generated: {stamp}")?;
    writeln!(writer)?;

    for aggregate in aggregates {
        let header = format!(
            "{} (level {}, {} members)",
            aggregate.roster, aggregate.tier, aggregate.team_size
        );
        if aggregate.eligible_runs == 0 {
            writeln!(writer, "{} {}", "⛔ REJECTED".red(), header.bold())?;
            for reason in &aggregate.gate_reasons {
                writeln!(writer, "     • {}", reason.red())?;
            }
            writeln!(writer)?;
            continue;
        }

        writeln!(writer, "{} {}", "✅".green(), header.bold())?;
        writeln!(
            writer,
            "   Runs: {}/{} eligible",
            aggregate.eligible_runs, aggregate.runs
        )?;
        writeln!(
            writer,
            "   Duration: {:.1} ± {:.1} min (min {:.1}, max {:.1})",
            aggregate.mean_duration_min,
            aggregate.std_duration_min,
            aggregate.min_duration_min,
            aggregate.max_duration_min
        )?;
        writeln!(
            writer,
            "   Wipes: {:.1}%  Flawless: {:.1}%  Deaths: {:.1}%",
            aggregate.wipe_rate * 100.0,
            aggregate.flawless_rate * 100.0,
            aggregate.participant_death_rate * 100.0
        )?;
        writeln!(
            writer,
            "   Uniques: {:.1}% observed vs {:.2}% mean chance",
            aggregate.unique_rate * 100.0,
            aggregate.mean_unique_chance
        )?;
        writeln!(writer, "   Mean points: {:.0}", aggregate.mean_points)?;
        if !aggregate.wipes_by_stage.is_empty() {
            let stages = aggregate
                .wipes_by_stage
                .iter()
                .map(|(stage, count)| format!("stage {stage}: {count}"))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(writer, "   Wipes by stage: {}", stages.yellow())?;
        }
        if !aggregate.top_items.is_empty() {
            writeln!(writer, "   Top loot:")?;
            for (item, quantity) in &aggregate.top_items {
                writeln!(writer, "     • {quantity}x {item}")?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub fn generate_sweep_markdown<W: Write + ?Sized>(
    writer: &mut W,
    aggregates: &[SweepAggregate],
    stamp: &str,
) -> Result<()> {
    writeln!(writer, "# Raid Sweep Results\n")?;
    writeln!(writer, "_Generated {stamp}_\n")?;
    writeln!(
        writer,
        "| Roster | Level | Size | Eligible | Mean min | Wipe % | Flawless % | Unique % |"
    )?;
    writeln!(writer, "|---|---|---|---|---|---|---|---|")?;
    for aggregate in aggregates {
        writeln!(
            writer,
            "| {} | {} | {} | {}/{} | {:.1} | {:.1} | {:.1} | {:.1} |",
            aggregate.roster,
            aggregate.tier,
            aggregate.team_size,
            aggregate.eligible_runs,
            aggregate.runs,
            aggregate.mean_duration_min,
            aggregate.wipe_rate * 100.0,
            aggregate.flawless_rate * 100.0,
            aggregate.unique_rate * 100.0
        )?;
    }

    let rejected: Vec<&SweepAggregate> = aggregates
        .iter()
        .filter(|aggregate| aggregate.eligible_runs == 0)
        .collect();
    if !rejected.is_empty() {
        writeln!(writer, "\n## Rejected Rosters\n")?;
        for aggregate in rejected {
            writeln!(writer, "### {}\n", aggregate.roster)?;
            for reason in &aggregate.gate_reasons {
                writeln!(writer, "- {reason}")?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

pub fn generate_gate_console<W: Write + ?Sized>(
    writer: &mut W,
    reports: &[GateReport],
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "🚪 Requirement Gate".bright_cyan().bold())?;
    writeln!(writer, "{}", "===================".cyan())?;
    for report in reports {
        let status = if report.eligible {
            "✅ ELIGIBLE".green()
        } else {
            "❌ REJECTED".red()
        };
        writeln!(writer, "{status} {} at {}", report.roster.bold(), report.tier)?;
        for member in &report.members {
            let unmet: Vec<_> = member.unmet().collect();
            if unmet.is_empty() {
                writeln!(writer, "   {}: ready", member.id)?;
                continue;
            }
            writeln!(writer, "   {}:", member.id)?;
            for entry in unmet {
                writeln!(
                    writer,
                    "     • {} - {}",
                    entry.name,
                    entry.unmet.as_deref().unwrap_or_default().red()
                )?;
            }
        }
        let team_reasons: Vec<_> = report
            .reasons
            .iter()
            .filter(|reason| {
                !report
                    .members
                    .iter()
                    .any(|member| reason.starts_with(&format!("{}: ", member.id)))
            })
            .collect();
        for reason in team_reasons {
            writeln!(writer, "   team: {}", reason.yellow())?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub fn generate_gate_markdown<W: Write + ?Sized>(
    writer: &mut W,
    reports: &[GateReport],
) -> Result<()> {
    writeln!(writer, "# Requirement Gate\n")?;
    for report in reports {
        let status = if report.eligible { "✅" } else { "❌" };
        writeln!(writer, "## {status} {} at {}\n", report.roster, report.tier)?;
        if report.reasons.is_empty() {
            writeln!(writer, "All requirements met.\n")?;
            continue;
        }
        for reason in &report.reasons {
            writeln!(writer, "- {reason}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub fn generate_death_table_console<W: Write + ?Sized>(
    writer: &mut W,
    rows: &[DeathChanceRow],
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "☠️  Death Chance Table".bright_cyan().bold())?;
    writeln!(writer, "{}", "=====================".cyan())?;
    writeln!(writer, "{:>10} {:>10} {:>10}", "attempts", "level", "chance")?;
    for row in rows {
        writeln!(
            writer,
            "{:>10} {:>10} {:>9.2}%",
            row.attempts,
            row.tier.level(),
            row.chance
        )?;
    }
    Ok(())
}

pub fn generate_death_table_markdown<W: Write + ?Sized>(
    writer: &mut W,
    rows: &[DeathChanceRow],
) -> Result<()> {
    writeln!(writer, "# Death Chance Table\n")?;
    writeln!(writer, "| Attempts | Level | Chance |")?;
    writeln!(writer, "|---|---|---|")?;
    for row in rows {
        writeln!(
            writer,
            "| {} | {} | {:.2}% |",
            row.attempts,
            row.tier.level(),
            row.chance
        )?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized, T: serde::Serialize + ?Sized>(
    writer: &mut W,
    payload: &T,
) -> Result<()> {
    let json_output = serde_json::to_string_pretty(payload)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use raid_core::{DifficultyTier, death_chance_table};
    use std::collections::BTreeMap;

    fn sample_aggregate(eligible_runs: u32) -> SweepAggregate {
        SweepAggregate {
            roster: "trio".to_string(),
            tier: 300,
            team_size: 3,
            runs: 4,
            eligible_runs,
            gate_reasons: if eligible_runs == 0 {
                vec!["novice-1: Terrible melee gear".to_string()]
            } else {
                Vec::new()
            },
            wipe_rate: 0.25,
            flawless_rate: 0.5,
            unique_rate: 0.25,
            mean_unique_chance: 18.0,
            mean_duration_min: 41.5,
            std_duration_min: 2.0,
            min_duration_min: 38.0,
            max_duration_min: 44.0,
            mean_points: 9_000.0,
            participant_death_rate: 0.2,
            wipes_by_stage: BTreeMap::from([(5, 1)]),
            top_items: vec![("Coins".to_string(), 12_000)],
        }
    }

    fn render<F>(render: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buffer = Vec::new();
        render(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn sweep_console_lists_rates_and_rejections() {
        let content = render(|buffer| {
            generate_sweep_console(
                buffer,
                &[sample_aggregate(4), sample_aggregate(0)],
                "2024-01-01 00:00:00 UTC",
            )
        });
        assert!(content.contains("Raid Sweep Summary"));
        assert!(content.contains("Wipes by stage"));
        assert!(content.contains("Terrible melee gear"));
    }

    #[test]
    fn sweep_markdown_has_table_and_rejections() {
        let content = render(|buffer| {
            generate_sweep_markdown(buffer, &[sample_aggregate(4), sample_aggregate(0)], "now")
        });
        assert!(content.contains("| trio | 300 | 3 | 4/4 |"));
        assert!(content.contains("## Rejected Rosters"));
    }

    #[test]
    fn death_table_renders_every_row() {
        let rows = death_chance_table();
        let content = render(|buffer| generate_death_table_markdown(buffer, &rows));
        assert_eq!(
            content.lines().filter(|line| line.starts_with("| ")).count(),
            rows.len() + 1
        );
        let console = render(|buffer| generate_death_table_console(buffer, &rows));
        assert!(console.contains("Death Chance Table"));
    }

    #[test]
    fn json_report_serializes_payload() {
        let content = render(|buffer| generate_json_report(buffer, &[sample_aggregate(4)]));
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["roster"], "trio");
        assert_eq!(parsed[0]["tier"], 300);
    }

    #[test]
    fn gate_markdown_marks_clean_rosters() {
        let report = GateReport {
            roster: "elite-solo".to_string(),
            tier: DifficultyTier::L300,
            eligible: true,
            reasons: Vec::new(),
            members: Vec::new(),
        };
        let content = render(|buffer| generate_gate_markdown(buffer, &[report]));
        assert!(content.contains("All requirements met."));
    }
}
