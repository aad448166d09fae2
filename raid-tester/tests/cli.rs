use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "raid-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_rosters_writes_output() {
    let exe = env!("CARGO_BIN_EXE_raid-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-rosters", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("Available rosters"));
    assert!(content.contains("Archetypes"));
}

#[test]
fn cli_sweep_writes_json_report() {
    let exe = env!("CARGO_BIN_EXE_raid-tester");
    let output_path = temp_path("sweep");
    let output = Command::new(exe)
        .args([
            "--mode",
            "sweep",
            "--rosters",
            "trio,novice",
            "--tiers",
            "100,400",
            "--seeds",
            "1..2",
            "--iterations",
            "3",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Raid Outcome Tester"));

    let content = std::fs::read_to_string(output_path).expect("read output");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let rows = parsed.as_array().expect("array report");
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row["runs"] == 6));
}

#[test]
fn cli_death_table_markdown() {
    let exe = env!("CARGO_BIN_EXE_raid-tester");
    let output_path = temp_path("deaths");
    let status = Command::new(exe)
        .args(["--mode", "death-table", "--report", "markdown", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    assert!(content.contains("# Death Chance Table"));
}

#[test]
fn cli_rejects_unknown_tier() {
    let exe = env!("CARGO_BIN_EXE_raid-tester");
    let output = Command::new(exe)
        .args(["--mode", "check", "--tiers", "250"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
}
