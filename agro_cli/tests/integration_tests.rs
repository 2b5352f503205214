//! Integration tests for the agro binary.
//!
//! These tests verify end-to-end behavior including:
//! - The login gate
//! - Reading generation and display
//! - Recommendations for current and simulated readings
//! - Pest lookups
//! - Spreadsheet export (xlsx and CSV)

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the CLI binary with valid credentials and an isolated config
fn cli(config_dir: &TempDir) -> Command {
    let config_path = config_dir.path().join("config.toml");
    if !config_path.exists() {
        fs::write(&config_path, "").expect("Failed to write config");
    }

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agro"));
    cmd.arg("--username")
        .arg("agronomo1")
        .arg("--password")
        .arg("Uniso123")
        .arg("--config")
        .arg(&config_path)
        .arg("--seed")
        .arg("42");
    cmd
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("agro"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Agroflora soil monitoring dashboard"));
}

#[test]
fn test_missing_credentials_rejected() {
    Command::new(assert_cmd::cargo::cargo_bin!("agro"))
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Access restricted"));
}

#[test]
fn test_wrong_password_rejected() {
    Command::new(assert_cmd::cargo::cargo_bin!("agro"))
        .args(["--username", "agronomo1", "--password", "wrong", "dashboard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect password"));
}

#[test]
fn test_unknown_user_rejected() {
    Command::new(assert_cmd::cargo::cargo_bin!("agro"))
        .args(["--username", "visitante", "--password", "x", "dashboard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User not found"));
}

#[test]
fn test_default_command_shows_dashboard() {
    let dir = setup_test_dir();
    cli(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("AGROFLORA DASHBOARD"))
        .stdout(predicate::str::contains("Welcome, Leonardo Peres (access: full)"))
        .stdout(predicate::str::contains("Outros Componentes"));
}

#[test]
fn test_readings_json_has_window_length() {
    let dir = setup_test_dir();
    let before = chrono::Local::now().date_naive();
    let output = cli(&dir)
        .args(["--days", "30", "--json", "readings"])
        .output()
        .expect("Failed to run");
    let after = chrono::Local::now().date_naive();
    assert!(output.status.success());

    let readings: Vec<serde_json::Value> =
        serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    assert_eq!(readings.len(), 30);

    let dates: Vec<String> = readings
        .iter()
        .map(|r| r["date"].as_str().unwrap().to_string())
        .collect();
    assert!(dates.windows(2).all(|w| w[0] < w[1]));

    // The run may cross midnight, so "today" is anywhere in [before, after]
    let last = chrono::NaiveDate::parse_from_str(dates.last().unwrap(), "%Y-%m-%d").unwrap();
    assert!(before <= last && last <= after, "{} not in {}..={}", last, before, after);
}

#[test]
fn test_same_seed_same_readings() {
    let dir = setup_test_dir();
    let first = cli(&dir).args(["--json", "readings"]).output().unwrap();
    let second = cli(&dir).args(["--json", "readings"]).output().unwrap();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_zero_days_rejected() {
    let dir = setup_test_dir();
    cli(&dir).args(["--days", "0", "readings"]).assert().failure();
}

#[test]
fn test_huge_window_rejected_without_abort() {
    let dir = setup_test_dir();
    let output = cli(&dir)
        .args(["--days", "4294967295", "readings"])
        .output()
        .expect("Failed to run");

    // A clean error exit, not a signal from an allocation failure
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("window_days must be at most"));
}

#[test]
fn test_simulated_recommendation() {
    let dir = setup_test_dir();
    cli(&dir)
        .args([
            "recommend",
            "--ph",
            "6.2",
            "--nitrogen",
            "25",
            "--phosphorus",
            "15",
            "--potassium",
            "120",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Eucalipto Grandis"))
        .stdout(predicate::str::contains("Planting density: 1.100 a 1.600 plantas/hectare"));
}

#[test]
fn test_simulated_recommendation_json() {
    let dir = setup_test_dir();
    let output = cli(&dir)
        .args([
            "--json",
            "recommend",
            "--ph",
            "4.9",
            "--nitrogen",
            "25",
            "--phosphorus",
            "15",
            "--potassium",
            "120",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let recs: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert!(recs.iter().all(|r| r["species"] != "Eucalipto Grandis"));
}

#[test]
fn test_no_match_notice() {
    let dir = setup_test_dir();
    cli(&dir)
        .args([
            "recommend",
            "--ph",
            "7.9",
            "--nitrogen",
            "5",
            "--phosphorus",
            "5",
            "--potassium",
            "50",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No species suits"));
}

#[test]
fn test_partial_simulation_reports_invalid_input() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["recommend", "--ph", "6.2", "--nitrogen", "25", "--phosphorus", "15"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Cannot recommend species"))
        .stderr(predicate::str::contains("Potássio"));
}

#[test]
fn test_out_of_range_simulation_reports_invalid_input() {
    let dir = setup_test_dir();
    cli(&dir)
        .args([
            "recommend",
            "--ph",
            "9.5",
            "--nitrogen",
            "25",
            "--phosphorus",
            "15",
            "--potassium",
            "120",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("pH must be between 4 and 8"));
}

#[test]
fn test_partial_simulation_is_bounded() {
    let dir = setup_test_dir();
    let species_path = dir.path().join("species.toml");
    fs::write(
        &species_path,
        r#"
[[species]]
name = "Ipê Amarelo"
productivity = "Média"
cycle = "Longo (15-20 anos)"
uses = "Paisagismo"

[[species.tolerances]]
field = "ph"
range = { min = 4.0, max = 14.0 }
"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("config.toml"),
        format!("[catalog]\nspecies_file = {:?}\n", species_path.display().to_string()),
    )
    .unwrap();

    cli(&dir)
        .args(["recommend", "--ph", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ipê Amarelo").not())
        .stderr(predicate::str::contains("pH must be between 4 and 8"));

    cli(&dir)
        .args(["recommend", "--ph", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ipê Amarelo"));
}

#[test]
fn test_pest_lookup() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["pests", "--name", "Cupins"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Severity:       Média"))
        .stdout(predicate::str::contains("Affected area:  Setor B"));
}

#[test]
fn test_unknown_pest() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["pests", "--name", "Gafanhoto"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Pest not found: Gafanhoto"));
}

#[test]
fn test_pest_list_and_treatment() {
    let dir = setup_test_dir();
    cli(&dir)
        .arg("pests")
        .assert()
        .success()
        .stdout(predicate::str::contains("Broca-do-eucalipto"))
        .stdout(predicate::str::contains("Infestation map"));

    cli(&dir)
        .args(["pests", "--name", "Formigas cortadeiras", "--apply"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Aplicação de Isca formicida a base de sulfluramida registrada para Formigas cortadeiras no Setor C",
        ));
}

#[test]
fn test_infestation_map_lists_pests_per_sector() {
    let dir = setup_test_dir();
    let output = cli(&dir).arg("pests").output().expect("Failed to run");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let sector_line = |id: &str| {
        stdout
            .lines()
            .find(|l| l.trim_start().starts_with(&format!("Setor {} ", id)))
            .unwrap_or_else(|| panic!("no map line for sector {}", id))
            .to_string()
    };
    assert!(sector_line("B").ends_with("Cupins"));
    assert!(sector_line("A").ends_with("Broca-do-eucalipto"));
    assert!(sector_line("D").ends_with("-"));
}

#[test]
fn test_export_defaults_to_xlsx() {
    let dir = setup_test_dir();
    let out_dir = dir.path().join("exports");
    fs::write(
        dir.path().join("config.toml"),
        format!("[export]\noutput_dir = {:?}\n", out_dir.display().to_string()),
    )
    .unwrap();

    cli(&dir)
        .args(["--days", "7", "export"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 7 readings"))
        .stdout(predicate::str::contains("XLSX:"));

    let bytes = fs::read(out_dir.join("Solo_export.xlsx")).expect("Failed to read export");
    // xlsx is a zip container
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_export_writes_csv() {
    let dir = setup_test_dir();
    let out = dir.path().join("exports").join("Solo_export.csv");

    cli(&dir)
        .args(["--days", "7", "export", "--format", "csv", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 7 readings"));

    let content = fs::read_to_string(&out).expect("Failed to read export");
    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("Data,pH,"));
    assert_eq!(lines.count(), 7);
}

#[test]
fn test_unknown_export_format_rejected() {
    let dir = setup_test_dir();
    cli(&dir)
        .args(["export", "--format", "ods"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown export format"));
}

#[test]
fn test_custom_species_file() {
    let dir = setup_test_dir();
    let species_path = dir.path().join("species.toml");
    fs::write(
        &species_path,
        r#"
[[species]]
name = "Ipê Amarelo"
productivity = "Média"
cycle = "Longo (15-20 anos)"
uses = "Paisagismo"

[[species.tolerances]]
field = "ph"
range = { min = 4.0, max = 8.0 }
"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("config.toml"),
        format!("[catalog]\nspecies_file = {:?}\n", species_path.display().to_string()),
    )
    .unwrap();

    cli(&dir)
        .args(["recommend", "--ph", "6.0", "--nitrogen", "25", "--phosphorus", "15", "--potassium", "120"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ipê Amarelo"));
}
