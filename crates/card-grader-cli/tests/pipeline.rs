//! Pipeline integration tests using synthetic card photos.
//!
//! Runs the full grading pipeline end to end, including the pixel
//! analyzer and the `grade` and `standards` subcommands.

#![allow(
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::expect_used,
    clippy::missing_panics_doc,
    deprecated
)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use card_grader_test_support::{AnalysisResultsBuilder, SyntheticCardBuilder};
use predicates::prelude::*;
use serde_json::Value;

fn card_grader(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("card-grader").unwrap();
    cmd.env("XDG_CONFIG_HOME", home).current_dir(home);
    cmd
}

/// Create a temporary directory with synthetic card photos.
fn create_cards(cards: Vec<(&str, SyntheticCardBuilder)>) -> tempfile::TempDir {
    let temp_dir = tempfile::tempdir().unwrap();
    for (name, card) in cards {
        card.save(&temp_dir.path().join(name)).unwrap();
    }
    temp_dir
}

fn grade_jsonl(dir: &Path, target: &Path, analyzer: &str) -> Vec<Value> {
    let output = card_grader(dir)
        .args(["--analyzer", analyzer, "--format", "jsonl", "-q"])
        .arg(target)
        .output()
        .unwrap();
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn score(record: &Value, criterion: &str) -> f64 {
    record["analysis_results"][criterion]["score"]
        .as_f64()
        .unwrap()
}

// === Vision analyzer ===

#[test]
fn test_vision_grades_centered_card() {
    let temp_dir = create_cards(vec![("card.png", SyntheticCardBuilder::standard())]);

    let records = grade_jsonl(temp_dir.path(), &temp_dir.path().join("card.png"), "vision");
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record["analyzer"], "vision");
    for criterion in ["edges", "corners", "surface", "centering"] {
        let s = score(record, criterion);
        assert!((0.0..=100.0).contains(&s), "{criterion} {s}");
    }
    assert!(score(record, "centering") > 90.0);

    let grade = record["grading_report"]["predicted_grade"].as_u64().unwrap();
    assert!((1..=10).contains(&grade));
}

#[test]
fn test_vision_penalizes_off_center_card() {
    let temp_dir = create_cards(vec![
        ("a_centered.png", SyntheticCardBuilder::standard()),
        ("b_shifted.png", SyntheticCardBuilder::standard().offset(30, 0)),
    ]);

    let records = grade_jsonl(temp_dir.path(), temp_dir.path(), "vision");
    assert_eq!(records.len(), 2);
    assert!(score(&records[1], "centering") < score(&records[0], "centering"));
}

#[test]
fn test_vision_penalizes_speckled_surface() {
    let temp_dir = create_cards(vec![
        ("a_clean.png", SyntheticCardBuilder::standard()),
        ("b_speckled.png", SyntheticCardBuilder::standard().speckled(3)),
    ]);

    let records = grade_jsonl(temp_dir.path(), temp_dir.path(), "vision");
    assert!(score(&records[1], "surface") < score(&records[0], "surface"));
}

#[test]
fn test_undecodable_image_is_skipped() {
    let temp_dir = create_cards(vec![("good.png", SyntheticCardBuilder::standard())]);
    fs::write(temp_dir.path().join("broken.png"), b"not an image").unwrap();

    let output = card_grader(temp_dir.path())
        .args(["--analyzer", "vision", "--format", "jsonl"])
        .arg(temp_dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("good.png"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Skipping"));
}

#[test]
fn test_grading_is_repeatable() {
    let temp_dir = create_cards(vec![("card.png", SyntheticCardBuilder::standard())]);
    let path = temp_dir.path().join("card.png");

    let first = grade_jsonl(temp_dir.path(), &path, "vision");
    let second = grade_jsonl(temp_dir.path(), &path, "vision");
    assert_eq!(first[0]["analysis_results"], second[0]["analysis_results"]);
    assert_eq!(first[0]["grading_report"], second[0]["grading_report"]);
    assert_ne!(first[0]["request_id"], second[0]["request_id"]);
}

// === grade subcommand ===

#[test]
fn test_grade_subcommand_text() {
    let temp_dir = tempfile::tempdir().unwrap();
    let results = AnalysisResultsBuilder::new()
        .edges(90.0)
        .corners(96.0)
        .surface(96.0)
        .centering(92.0)
        .build();
    let path = temp_dir.path().join("results.json");
    fs::write(&path, serde_json::to_string(&results).unwrap()).unwrap();

    card_grader(temp_dir.path())
        .arg("grade")
        .arg(&path)
        .assert()
        .code(0)
        .stdout(
            predicate::str::contains("OVERALL GRADE: 9/10 (Mint)")
                .and(predicate::str::contains("Overall Score: 93.90/100"))
                .and(predicate::str::contains("Analyzer: precomputed")),
        );
}

#[test]
fn test_grade_subcommand_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("results.json");
    fs::write(
        &path,
        r#"{
            "edges": {"score": 100.0},
            "corners": {"score": 100.0},
            "surface": {"score": 100.0},
            "centering": {"score": 100.0}
        }"#,
    )
    .unwrap();

    let output = card_grader(temp_dir.path())
        .args(["grade", "--format", "json"])
        .arg(&path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let record: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["grading_report"]["predicted_grade"], 10);
    assert_eq!(record["grading_report"]["grade_description"], "Gem Mint");
    assert_eq!(record["grading_report"]["confidence_level"], "High");
    assert_eq!(record["company_comparison"]["meets_gem_mint"], true);
    assert_eq!(record["grading_report"]["psa_compliance"]["overall_compliant"], true);
}

#[test]
fn test_grade_subcommand_rejects_bad_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("results.json");
    fs::write(&path, "{ not json").unwrap();

    card_grader(temp_dir.path())
        .arg("grade")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid analysis results"));
}

#[test]
fn test_grade_subcommand_missing_file() {
    let temp_dir = tempfile::tempdir().unwrap();

    card_grader(temp_dir.path())
        .arg("grade")
        .arg(temp_dir.path().join("missing.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read results file"));
}

// === standards subcommand ===

#[test]
fn test_standards_text_table() {
    let temp_dir = tempfile::tempdir().unwrap();

    card_grader(temp_dir.path())
        .arg("standards")
        .assert()
        .code(0)
        .stdout(
            predicate::str::contains("Gem Mint")
                .and(predicate::str::contains("Near Mint-Mint"))
                .and(predicate::str::contains("Poor")),
        );
}

#[test]
fn test_standards_json() {
    let temp_dir = tempfile::tempdir().unwrap();

    let output = card_grader(temp_dir.path())
        .args(["standards", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let tiers: Value = serde_json::from_slice(&output.stdout).unwrap();
    let tiers = tiers.as_array().unwrap();
    assert_eq!(tiers.len(), 10);
    assert_eq!(tiers[0]["grade"], 10);
    assert_eq!(tiers[0]["min_score"], 95.0);
    assert_eq!(tiers[0]["centering_tolerance"]["front"], 55);
    assert_eq!(tiers[9]["min_score"], 0.0);
}
