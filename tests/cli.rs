use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn analyzer(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("review-analyzer").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn analyzes_a_single_paragraph() {
    let dir = TempDir::new().unwrap();

    analyzer(&dir)
        .args(["--text", "This product is amazing and works great."])
        .assert()
        .success()
        .stdout(predicate::str::contains("POSITIVE"));

    assert!(!dir.path().join("analysis_output.csv").exists());
}

#[test]
fn single_paragraph_as_json() {
    let dir = TempDir::new().unwrap();

    let output = analyzer(&dir)
        .args(["--output-format", "json", "--text", "The battery died and the support was terrible."])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["result"]["sentiment"], "NEGATIVE");
    assert_eq!(value["backend"], "offline");
}

#[test]
fn file_report_as_json() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("reviews.csv"),
        "review\nExcellent quality and fast shipping.\nTerrible fit and poor stitching.\n",
    )
    .unwrap();

    let output = analyzer(&dir)
        .args(["reviews.csv", "--output-format", "json", "-v"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["source"]["file_name"], "reviews.csv");
    assert_eq!(value["analysis_summary"]["total_blocks"], 2);
    assert_eq!(value["results"].as_array().unwrap().len(), 2);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Extracting text from reviews.csv"));
}

#[test]
fn dry_run_as_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "first line\nsecond line").unwrap();

    let output = analyzer(&dir)
        .args(["notes.txt", "--dry-run", "--output-format", "json", "-v"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["count"], 2);
    assert_eq!(value["blocks"][1], "second line");
}

#[test]
fn blank_text_is_rejected() {
    let dir = TempDir::new().unwrap();

    analyzer(&dir)
        .args(["--text", "   "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Please enter some text."));
}

#[test]
fn csv_reviews_are_exported() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("reviews.csv"),
        "id,review\n1,Excellent quality and fast shipping.\n2,\n3,Terrible fit and poor stitching.\n",
    )
    .unwrap();

    analyzer(&dir)
        .arg("reviews.csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 text block(s) extracted from reviews.csv"));

    let export = fs::read_to_string(dir.path().join("analysis_output.csv")).unwrap();
    let lines: Vec<&str> = export.lines().collect();
    assert_eq!(lines[0], "Text,Summary,Sentiment,Confidence");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("POSITIVE"));
    assert!(lines[2].contains("NEGATIVE"));
}

#[test]
fn existing_export_needs_force() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "Great staff.\nRooms were dirty.").unwrap();
    fs::write(dir.path().join("analysis_output.csv"), "old").unwrap();

    analyzer(&dir)
        .arg("notes.txt")
        .assert()
        .code(6)
        .stderr(predicate::str::contains("--force"));

    analyzer(&dir).args(["notes.txt", "--force"]).assert().success();

    let export = fs::read_to_string(dir.path().join("analysis_output.csv")).unwrap();
    assert!(export.starts_with("Text,Summary,Sentiment,Confidence\n"));
}

#[test]
fn custom_output_path() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "Lovely view.").unwrap();

    analyzer(&dir)
        .args(["notes.txt", "--output", "results/notes.csv"])
        .assert()
        .success();

    assert!(dir.path().join("results/notes.csv").exists());
}

#[test]
fn missing_review_column() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("reviews.csv"), "comment,rating\nNice,5\n").unwrap();

    analyzer(&dir)
        .arg("reviews.csv")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("CSV must contain a column named 'review'"));

    assert!(!dir.path().join("analysis_output.csv").exists());
}

#[test]
fn unsupported_file_type() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("slides.pptx"), "not a deck").unwrap();

    analyzer(&dir)
        .arg("slides.pptx")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported file type: slides.pptx"));
}

#[test]
fn dry_run_lists_blocks_without_exporting() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "first line\nsecond line").unwrap();

    analyzer(&dir)
        .args(["notes.txt", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 text block(s) extracted from notes.txt"))
        .stdout(predicate::str::contains("second line"));

    assert!(!dir.path().join("analysis_output.csv").exists());
}

#[test]
fn partial_config_and_max_length_alone() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cfg.toml"), "[output]\nfile_name = \"scores.csv\"\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "The room was clean and the staff were friendly.").unwrap();

    analyzer(&dir)
        .args(["notes.txt", "--config", "cfg.toml", "--max-length", "20"])
        .assert()
        .success();

    assert!(dir.path().join("scores.csv").exists());
    assert!(!dir.path().join("analysis_output.csv").exists());
}

#[test]
fn existing_json_report_stops_before_export() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("cfg.toml"), "[output]\nwrite_json_report = true\n").unwrap();
    fs::write(dir.path().join("analysis_output.json"), "{}").unwrap();
    fs::write(dir.path().join("notes.txt"), "Great staff.").unwrap();

    analyzer(&dir)
        .args(["notes.txt", "--config", "cfg.toml"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("analysis_output.json"));

    assert!(!dir.path().join("analysis_output.csv").exists());
}

#[test]
fn generates_sample_config() {
    let dir = TempDir::new().unwrap();

    analyzer(&dir)
        .args(["--generate-config", "--config", "custom.toml"])
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("custom.toml")).unwrap();
    assert!(content.contains("[inference]"));
}
