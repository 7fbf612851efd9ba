//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn srs(config: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("srs").unwrap();
    cmd.arg("--config").arg(config).env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, backend: &str) -> PathBuf {
    let path = dir.path().join("srs.toml");
    let contents = format!(
        "backend = \"{backend}\"\n\
         database_path = {:?}\n\
         records_path = {:?}\n\
         catalog_path = {:?}\n\
         log_level = \"warn\"\n",
        dir.path().join("srs.sqlite3"),
        dir.path().join("records.json"),
        dir.path().join("catalog.json"),
    );
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn add_and_list_due_items() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "sqlite");

    srs(&config)
        .args(["add", "alpha", "beta", "alpha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 2 new item(s)"));

    srs(&config)
        .arg("due")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 item(s) due for review"))
        .stdout(predicate::str::contains("- alpha"))
        .stdout(predicate::str::contains("- beta"));
}

#[test]
fn review_then_advance_day() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "sqlite");

    srs(&config).args(["add", "alpha", "beta"]).assert().success();

    srs(&config)
        .arg("review")
        .write_stdin("4\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/2] alpha"))
        .stdout(predicate::str::contains("Session complete: 2 item(s) reviewed"));

    srs(&config)
        .arg("review")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to review"));

    srs(&config).arg("advance-day").assert().success();

    srs(&config)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Items: 2"))
        .stdout(predicate::str::contains("Records: 2"))
        .stdout(predicate::str::contains("Due: 2"));
}

#[test]
fn export_and_import_between_backends() {
    let source = TempDir::new().unwrap();
    let source_config = write_config(&source, "sqlite");
    let backup = source.path().join("backup.json");

    srs(&source_config).args(["add", "alpha", "beta"]).assert().success();
    srs(&source_config)
        .arg("review")
        .write_stdin("3\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session aborted"));
    srs(&source_config)
        .arg("export")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 item(s) and 1 record(s)"));

    let target = TempDir::new().unwrap();
    let target_config = write_config(&target, "json");
    srs(&target_config)
        .arg("import")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 item(s) and 1 record(s)"));

    srs(&target_config)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Items: 2"))
        .stdout(predicate::str::contains("Records: 1"));
}

#[test]
fn advance_day_needs_sqlite() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "json");

    srs(&config)
        .arg("advance-day")
        .assert()
        .failure()
        .stderr(predicate::str::contains("only kept by the sqlite backend"));
}

#[test]
fn missing_config_fails() {
    let dir = TempDir::new().unwrap();

    srs(&dir.path().join("missing.toml"))
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}
