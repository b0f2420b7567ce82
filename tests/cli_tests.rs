//! Integration tests for the CLI interface
//!
//! Each test points `-c` at its own settings file so the host's
//! configuration never leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("ganymede.toml");
    std::fs::write(&path, body).unwrap();
    path
}

fn file_store_config(dir: &Path) -> PathBuf {
    let data_dir = dir.join("data");
    write_config(
        dir,
        &format!(
            "[store]\nbackend = \"file\"\ndata_dir = {:?}\ndatabase = \"ganymede\"\n",
            data_dir.display().to_string()
        ),
    )
}

fn ganymede_agg() -> Command {
    let mut cmd = Command::cargo_bin("ganymede-agg").unwrap();
    cmd.env_remove("GANYMEDE_CONFIG")
        .env_remove("GANYMEDE_STORE_BACKEND")
        .env_remove("GANYMEDE_DATA_DIR")
        .env_remove("GANYMEDE_DATABASE")
        .env_remove("GANYMEDE_MAX_CONCURRENT_JOBS")
        .env_remove("GANYMEDE_LOG_LEVEL");
    cmd
}

#[test]
fn test_cli_help_flag() {
    ganymede_agg()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("render"));
}

#[test]
fn test_invalid_command() {
    ganymede_agg()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_list_shows_builtin_jobs() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "");

    ganymede_agg()
        .arg("-c")
        .arg(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("server_disks"))
        .stdout(predicate::str::contains("drs_cluster_pairs"))
        .stdout(predicate::str::contains("geos${run_id}"));
}

#[test]
fn test_render_shell_script() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "");

    ganymede_agg()
        .arg("-c")
        .arg(&config)
        .args([
            "render",
            "--job",
            "server_disks",
            "--filter",
            r#"{"report_period": "2016-05"}"#,
            "--run-id",
            "42",
            "--format",
            "shell",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "// server_disks\ndb.getCollection(\"servers\").aggregate([",
        ))
        .stdout(predicate::str::contains("\"$unwind\": \"$hardware.disk\""))
        .stdout(predicate::str::contains("\"$out\": \"serverdisks42\""));
}

#[test]
fn test_render_json_for_all_jobs() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "");

    let output = ganymede_agg()
        .arg("-c")
        .arg(&config)
        .args(["render", "--run-id", "7"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rendered: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let jobs = rendered.as_array().unwrap();
    assert_eq!(jobs.len(), ganymede_aggregations::builtin_shapes().len());

    let geos = jobs.iter().find(|j| j["job"] == "mcp_geos").unwrap();
    assert_eq!(geos["source"], "mcps");
    assert_eq!(geos["pipeline"][0], serde_json::json!({"$match": {}}));
    assert_eq!(geos["pipeline"][3]["$out"], "geos7");
}

#[test]
fn test_render_uses_enabled_jobs_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "[jobs]\nenabled = [\"image_disks\"]\n");

    ganymede_agg()
        .arg("-c")
        .arg(&config)
        .args(["render", "--run-id", "1", "--format", "shell"])
        .assert()
        .success()
        .stdout(predicate::str::contains("// image_disks"))
        .stdout(predicate::str::contains("server_disks").not());
}

#[test]
fn test_unknown_job_fails_with_shape_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "");

    ganymede_agg()
        .arg("-c")
        .arg(&config)
        .args(["render", "--job", "server_fans"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains(
            "Aggregation job 'server_fans' is misconfigured",
        ));
}

#[test]
fn test_bad_filter_fails_with_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "");

    ganymede_agg()
        .arg("-c")
        .arg(&config)
        .args(["render", "--filter", "{not json"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Filter is not valid JSON"));
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().unwrap();

    ganymede_agg()
        .arg("-c")
        .arg(temp_dir.path().join("absent.toml"))
        .arg("list")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn test_run_against_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_store_config(temp_dir.path());
    let db_dir = temp_dir.path().join("data").join("ganymede");
    std::fs::create_dir_all(&db_dir).unwrap();
    std::fs::write(
        db_dir.join("servers.jsonl"),
        concat!(
            r#"{"_id": "a", "general": {"server_id": "srv-001"}, "hardware": {"disk": [{"slot": 0}, {"slot": 1}, {"slot": 2}]}, "report_period": "2016-05", "ganymede_doc_version": 3}"#,
            "\n",
            r#"{"_id": "b", "general": {"server_id": "srv-002"}, "hardware": {"disk": []}, "report_period": "2016-05", "ganymede_doc_version": 3}"#,
            "\n",
        ),
    )
    .unwrap();

    ganymede_agg()
        .arg("-c")
        .arg(&config)
        .args(["run", "--job", "server_disks", "--run-id", "42", "--sequential"])
        .assert()
        .success()
        .stdout(predicate::str::contains("server_disks -> serverdisks42"));

    let output = std::fs::read_to_string(db_dir.join("serverdisks42.jsonl")).unwrap();
    let docs: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(docs.len(), 3);
    assert!(docs.iter().all(|d| d.get("_id").is_none()));
    assert_eq!(docs[2]["hardware"]["disk"]["slot"], 2);
}

#[test]
fn test_run_env_overrides_backend() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_store_config(temp_dir.path());

    ganymede_agg()
        .arg("-c")
        .arg(&config)
        .env("GANYMEDE_STORE_BACKEND", "memory")
        .args(["run", "--job", "mcp_geos", "--run-id", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mcp_geos -> geos3"));

    assert!(!temp_dir.path().join("data").exists());
}

#[test]
fn test_run_rejected_output_name() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_store_config(temp_dir.path());

    let assert = ganymede_agg()
        .arg("-c")
        .arg(&config)
        .args(["run", "--job", "image_disks", "--run-id", "x$y"])
        .assert()
        .failure()
        .code(4);

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert_eq!(
        stderr
            .matches("Output collection name 'imagedisksx$y' is not valid")
            .count(),
        1,
        "{}",
        stderr
    );
}

#[test]
fn test_run_reports_each_failed_job() {
    let temp_dir = TempDir::new().unwrap();
    let config = file_store_config(temp_dir.path());

    ganymede_agg()
        .arg("-c")
        .arg(&config)
        .args([
            "run", "--job", "image_disks", "--job", "mcp_geos", "--run-id", "x$y",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("❌ image_disks:"))
        .stderr(predicate::str::contains("❌ mcp_geos:"))
        .stderr(predicate::str::contains("2 of 2 jobs failed"));
}
