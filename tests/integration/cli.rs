//! Integration tests for the metric-fanout binary

use crate::integration::test_utils::cli_command;
use tempfile::TempDir;

#[test]
fn test_keys_json_lists_well_known_keys() {
    let temp_dir = TempDir::new().unwrap();
    let output = cli_command(temp_dir.path())
        .args(["--quiet", "keys", "--format", "json"])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "keys should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["total"], 10);
    assert_eq!(value["keys"][8], "case-conn-est");
}

#[test]
fn test_emit_reports_counts_and_stats() {
    let temp_dir = TempDir::new().unwrap();
    let output = cli_command(temp_dir.path())
        .args([
            "--quiet",
            "emit",
            "pase-session",
            "--value",
            "1",
            "--repeat",
            "3",
            "--format",
            "json",
        ])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "emit should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["key"], "pase-session");
    assert_eq!(report["sinks"], serde_json::json!(["log", "counter"]));
    assert_eq!(report["counts"][0]["instants"], 3);
    assert_eq!(report["counts"][0]["last_value"]["kind"], "signed");
    assert_eq!(report["stats"]["delivered"], 6);
}

#[test]
fn test_log_sink_writes_records_to_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let output = cli_command(temp_dir.path())
        .args(["--log-format", "json", "emit", "wifi_rssi", "--value", "-61"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("metric_fanout::metric") && stderr.contains("wifi_rssi"),
        "log sink record missing from stderr: {}",
        stderr
    );
}

#[test]
fn test_invalid_config_exits_with_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("bad.toml");
    std::fs::write(&config_file, "[sinks.queue]\nenabled = true\ncapacity = 0\n").unwrap();

    let output = cli_command(temp_dir.path())
        .arg("--quiet")
        .arg("--config")
        .arg(&config_file)
        .arg("keys")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Sink 'queue'"), "stderr: {}", stderr);
}

#[test]
fn test_config_prints_effective_toml() {
    let temp_dir = TempDir::new().unwrap();
    let output = cli_command(temp_dir.path())
        .env("METRIC_FANOUT__SINKS__MEMORY__ENABLED", "true")
        .args(["--quiet", "config"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: toml::Value = toml::from_str(&stdout).unwrap();
    assert_eq!(parsed["sinks"]["memory"]["enabled"].as_bool(), Some(true));
}
