use std::process::Command;

/// Write a config whose scanner command just cats a fixture report.
fn write_config(dir: &std::path::Path, fixture: &str) {
    let config = format!(
        r#"
[llm]
api_key = "test-key"

[scan]
target_dir = "."
report_path = "report.json"
command = ["cat", "{fixture}"]
"#
    );
    std::fs::write(dir.join(".vigil.toml"), config).unwrap();
}

#[test]
fn scan_with_clean_report_finds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("clean.json"),
        r#"{"results": {"failed_checks": []}}"#,
    )
    .unwrap();
    write_config(dir.path(), "clean.json");

    let output = Command::new(env!("CARGO_BIN_EXE_vigil"))
        .arg("scan")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "vigil scan failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No failed checks found."), "got: {stdout}");
}

#[test]
fn scan_with_malformed_report_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), "not json at all").unwrap();
    write_config(dir.path(), "broken.json");

    let output = Command::new(env!("CARGO_BIN_EXE_vigil"))
        .arg("scan")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed"), "got: {stderr}");
}

#[test]
fn scan_json_emits_summary() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("clean.json"),
        r#"{"results": {"failed_checks": []}}"#,
    )
    .unwrap();
    write_config(dir.path(), "clean.json");

    let output = Command::new(env!("CARGO_BIN_EXE_vigil"))
        .args(["scan", "--json"])
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(summary["totalFindings"], 0);
}
