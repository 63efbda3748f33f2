use predicates::prelude::*;
use tempfile::TempDir;
use test_env::{setup_test_env, stages_cmd};

fn add_foundation(temp_dir: &TempDir) {
    stages_cmd(temp_dir)
        .args([
            "add",
            "--name", "Foundation",
            "--start", "2023-05-01T08:00:00Z",
            "--end", "2023-05-01T16:00:00Z",
            "--unit", "HOURS",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created construction stage Foundation (id: 1)"))
        .stdout(predicate::str::contains("8 HOURS"));
}

#[test]
fn test_version_command() {
    let (temp_dir, _guard) = setup_test_env();
    stages_cmd(&temp_dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_database_created_at_configured_location() {
    let (temp_dir, _guard) = setup_test_env();
    stages_cmd(&temp_dir).arg("list").assert().success();
    assert!(temp_dir.path().join("test.db").exists());
}

#[test]
fn test_list_empty() {
    let (temp_dir, _guard) = setup_test_env();
    stages_cmd(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No construction stages found."));
}

#[test]
fn test_add_and_list() {
    let (temp_dir, _guard) = setup_test_env();
    add_foundation(&temp_dir);

    stages_cmd(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("ID"))
        .stdout(predicate::str::contains("Foundation"))
        .stdout(predicate::str::contains("2023-05-01T16:00:00Z"))
        .stdout(predicate::str::contains("NEW"));
}

#[test]
fn test_add_json_output() {
    let (temp_dir, _guard) = setup_test_env();
    let output = stages_cmd(&temp_dir)
        .args([
            "add", "--json",
            "--name", "Slab",
            "--start", "2022-01-01T00:00:00Z",
            "--end", "2022-01-03T00:00:00Z",
            "--unit", "DAYS",
            "--color", "#F00",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stage: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stage["id"], 1);
    assert_eq!(stage["duration"], 2.0);
    assert_eq!(stage["startDate"], "2022-01-01T00:00:00Z");
    assert_eq!(stage["endDate"], "2022-01-03T00:00:00Z");
    assert_eq!(stage["color"], "#F00");
    assert_eq!(stage["status"], "NEW");
}

#[test]
fn test_add_validation_error() {
    let (temp_dir, _guard) = setup_test_env();
    stages_cmd(&temp_dir)
        .args([
            "add",
            "--name", "Backfill",
            "--start", "2023-05-02T00:00:00Z",
            "--end", "2023-05-01T00:00:00Z",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("End date cannot be sooner than start date."));

    stages_cmd(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No construction stages found."));
}

#[test]
fn test_show() {
    let (temp_dir, _guard) = setup_test_env();
    add_foundation(&temp_dir);

    stages_cmd(&temp_dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stage 1: Foundation"))
        .stdout(predicate::str::contains("Status:      NEW"));

    stages_cmd(&temp_dir)
        .args(["show", "2"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Construction stage with ID 2 not found."));
}

#[test]
fn test_invalid_stage_id() {
    let (temp_dir, _guard) = setup_test_env();
    stages_cmd(&temp_dir)
        .args(["show", "abc"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid stage ID"));
}

#[test]
fn test_status_update() {
    let (temp_dir, _guard) = setup_test_env();
    add_foundation(&temp_dir);

    stages_cmd(&temp_dir)
        .args(["status", "1", "PLANNED"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Patching construction with id: 1 status changed to PLANNED!"));

    stages_cmd(&temp_dir)
        .args(["status", "1", "DONE"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid status value!"));

    stages_cmd(&temp_dir)
        .args(["status", "9", "NEW"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Construction stage with ID 9 not found."));

    stages_cmd(&temp_dir)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status:      PLANNED"));
}

#[test]
fn test_delete_is_soft() {
    let (temp_dir, _guard) = setup_test_env();
    add_foundation(&temp_dir);

    stages_cmd(&temp_dir)
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Patching construction with id: 1 status changed to deleted!"));

    // Row is still listed, now DELETED; deleting again is a no-op success
    stages_cmd(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("DELETED"));
    stages_cmd(&temp_dir).args(["delete", "1"]).assert().success();

    stages_cmd(&temp_dir)
        .args(["delete", "5"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Construction stage with ID 5 not found."));
}

#[test]
fn test_request_command() {
    let (temp_dir, _guard) = setup_test_env();

    stages_cmd(&temp_dir)
        .args([
            "request", "POST", "/stages",
            r#"{"name":"Roof","startDate":"2023-06-01T00:00:00Z","endDate":"2023-06-15T00:00:00Z","durationUnit":"WEEKS","status":"PLANNED"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""duration":2.0"#))
        .stdout(predicate::str::contains(r#""status":"PLANNED""#));

    stages_cmd(&temp_dir)
        .args(["request", "get", "/stages"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name":"Roof""#));

    stages_cmd(&temp_dir)
        .args(["request", "PATCH", "/stages/1", r#"{"status":"NOPE"}"#])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid status value! (HTTP 400)"));

    stages_cmd(&temp_dir)
        .args(["request", "GET", "/elsewhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 404"));

    stages_cmd(&temp_dir)
        .args(["request", "TRACE", "/stages"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unsupported method"));
}
