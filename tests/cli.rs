use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

const CONFIG: &str = r#"
[general]
padding = 1
timezone = "utc"

[[volumes]]
path = "/data/logs"
rotation = "daily"
owner = "etl"
retention = 7

[[volumes]]
path = "/apps/warehouse"
rotation = "static"
owner = "hive"

[[volumes]]
path = "/mirrors/events"
rotation = "daily"
type = "mirror"
source_cluster = "dc1"
source_path = "/data/events"
retention = 30
"#;

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("volumizer.toml");
    let pidfile = dir.join("volumizer.pid");
    let body = body.replacen(
        "[general]",
        &format!("[general]\npidfile = {:?}", pidfile.display().to_string()),
        1,
    );
    std::fs::write(&path, body).unwrap();
    path
}

fn volumizer(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("volumizer").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("VOLUMIZER_PADDING")
        .env_remove("VOLUMIZER_LOG_LEVEL")
        .env_remove("VOLUMIZER_LOG_FILE")
        .env("VOLUMIZER_CONFIG", config);
    cmd
}

#[test]
fn check_config_lists_derived_names() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), CONFIG);

    volumizer(&config)
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("data.logs"))
        .stdout(predicate::str::contains("apps.warehouse"))
        .stdout(predicate::str::contains("mirror.dc1.mirrors.events"))
        .stdout(predicate::str::contains("3 volumes"));
}

#[test]
fn plan_shows_provisioning_and_sweep() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), CONFIG);

    volumizer(&config)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("data.logs.scratch"))
        .stdout(predicate::str::contains("/data/logs/scratch"))
        .stdout(predicate::str::contains("days [-9, -7)"));
}

#[test]
fn plan_json_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), CONFIG);

    let output = volumizer(&config)
        .args(["plan", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // one static, plus scratch and three days for each of the two daily volumes
    assert_eq!(plan["provision"].as_array().unwrap().len(), 9);
    assert_eq!(plan["padding"], 1);

    let sweeps = plan["sweeps"].as_array().unwrap();
    assert_eq!(sweeps.len(), 2);
    assert_eq!(sweeps[0]["volume"], "data.logs");
    assert_eq!(sweeps[0]["from_offset"], -9);
    assert_eq!(sweeps[0]["to_offset"], -7);
    assert_eq!(sweeps[0]["candidates"].as_array().unwrap().len(), 2);
}

#[test]
fn config_flag_overrides_environment() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), CONFIG);

    volumizer(&dir.path().join("missing.toml"))
        .arg("--config")
        .arg(&config)
        .arg("check-config")
        .assert()
        .success();
}

#[test]
fn missing_config_exits_one() {
    let dir = tempfile::tempdir().unwrap();

    volumizer(&dir.path().join("missing.toml"))
        .arg("plan")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn mirror_without_source_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        r#"
[general]

[[volumes]]
path = "/mirrors/events"
rotation = "daily"
type = "mirror"
source_cluster = "dc1"
"#,
    );

    volumizer(&config)
        .arg("check-config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("source_path"));
}

#[test]
fn held_lock_stops_a_pass_before_touching_the_cluster() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), CONFIG);
    std::fs::write(dir.path().join("volumizer.pid"), "1").unwrap();

    volumizer(&config)
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    assert!(dir.path().join("volumizer.pid").exists());
}
