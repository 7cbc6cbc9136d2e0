use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

const ENV_VARS: &[&str] = &[
    "HOSTINTEL_CONFIG_PATH",
    "HOSTINTEL_CONFIG_JSON",
    "HOSTINTEL_API_KEY",
];

fn hostintelctl(dir: &tempfile::TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("hostintelctl");
    cmd.current_dir(dir.path());
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn check_config_reports_source_and_ignored_keys() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("hostintel.toml"),
        "[module]\napi_key = \"s3cret\"\ncolour = \"blue\"\n\n[source]\ntimeout = \"5s\"\n",
    )
    .unwrap();

    hostintelctl(&dir)
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("hostintel.toml"))
        .stdout(predicate::str::contains("\"colour\" will be ignored"))
        .stdout(predicate::str::contains("s3cret").not())
        .stdout(predicate::str::contains("timeout = \"5s\""));
}

#[test]
fn check_config_rejects_mistyped_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json");
    fs::write(&path, r#"{"module":{"maxnetblock":"wide"}}"#).unwrap();

    hostintelctl(&dir)
        .arg("check-config")
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("maxnetblock"));
}

#[test]
fn check_config_warns_about_missing_credential() {
    let dir = tempfile::tempdir().unwrap();

    hostintelctl(&dir)
        .arg("check-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in defaults"))
        .stdout(predicate::str::contains("no api_key configured"));
}

#[test]
fn run_without_credential_prints_only_the_seed() {
    let dir = tempfile::tempdir().unwrap();

    hostintelctl(&dir)
        .args(["run", "IP_ADDRESS=198.51.100.1"])
        .assert()
        .success()
        .stdout("IP_ADDRESS 198.51.100.1\n")
        .stderr(predicate::str::contains("without an API key"));
}

#[test]
fn unreachable_source_degrades_to_no_findings() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let config = format!(
        "{{\"module\":{{\"api_key\":\"k\"}},\"source\":{{\"endpoint\":\"http://{addr}/host/{{key}}?key={{credential}}\",\"timeout\":\"2s\"}}}}"
    );

    hostintelctl(&dir)
        .env("HOSTINTEL_CONFIG_JSON", config)
        .args(["run", "--format", "jsonl", "IP_ADDRESS=198.51.100.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"IP_ADDRESS\""))
        .stdout(predicate::str::contains("RAW_RIR_DATA").not());
}
