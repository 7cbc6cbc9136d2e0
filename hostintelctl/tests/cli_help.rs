use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn top_level_help_lists_commands() {
    let mut cmd = cargo_bin_cmd!("hostintelctl");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("describe"))
        .stdout(predicate::str::contains("check-config"));
}

#[test]
fn run_help_documents_seed_syntax() {
    let mut cmd = cargo_bin_cmd!("hostintelctl");
    let output = cmd
        .arg("run")
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8_lossy(&output);
    assert!(text.contains("TYPE=DATA"), "run help missing seed syntax");
    assert!(text.contains("--format"), "run help missing --format");
    assert!(text.contains("--config"), "run help missing --config");
}

#[test]
fn describe_lists_watched_and_produced_types() {
    let mut cmd = cargo_bin_cmd!("hostintelctl");
    cmd.arg("describe")
        .assert()
        .success()
        .stdout(predicate::str::contains("sfp_hostintel"))
        .stdout(predicate::str::contains("NETBLOCK_OWNER"))
        .stdout(predicate::str::contains("RAW_RIR_DATA"))
        .stdout(predicate::str::contains("maxnetblock"));
}

#[test]
fn describe_json_is_machine_readable() {
    let mut cmd = cargo_bin_cmd!("hostintelctl");
    let output = cmd
        .args(["describe", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value =
        serde_json::from_slice(&output).expect("descriptor json");
    assert_eq!(value["name"], "sfp_hostintel");
    assert!(
        value["watched"]
            .as_array()
            .is_some_and(|types| types.iter().any(|t| t == "IP_ADDRESS"))
    );
}

#[test]
fn unknown_seed_type_is_rejected() {
    let mut cmd = cargo_bin_cmd!("hostintelctl");
    cmd.args(["run", "HOSTNAME=example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HOSTNAME"));
}
