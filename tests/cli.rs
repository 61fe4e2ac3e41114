use assert_cmd::prelude::*;
use serde_json::Value;
use std::process::Command;

fn overlay_pilot() -> Command {
    let mut cmd = Command::cargo_bin("overlay-pilot").expect("binary built");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    serde_json::from_str(&stdout).expect("valid json")
}

#[test]
fn actions_lists_the_catalogue_as_json() {
    let value = stdout_json(overlay_pilot().args(["--output", "json", "actions", "--app", "sheets"]));
    let names: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|descriptor| descriptor["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["markTaskDone", "talkToUser", "runCode", "setCellValue", "highlightCell"]
    );
}

#[test]
fn actions_prints_the_prompt_block_for_humans() {
    let assert = overlay_pilot()
        .args(["actions", "--app", "bi"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("updateSqlQuery"));
    assert!(stdout.contains("Required fields: sql"));
}

#[test]
fn selectors_show_the_embedded_profile() {
    let value = stdout_json(overlay_pilot().args(["-o", "json", "selectors", "--app", "bi"]));
    assert_eq!(
        value["selectors"]["run_button"]["selector"],
        "//button[@aria-label='Get Answer']"
    );
    assert!(value["queries"]["results"].is_object());
}

#[test]
fn unknown_apps_fail() {
    overlay_pilot()
        .args(["selectors", "--app", "crm"])
        .assert()
        .failure();
}

#[test]
fn config_show_reads_the_given_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "controllers:\n  max_result_rows: 7\n").unwrap();

    let value = stdout_json(overlay_pilot().args([
        "--config",
        path.to_str().unwrap(),
        "--output",
        "json",
        "config",
        "show",
    ]));
    assert_eq!(value["controllers"]["max_result_rows"], 7);
    assert_eq!(value["dispatcher"]["serialize"], false);
}

#[test]
fn run_rejects_non_object_args_before_attaching() {
    overlay_pilot()
        .args(["run", "--app", "bi", "--action", "updateSqlQuery", "--args", "[1]"])
        .assert()
        .failure();
}
