use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn lifeos_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lifeos").expect("binary");
    cmd.env("LIFEOS_HOME", home);
    cmd
}

fn write_inbox_record(home: &Path, name: &str, body: &str) {
    let inbox = home.join("inbox");
    fs::create_dir_all(&inbox).expect("mkdir inbox");
    fs::write(inbox.join(name), body).expect("write record");
}

fn tagged_record(id: &str, date: &str) -> String {
    format!(
        r##"{{"uuid": "{id}", "date": "{date}", "content": "log",
            "analysis": {{"tags": ["#Compiler"],
                          "life_data": {{"baseline_safety": "Stable", "energy_stability": "High"}}}}}}"##
    )
}

#[test]
fn compact_derives_active_projects_and_nominal_status() {
    let tmp = tempdir().expect("tempdir");
    let home = tmp.path().join("lifeos");

    write_inbox_record(&home, "e1.json", &tagged_record("e1", "2026-01-01"));
    write_inbox_record(&home, "e2.json", &tagged_record("e2", "2026-01-02"));
    write_inbox_record(&home, "e3.json", &tagged_record("e3", "2026-01-03"));

    lifeos_cmd(&home).arg("compact").assert().success();

    let raw = fs::read_to_string(home.join("archive/system_state.json")).expect("read state");
    let state: Value = serde_json::from_str(&raw).expect("parse state");

    let active: Vec<&str> = state["active_projects"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(active, vec!["Compiler"]);
    assert_eq!(state["system_status"]["mode"], "BUILD");
    assert_eq!(state["system_status"]["reason"], "All Systems Nominal");
}

#[test]
fn recent_low_energy_entry_switches_the_system_to_maintenance() {
    let tmp = tempdir().expect("tempdir");
    let home = tmp.path().join("lifeos");

    write_inbox_record(&home, "ok.json", &tagged_record("ok", "2026-01-01"));
    write_inbox_record(
        &home,
        "low.json",
        r#"{"uuid": "low", "date": "2026-01-02", "content": "exhausted",
            "analysis": {"life_data": {"energy_stability": "Low"}}}"#,
    );

    lifeos_cmd(&home)
        .arg("compact")
        .assert()
        .success()
        .stdout(predicate::str::contains("mode=MAINTENANCE"));

    let raw = fs::read_to_string(home.join("archive/system_state.json")).expect("read state");
    let state: Value = serde_json::from_str(&raw).expect("parse state");
    assert_eq!(state["system_status"]["mode"], "MAINTENANCE");
    assert_eq!(
        state["system_status"]["reason"],
        "Safety Protocol Triggered on 2026-01-02"
    );
}

#[test]
fn state_command_recomputes_from_the_archive_without_merging() {
    let tmp = tempdir().expect("tempdir");
    let home = tmp.path().join("lifeos");

    write_inbox_record(&home, "s1.json", &tagged_record("s1", "2026-01-05"));
    lifeos_cmd(&home).arg("compact").assert().success();

    lifeos_cmd(&home)
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("archive_entries=1"))
        .stdout(predicate::str::contains("All Systems Nominal"));
}

#[test]
fn state_command_on_an_empty_home_reports_the_no_data_default() {
    let tmp = tempdir().expect("tempdir");
    let home = tmp.path().join("lifeos");
    fs::create_dir_all(&home).expect("mkdir");

    lifeos_cmd(&home)
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("archive_entries=0"))
        .stdout(predicate::str::contains("No Data"));
}

#[test]
fn window_size_override_narrows_the_tag_window() {
    let tmp = tempdir().expect("tempdir");
    let home = tmp.path().join("lifeos");

    write_inbox_record(&home, "e1.json", &tagged_record("e1", "2026-01-01"));
    write_inbox_record(&home, "e2.json", &tagged_record("e2", "2026-01-02"));
    write_inbox_record(&home, "e3.json", &tagged_record("e3", "2026-01-03"));

    lifeos_cmd(&home)
        .env("LIFEOS_WINDOW_SIZE", "2")
        .arg("compact")
        .assert()
        .success();

    let raw = fs::read_to_string(home.join("archive/system_state.json")).expect("read state");
    let state: Value = serde_json::from_str(&raw).expect("parse state");
    assert!(state["active_projects"].as_array().expect("array").is_empty());
}
