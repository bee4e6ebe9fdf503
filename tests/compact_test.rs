use assert_cmd::Command;
use predicates::prelude::*;
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

#[test]
fn compact_folds_inbox_into_archive_and_sweeps_sources() {
    let tmp = tempdir().expect("tempdir");
    let home = tmp.path().join("lifeos");

    write_inbox_record(
        &home,
        "2026-01-20_a1.json",
        r##"{
            "uuid": "a1",
            "date": "2026-01-20",
            "raw_text": "Built the archive merger.",
            "analysis": {
                "mood": 7.0,
                "tags": ["#LifeOS"],
                "life_data": {"baseline_safety": "Stable", "energy_stability": "High"}
            },
            "embedding": [0.1, 0.2]
        }"##,
    );
    fs::write(home.join("inbox/2026-01-20_a1.md"), "markdown twin").expect("write twin");
    write_inbox_record(
        &home,
        "2026-01-21_b2.json",
        r#"{"uuid": "b2", "date": "2026-01-21", "content": "Minimal entry."}"#,
    );
    write_inbox_record(&home, "2026-01-22_bad.json", "{definitely not json");

    lifeos_cmd(&home)
        .arg("compact")
        .assert()
        .success()
        .stdout(predicate::str::contains("merged_entries=2"))
        .stdout(predicate::str::contains("skipped_records=1"));

    let archive_dir = home.join("archive");
    assert!(archive_dir.join("journal.bin").exists());
    assert!(archive_dir.join("system_state.json").exists());
    assert!(home.join("logs/runs.jsonl").exists());

    let display = fs::read_to_string(archive_dir.join("lifeos_db.json")).expect("read display");
    assert!(display.contains("Built the archive merger."));
    assert!(display.contains("2026-01-20"));
    assert!(!display.contains("embedding"));

    // Folded sources are gone, including the markdown twin; the malformed
    // record stays pending for the next run.
    assert!(!home.join("inbox/2026-01-20_a1.json").exists());
    assert!(!home.join("inbox/2026-01-20_a1.md").exists());
    assert!(!home.join("inbox/2026-01-21_b2.json").exists());
    assert!(home.join("inbox/2026-01-22_bad.json").exists());
}

#[test]
fn recompacting_a_correction_supersedes_the_stale_entry() {
    let tmp = tempdir().expect("tempdir");
    let home = tmp.path().join("lifeos");

    write_inbox_record(
        &home,
        "2026-02-01_c3.json",
        r#"{"uuid": "c3", "date": "2026-02-01", "content": "first draft"}"#,
    );
    lifeos_cmd(&home).arg("compact").assert().success();

    write_inbox_record(
        &home,
        "2026-02-01_c3_fixed.json",
        r#"{"uuid": "c3", "date": "2026-02-01", "content": "corrected draft"}"#,
    );
    lifeos_cmd(&home)
        .arg("compact")
        .assert()
        .success()
        .stdout(predicate::str::contains("merged_entries=1"));

    let display =
        fs::read_to_string(home.join("archive/lifeos_db.json")).expect("read display");
    assert!(display.contains("corrected draft"));
    assert!(!display.contains("first draft"));
}

#[test]
fn compact_with_empty_inbox_is_a_quiet_no_op() {
    let tmp = tempdir().expect("tempdir");
    let home = tmp.path().join("lifeos");
    fs::create_dir_all(home.join("inbox")).expect("mkdir inbox");

    lifeos_cmd(&home)
        .arg("compact")
        .assert()
        .success()
        .stdout(predicate::str::contains("no pending records to compact"));

    assert!(!home.join("archive/journal.bin").exists());
}

#[test]
fn dry_run_writes_nothing_and_sweeps_nothing() {
    let tmp = tempdir().expect("tempdir");
    let home = tmp.path().join("lifeos");

    write_inbox_record(
        &home,
        "2026-03-01_d4.json",
        r#"{"uuid": "d4", "date": "2026-03-01", "content": "still pending"}"#,
    );

    lifeos_cmd(&home)
        .arg("compact")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("dry-run"));

    assert!(home.join("inbox/2026-03-01_d4.json").exists());
    assert!(!home.join("archive/journal.bin").exists());
}
