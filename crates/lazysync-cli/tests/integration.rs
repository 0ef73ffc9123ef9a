#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn config_path(dir: &TempDir) -> PathBuf {
    dir.path().join("lazysync.yaml")
}

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("shared/lazysync.db")
}

/// Run the binary as `host`, with HOME pointed into the temp dir so nothing
/// leaks into the real home directory.
fn lazysync(dir: &TempDir, host: &str) -> Command {
    let mut cmd = Command::cargo_bin("notmuch-lazysync").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("LAZYSYNC_CONFIG", config_path(dir))
        .env("LAZYSYNC_HOST", host)
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, num_hosts: Option<u32>, notmuch: Option<&Path>) {
    let mut text = format!("lazysync:\n  db_file: {}\n", db_path(dir).display());
    if let Some(n) = num_hosts {
        text.push_str(&format!("  num_hosts: {n}\n"));
    }
    if let Some(bin) = notmuch {
        text.push_str(&format!("  notmuch: {}\n", bin.display()));
    }
    std::fs::write(config_path(dir), text).unwrap();
}

fn show_json(dir: &TempDir) -> serde_json::Value {
    let out = lazysync(dir, "inspector")
        .args(["show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&out).unwrap()
}

fn seen_by(view: &serde_json::Value, index: usize) -> Vec<String> {
    view["commands"][index]["seen_by"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h.as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// CLI surface
// ---------------------------------------------------------------------------

#[test]
fn missing_subcommand_exits_with_one() {
    let dir = TempDir::new().unwrap();
    lazysync(&dir, "a")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No mode given."));
}

#[test]
fn first_run_writes_default_config() {
    let dir = TempDir::new().unwrap();
    lazysync(&dir, "a")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 commands in total."));

    let cfg = std::fs::read_to_string(config_path(&dir)).unwrap();
    assert!(cfg.contains("db_file: ~/.notmuch-lazysync.db"));
    assert!(cfg.contains("num_hosts:"));
    assert!(dir.path().join(".notmuch-lazysync.db").exists());
}

#[test]
fn config_without_db_file_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(config_path(&dir), "lazysync:\n  num_hosts: 2\n").unwrap();
    lazysync(&dir, "a")
        .arg("show")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no database file specified"));
    assert!(!db_path(&dir).exists());
}

#[test]
fn config_flag_overrides_env() {
    let dir = TempDir::new().unwrap();
    let other = dir.path().join("other.yaml");
    std::fs::write(
        &other,
        format!("lazysync:\n  db_file: {}\n", dir.path().join("other.db").display()),
    )
    .unwrap();

    lazysync(&dir, "a")
        .args(["--config", other.to_str().unwrap(), "record", "echo", "hi"])
        .assert()
        .success();
    assert!(dir.path().join("other.db").exists());
    assert!(!config_path(&dir).exists());
}

// ---------------------------------------------------------------------------
// record / show
// ---------------------------------------------------------------------------

#[test]
fn record_logs_command_seen_by_issuer() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, None, None);

    lazysync(&dir, "desk")
        .args(["record", "echo", "hello", "world"])
        .assert()
        .success();

    lazysync(&dir, "desk")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("echo hello world"))
        .stdout(predicate::str::contains("desk"))
        .stdout(predicate::str::contains("1 commands in total."));
}

#[test]
fn record_json_reports_id() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, None, None);

    let out = lazysync(&dir, "desk")
        .args(["--json", "record", "--", "ls", "-la"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["outcome"], "logged");
    assert!(v["id"].as_i64().is_some());

    let view = show_json(&dir);
    assert_eq!(view["commands"][0]["text"], "ls -la");
}

// ---------------------------------------------------------------------------
// replay / gc
// ---------------------------------------------------------------------------

#[test]
fn replay_runs_other_hosts_commands_once() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, None, None);
    let marker = dir.path().join("marker");

    lazysync(&dir, "desk")
        .args(["record", &format!("echo ran >> {}", marker.display())])
        .assert()
        .success();

    // The issuing host already applied it.
    lazysync(&dir, "desk").arg("replay").assert().success();
    assert!(!marker.exists());

    lazysync(&dir, "laptop").arg("replay").assert().success();
    assert_eq!(std::fs::read_to_string(&marker).unwrap(), "ran\n");

    lazysync(&dir, "laptop").arg("replay").assert().success();
    assert_eq!(std::fs::read_to_string(&marker).unwrap(), "ran\n");

    let view = show_json(&dir);
    assert_eq!(view["total"], 1);
    assert_eq!(seen_by(&view, 0), vec!["desk", "laptop"]);
}

#[test]
fn failing_command_is_retried_but_does_not_fail_replay() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, None, None);
    let gate = dir.path().join("gate");

    lazysync(&dir, "desk")
        .args(["record", &format!("test -e {}", gate.display())])
        .assert()
        .success();

    lazysync(&dir, "laptop")
        .arg("replay")
        .assert()
        .success()
        .stderr(predicate::str::contains("command failed"));
    assert_eq!(seen_by(&show_json(&dir), 0), vec!["desk"]);

    std::fs::write(&gate, "").unwrap();
    lazysync(&dir, "laptop").arg("replay").assert().success();
    assert_eq!(seen_by(&show_json(&dir), 0), vec!["desk", "laptop"]);
}

#[test]
fn gc_removes_commands_seen_by_all_hosts() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, Some(2), None);

    lazysync(&dir, "desk")
        .args(["record", "true"])
        .assert()
        .success();

    lazysync(&dir, "laptop")
        .args(["replay", "--no-gc"])
        .assert()
        .success();
    assert_eq!(show_json(&dir)["total"], 1);

    lazysync(&dir, "laptop").arg("replay").assert().success();
    assert_eq!(show_json(&dir)["total"], 0);
}

#[test]
fn replay_json_report() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, Some(3), None);

    lazysync(&dir, "desk").args(["record", "true"]).assert().success();
    lazysync(&dir, "desk").args(["record", "false"]).assert().success();

    let out = lazysync(&dir, "laptop")
        .args(["replay", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["host"], "laptop");
    assert_eq!(report["executed"].as_array().unwrap().len(), 1);
    assert_eq!(report["failed"].as_array().unwrap().len(), 1);
    assert_eq!(report["collected"], 0);
}

// ---------------------------------------------------------------------------
// tag commands through a stand-in notmuch
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn fake_notmuch(dir: &TempDir, mirroring: bool) -> (PathBuf, PathBuf) {
    use std::os::unix::fs::PermissionsExt;

    let log = dir.path().join("notmuch-batches.log");
    let script = dir.path().join("fake-notmuch");
    let body = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = config ]; then echo {mirroring}; exit 0; fi\n\
         if [ \"$1\" = tag ]; then cat \"${{2#--input=}}\" >> '{log}'; exit 0; fi\n\
         exit 1\n",
        log = log.display()
    );
    std::fs::write(&script, body).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    (script, log)
}

#[cfg(unix)]
#[test]
fn mirrored_tags_are_not_recorded() {
    let dir = TempDir::new().unwrap();
    let (notmuch, _) = fake_notmuch(&dir, true);
    write_config(&dir, None, Some(&notmuch));

    lazysync(&dir, "desk")
        .args(["record", "--", "notmuch", "tag", "-unread", "+flagged", "--", "id:1@x"])
        .assert()
        .success();
    assert_eq!(show_json(&dir)["total"], 0);

    lazysync(&dir, "desk")
        .args(["record", "--", "notmuch", "tag", "-unread", "+work", "--", "id:1@x"])
        .assert()
        .success();
    assert_eq!(show_json(&dir)["total"], 1);
}

#[cfg(unix)]
#[test]
fn mirrored_tags_are_recorded_when_mirroring_is_off() {
    let dir = TempDir::new().unwrap();
    let (notmuch, _) = fake_notmuch(&dir, false);
    write_config(&dir, None, Some(&notmuch));

    lazysync(&dir, "desk")
        .args(["record", "--", "notmuch", "tag", "-unread", "--", "id:1@x"])
        .assert()
        .success();
    assert_eq!(show_json(&dir)["total"], 1);
}

#[cfg(unix)]
#[test]
fn tag_commands_replay_as_one_batch() {
    let dir = TempDir::new().unwrap();
    let (notmuch, batches) = fake_notmuch(&dir, true);
    write_config(&dir, None, Some(&notmuch));

    lazysync(&dir, "desk")
        .args(["record", "--", "notmuch", "tag", "+work", "--", "id:1@x"])
        .assert()
        .success();
    lazysync(&dir, "desk")
        .args(["record", "--", "notmuch", "tag", "-inbox", "tag:spam"])
        .assert()
        .success();

    lazysync(&dir, "laptop").arg("replay").assert().success();
    assert_eq!(
        std::fs::read_to_string(&batches).unwrap(),
        "+work -- id:1@x\n-inbox tag:spam\n"
    );

    let view = show_json(&dir);
    assert_eq!(seen_by(&view, 0), vec!["desk", "laptop"]);
    assert_eq!(seen_by(&view, 1), vec!["desk", "laptop"]);

    // Nothing left to apply.
    lazysync(&dir, "laptop").arg("replay").assert().success();
    assert_eq!(
        std::fs::read_to_string(&batches).unwrap(),
        "+work -- id:1@x\n-inbox tag:spam\n"
    );
}

#[cfg(unix)]
#[test]
fn missing_notmuch_leaves_tag_commands_pending() {
    let dir = TempDir::new().unwrap();
    let (notmuch, _) = fake_notmuch(&dir, false);
    write_config(&dir, None, Some(&notmuch));
    lazysync(&dir, "desk")
        .args(["record", "--", "notmuch", "tag", "+a", "--", "id:1@x"])
        .assert()
        .success();

    write_config(&dir, None, Some(Path::new("no-such-notmuch-binary-3c9e")));
    lazysync(&dir, "laptop")
        .arg("replay")
        .assert()
        .success()
        .stderr(predicate::str::contains("failed to execute tag operations"));
    assert_eq!(seen_by(&show_json(&dir), 0), vec!["desk"]);
}
