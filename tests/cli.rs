use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn scribe(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("scribe").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path())
        .env_remove("SCRIBE_LANGUAGE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    scribe(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("commit"))
        .stdout(predicate::str::contains("pr"))
        .stdout(predicate::str::contains("--language"));
}

#[test]
fn commit_outside_repository_fails() {
    let home = TempDir::new().unwrap();
    let workdir = TempDir::new().unwrap();
    scribe(&home)
        .current_dir(workdir.path())
        .arg("commit")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not a git repository"));
}

#[test]
fn config_style_round_trips_through_file() {
    let home = TempDir::new().unwrap();
    scribe(&home)
        .args(["config", "set", "style", "detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Style set to: detailed"));

    scribe(&home)
        .args(["config", "get", "style"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Style: detailed"));
}

#[test]
fn unknown_language_is_rejected() {
    let home = TempDir::new().unwrap();
    scribe(&home)
        .args(["config", "set", "language", "tlh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown language 'tlh'"));
}
