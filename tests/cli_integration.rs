//! Integration tests for the credvault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  The
//! master password comes from `CREDVAULT_PASSWORD` and any other prompt
//! answers are piped through stdin.  Clipboard access is not exercised.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: get a Command pointing at the credvault binary.
fn credvault() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("credvault").expect("binary should exist")
}

/// Helper: a command rooted in `tmp/data`, logged in as `master-pw`.
fn in_vault(tmp: &TempDir) -> Command {
    let mut cmd = credvault();
    cmd.current_dir(tmp.path())
        .env("CREDVAULT_DATA_DIR", tmp.path().join("data"))
        .env("CREDVAULT_PASSWORD", "master-pw")
        .env_remove("CREDVAULT_NEW_PASSWORD")
        .env_remove("CREDVAULT_LOG");
    cmd
}

/// Helper: add a credential with a generated password.
fn add(tmp: &TempDir, service: &str, username: &str) {
    in_vault(tmp)
        .args(["add", service, "--generate"])
        .write_stdin(format!("{username}\n"))
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Credential for {service} added."
        )));
}

#[test]
fn help_flag_shows_usage() {
    credvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted local credential vault"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("switch"))
        .stdout(predicate::str::contains("view"))
        .stdout(predicate::str::contains("passwd"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("audit"));
}

#[test]
fn version_flag_shows_version() {
    credvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("credvault"));
}

#[test]
fn no_args_shows_usage() {
    credvault()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn switch_needs_no_password() {
    let tmp = TempDir::new().unwrap();

    credvault()
        .current_dir(tmp.path())
        .env("CREDVAULT_DATA_DIR", tmp.path().join("data"))
        .env_remove("CREDVAULT_PASSWORD")
        .args(["switch", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched active vault to"))
        .stdout(predicate::str::contains("work.json"));

    tmp.child("data/config.json")
        .assert(predicate::str::contains("work.json"));
    tmp.child("data/master.hash").assert(predicate::path::missing());
}

#[test]
fn first_run_then_add_and_view() {
    let tmp = TempDir::new().unwrap();

    add(&tmp, "GitHub", "octocat");
    tmp.child("data/master.hash").assert(predicate::path::exists());
    tmp.child("data/credentials.json")
        .assert(predicate::path::exists());

    in_vault(&tmp)
        .arg("view")
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"))
        .stdout(predicate::str::contains("octocat"));
}

#[test]
fn vault_file_is_not_plaintext() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");

    let raw = std::fs::read(tmp.child("data/credentials.json").path()).unwrap();
    let text = String::from_utf8_lossy(&raw);
    assert!(!text.contains("octocat"));
}

#[test]
fn wrong_password_is_denied() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");

    in_vault(&tmp)
        .env("CREDVAULT_PASSWORD", "not-it")
        .arg("view")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("ACCESS DENIED"));
}

#[test]
fn duplicate_add_reports_existing_service() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");

    in_vault(&tmp)
        .args(["add", "github", "--generate"])
        .write_stdin("someone\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn search_finds_similar_names() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");
    add(&tmp, "Netflix", "viewer");

    in_vault(&tmp)
        .args(["search", "git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GitHub"))
        .stdout(predicate::str::contains("Netflix").not());
}

#[test]
fn get_missing_service_warns() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");

    in_vault(&tmp)
        .args(["get", "gitlab"])
        .assert()
        .success()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn delete_with_force() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");

    in_vault(&tmp)
        .args(["delete", "github", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Credential for GitHub deleted."));

    in_vault(&tmp)
        .arg("view")
        .assert()
        .success()
        .stderr(predicate::str::contains("Vault is empty."));
}

#[test]
fn update_username_from_stdin() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");

    // New username, then an empty password to keep the current one.
    in_vault(&tmp)
        .args(["update", "GitHub"])
        .write_stdin("hubot\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated GitHub."));

    in_vault(&tmp)
        .arg("view")
        .assert()
        .stdout(predicate::str::contains("hubot"));
}

#[test]
fn passwd_rotates_master_password() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");

    in_vault(&tmp)
        .env("CREDVAULT_NEW_PASSWORD", "second-pw")
        .arg("passwd")
        .assert()
        .success()
        .stdout(predicate::str::contains("Master password changed"));

    in_vault(&tmp)
        .env("CREDVAULT_PASSWORD", "second-pw")
        .arg("view")
        .assert()
        .success()
        .stdout(predicate::str::contains("octocat"));

    in_vault(&tmp).arg("view").assert().failure();
}

#[test]
fn passwd_mismatch_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");

    in_vault(&tmp)
        .arg("passwd")
        .write_stdin("second-pw\nthird-pw\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Passwords do not match"));

    in_vault(&tmp).arg("view").assert().success();
}

#[test]
fn banner_is_printed_once_per_command() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");

    let output = in_vault(&tmp).arg("view").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("Credential Vault : Credentials").count(), 1);
}

#[test]
fn imported_record_is_reachable_by_its_service_name() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "Netflix", "nf");
    let dump = tmp.child("dump.json");
    dump.write_str(r#"{"gh": {"service_name": "GitHub", "username": "octocat", "password": "p1"}}"#)
        .unwrap();

    in_vault(&tmp)
        .args(["import", dump.path().to_str().unwrap()])
        .assert()
        .success();

    in_vault(&tmp)
        .args(["add", "GitHub", "--generate"])
        .write_stdin("someone\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn export_then_import_into_another_vault() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");
    let dump = tmp.child("dump.json");

    in_vault(&tmp)
        .args(["export", dump.path().to_str().unwrap(), "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 credentials"));
    dump.assert(predicate::str::contains("octocat"));

    in_vault(&tmp)
        .args(["-f", "data/other.json", "import"])
        .arg(dump.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 credentials"));

    in_vault(&tmp)
        .args(["view", "--file", "data/other.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("octocat"));
}

#[test]
fn export_without_confirmation_is_cancelled() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");
    let dump = tmp.child("dump.json");

    in_vault(&tmp)
        .arg("export")
        .arg(dump.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));
    dump.assert(predicate::path::missing());
}

#[test]
fn switch_changes_vault_used_by_later_commands() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");

    in_vault(&tmp).args(["switch", "work"]).assert().success();
    in_vault(&tmp)
        .arg("view")
        .assert()
        .success()
        .stdout(predicate::str::contains("Credential Vault : Work"))
        .stderr(predicate::str::contains("Vault is empty."));
}

#[test]
fn audit_lists_recent_actions() {
    let tmp = TempDir::new().unwrap();
    add(&tmp, "GitHub", "octocat");

    in_vault(&tmp)
        .args(["audit", "--last", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SETUP"))
        .stdout(predicate::str::contains("ADD"))
        .stdout(predicate::str::contains("Credential for GitHub added"));

    tmp.child("data/audit.log")
        .assert(predicate::str::is_match(r"^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\] SETUP: ").unwrap());
}
