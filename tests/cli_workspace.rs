mod common;
use common::cli::{RosterWorkspace, run_roster};
use predicates::prelude::*;

#[test]
fn test_init_creates_workspace() {
    let workspace = RosterWorkspace::new();
    let output = run_roster(&workspace, ["init", "--admin", "gm"], "init");
    assert!(output.status.success(), "init failed: {}", output.stderr);
    assert!(output.stdout.contains("staff user: gm"));

    let roster_dir = workspace.root.join(".roster");
    assert!(roster_dir.join("roster.json").is_file());
    assert!(roster_dir.join(".gitignore").is_file());
    let config = workspace.read(".roster/config.yaml");
    assert!(config.contains("user: gm"), "config:\n{config}");

    let users = run_roster(&workspace, ["user", "list", "--json"], "user_list");
    assert!(users.status.success(), "{}", users.stderr);
    let users = users.json();
    assert_eq!(users[0]["username"], "gm");
    assert_eq!(users[0]["is_staff"], true);
}

#[test]
fn test_init_twice_requires_force() {
    let workspace = RosterWorkspace::initialized();
    let output = run_roster(&workspace, ["init"], "init_again");
    assert!(!output.status.success());
    assert!(predicate::str::contains("Already initialized").eval(&output.stderr));

    let forced = run_roster(&workspace, ["init", "--force"], "init_force");
    assert!(forced.status.success(), "{}", forced.stderr);
}

#[test]
fn test_commands_require_workspace() {
    let workspace = RosterWorkspace::new();
    let output = run_roster(&workspace, ["list", "enemies"], "list");
    assert!(!output.status.success());
    assert!(output.stderr.contains("not initialized"), "{}", output.stderr);
}

#[test]
fn test_unknown_kind_rejected_by_parser() {
    let workspace = RosterWorkspace::initialized();
    let output = run_roster(&workspace, ["list", "dragons"], "list_dragons");
    assert!(!output.status.success());
    assert!(output.stderr.contains("invalid value"), "{}", output.stderr);
}

#[test]
fn test_user_add_is_staff_only() {
    let workspace = RosterWorkspace::initialized();
    let output = run_roster(&workspace, ["user", "add", "alice"], "add_alice");
    assert!(output.status.success(), "{}", output.stderr);
    assert!(output.stdout.contains("Added user 2: alice"));

    let output = run_roster(
        &workspace,
        ["--as", "alice", "user", "add", "mallory", "--staff"],
        "alice_adds",
    );
    assert!(!output.status.success());
    assert!(output.stderr.contains("Permission denied"), "{}", output.stderr);

    let output = run_roster(&workspace, ["user", "add", "alice"], "dup");
    assert!(!output.status.success());
    assert!(output.stderr.contains("already exists"), "{}", output.stderr);
}

#[test]
fn test_unknown_acting_user() {
    let workspace = RosterWorkspace::initialized();
    let output = run_roster(&workspace, ["--as", "ghost", "list", "mages"], "ghost");
    assert!(!output.status.success());
    assert!(output.stderr.contains("User not found: ghost"), "{}", output.stderr);
}

#[test]
fn test_version() {
    let workspace = RosterWorkspace::new();
    let output = run_roster(&workspace, ["version"], "version");
    assert!(output.status.success());
    assert!(output.stdout.starts_with("roster version "));

    let output = run_roster(&workspace, ["version", "--json"], "version_json");
    assert_eq!(output.json()["version"], env!("CARGO_PKG_VERSION"));
}
