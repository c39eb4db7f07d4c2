//! Integration tests running the `user-cli` binary against a temporary SQLite file

mod common;

use common::TestStore;
use predicates::prelude::*;

#[test]
fn test_initialize_then_get_bob() {
    let store = TestStore::new();

    store
        .cmd(&["initialize"])
        .assert()
        .success()
        .stdout("Database Initialized\n");

    store
        .cmd(&["get-user", "bob"])
        .assert()
        .success()
        .stdout("id=1 username='bob' email='bob@mail.com' password='bobpass'\n");

    assert!(store.dir.path().join("users.db").exists());
}

#[test]
fn test_duplicate_user_scenario() {
    let store = TestStore::new();
    store.cmd(&["initialize"]).assert().success();

    store
        .cmd(&["create-user", "alice", "a@x.com", "pw1"])
        .assert()
        .success()
        .stdout("Successfully added user alice\n");

    store
        .cmd(&["create-user", "alice", "a2@x.com", "pw2"])
        .assert()
        .success()
        .stdout("Error: User already exists!\n");

    store
        .cmd(&["get-user", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("email='a@x.com' password='pw1'"));
}

#[test]
fn test_state_persists_between_invocations() {
    let store = TestStore::new();
    store.cmd(&["initialize"]).assert().success();
    store
        .cmd(&["change-email", "bob", "robert@mail.com"])
        .assert()
        .success()
        .stdout("Successfully changed email!\n");

    store
        .cmd(&["search-user", "robert@"])
        .assert()
        .success()
        .stdout("Searching for email\nMatch found! robert@mail.com\n");

    store
        .cmd(&["delete-user", "bob"])
        .assert()
        .success()
        .stdout("Successfully deleted user!\n");

    store
        .cmd(&["get-all-users"])
        .assert()
        .success()
        .stdout("Error: No Users Found!\n");
}

#[test]
fn test_list_users_accepts_negative_values() {
    let store = TestStore::new();
    store.cmd(&["initialize"]).assert().success();
    store
        .cmd(&["create-user", "alice", "a@x.com", "pw1"])
        .assert()
        .success();

    store
        .cmd(&["list-users", "-1", "-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'bob'").and(predicate::str::contains("'alice'")));

    store
        .cmd(&["list-users", "1", "1"])
        .assert()
        .success()
        .stdout("id=2 username='alice' email='a@x.com' password='pw1'\n");
}

#[test]
fn test_json_output() {
    let store = TestStore::new();
    store.cmd(&["initialize"]).assert().success();

    store
        .cmd(&["--format", "json", "get-user", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""username":"bob""#));
}

#[test]
fn test_store_error_exits_non_zero() {
    let store = TestStore::new();

    // no schema yet
    store
        .cmd(&["get-user", "bob"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database Error"));
}

#[test]
fn test_missing_argument_is_usage_error() {
    let store = TestStore::new();
    store.cmd(&["create-user", "alice"]).assert().failure().code(2);
}
