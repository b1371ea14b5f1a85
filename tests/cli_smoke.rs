use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn diary() -> Command {
    Command::cargo_bin("diary").unwrap()
}

#[test]
fn hash_password_from_flag_and_stdin() {
    let expected = "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b";
    diary()
        .args(["hash-password", "--password", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));

    diary()
        .arg("hash-password")
        .write_stdin("secret\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}

#[test]
fn init_then_list_empty() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("data/diary.db");

    diary()
        .arg("init")
        .arg("--db")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("Database initialized"));
    assert!(db.exists());

    diary()
        .arg("list")
        .arg("--db")
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("All (0)"))
        .stdout(predicate::str::contains("No entries found."));
}

#[test]
fn list_without_database_fails() {
    let dir = tempdir().unwrap();
    diary()
        .arg("list")
        .arg("--db")
        .arg(dir.path().join("missing.db"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("diary init"));
}

#[test]
fn serve_rejects_bad_offset() {
    let dir = tempdir().unwrap();
    diary()
        .arg("serve")
        .arg("--db")
        .arg(dir.path().join("diary.db"))
        .args(["--utc-offset", "tokyo"])
        .env_remove("DIARY_ADMIN_PASSWORD_HASH")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid UTC offset"));
}

#[test]
fn show_unknown_entry_fails() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("diary.db");
    diary().arg("init").arg("--db").arg(&db).assert().success();

    diary()
        .args(["show", "42"])
        .arg("--db")
        .arg(&db)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entry ID 42 not found"));
}
