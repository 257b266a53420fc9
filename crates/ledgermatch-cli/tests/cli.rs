//! End-to-end CLI tests.

use assert_cmd::Command;
use predicates::prelude::*;

const HD_TEXT: &str = "The Home Depot\n\
                       Order #W987654321\n\
                       Order Date: 11/23/2025\n\
                       VISA **** 1234\n\
                       Order Total: $119.76\n";

fn ledgermatch() -> Command {
    Command::cargo_bin("ledgermatch").unwrap()
}

#[test]
fn vendors_lists_registry() {
    ledgermatch()
        .arg("vendors")
        .assert()
        .success()
        .stdout(predicate::str::contains("home_depot"))
        .stdout(predicate::str::contains("The Home Depot"));
}

#[test]
fn parse_text_receipt_outputs_json() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("receipt.txt");
    std::fs::write(&file, HD_TEXT).unwrap();

    ledgermatch()
        .args(["parse", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("119.76"))
        .stdout(predicate::str::contains("2025-11-23"))
        .stdout(predicate::str::contains("high"));
}

#[test]
fn parse_missing_file_fails() {
    ledgermatch()
        .args(["parse", "/nonexistent/receipt.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn cycle_processes_inbox_into_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let inbox = dir.path().join("inbox");
    std::fs::create_dir(&inbox).unwrap();
    std::fs::write(inbox.join("receipt.txt"), HD_TEXT).unwrap();

    let ledger_path = dir.path().join("ledger.json");
    std::fs::write(
        &ledger_path,
        r#"{"accounts": [{"id": "A-1", "name": "Job Materials", "kind": "expense"}]}"#,
    )
    .unwrap();

    ledgermatch()
        .args([
            "cycle",
            inbox.to_str().unwrap(),
            "--ledger",
            ledger_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 synced"));

    // The document is consumed and the expense is on file.
    assert!(inbox.join("receipt.txt.processed").exists());
    let saved = std::fs::read_to_string(&ledger_path).unwrap();
    assert!(saved.contains("E-1"));
    assert!(saved.contains("The Home Depot"));

    // A second cycle finds nothing to do.
    ledgermatch()
        .args([
            "cycle",
            inbox.to_str().unwrap(),
            "--ledger",
            ledger_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 fetched"));
}
