//! End-to-end tests for the `finanzen` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn finanzen(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("finanzen").unwrap();
    cmd.env("FINANZEN_DATA_DIR", data_dir.path())
        .env_remove("FINANZEN_LOG");
    cmd
}

#[test]
fn init_seeds_demo_data() {
    let data_dir = TempDir::new().unwrap();

    finanzen(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 2 accounts"));

    assert!(data_dir.path().join("config.json").exists());
    assert!(data_dir.path().join("data").join("finanzen.db.json").exists());

    finanzen(&data_dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checking"))
        .stdout(predicate::str::contains("Savings"));

    // Second init leaves existing data alone
    finanzen(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing seeded"));
}

#[test]
fn transaction_add_and_delete_reconcile_balance() {
    let data_dir = TempDir::new().unwrap();

    finanzen(&data_dir)
        .args(["account", "add", "Wallet", "--balance", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created account: Wallet"));

    finanzen(&data_dir)
        .args(["txn", "add", "Wallet", "expense", "30", "Coffee beans"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wallet balance: $70.00"));

    finanzen(&data_dir)
        .args(["transaction", "status", "txn-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("txn-1 is now Completed"));

    finanzen(&data_dir)
        .args(["transaction", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wallet balance: $100.00"));
}

#[test]
fn transaction_on_unknown_account_fails() {
    let data_dir = TempDir::new().unwrap();

    finanzen(&data_dir)
        .args(["txn", "add", "Nowhere", "income", "10", "Gift"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account not found: Nowhere"));
}

#[test]
fn backup_create_and_list() {
    let data_dir = TempDir::new().unwrap();

    finanzen(&data_dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No backups found."));

    finanzen(&data_dir)
        .args(["account", "add", "Checking", "-b", "250"])
        .assert()
        .success();

    finanzen(&data_dir)
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("finanzen-backup-"));

    finanzen(&data_dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 backup(s)"));
}

#[test]
fn restore_requires_force() {
    let data_dir = TempDir::new().unwrap();
    let backup = data_dir.path().join("export.json");

    finanzen(&data_dir)
        .args(["account", "add", "Checking", "-b", "250"])
        .assert()
        .success();
    finanzen(&data_dir)
        .args(["backup", "create", "--output"])
        .arg(&backup)
        .assert()
        .success();
    finanzen(&data_dir)
        .args(["account", "add", "Savings", "-b", "10"])
        .assert()
        .success();

    finanzen(&data_dir)
        .arg("restore")
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("1 accounts, 0 transactions, 0 goals"));

    finanzen(&data_dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Savings"));

    finanzen(&data_dir)
        .arg("restore")
        .arg(&backup)
        .arg("--force")
        .assert()
        .success()
        .stdout(predicate::str::contains("Restore complete!"));

    finanzen(&data_dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Savings").not());
}

#[test]
fn restore_rejects_invalid_backup() {
    let data_dir = TempDir::new().unwrap();
    let backup = data_dir.path().join("broken.json");
    std::fs::write(&backup, r#"{"accounts": [], "goals": []}"#).unwrap();

    finanzen(&data_dir)
        .arg("restore")
        .arg(&backup)
        .arg("--force")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn config_shows_schema_version() {
    let data_dir = TempDir::new().unwrap();

    finanzen(&data_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Schema version: 3"))
        .stdout(predicate::str::contains("accounts, transactions, goals, categories"));
}

#[test]
fn audit_lists_recent_changes() {
    let data_dir = TempDir::new().unwrap();

    finanzen(&data_dir)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries yet."));

    finanzen(&data_dir)
        .args(["account", "add", "Wallet", "-b", "100"])
        .assert()
        .success();
    finanzen(&data_dir)
        .args(["account", "edit", "Wallet", "--name", "Pocket"])
        .assert()
        .success();

    finanzen(&data_dir)
        .args(["audit", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UPDATE Account acc-1 (Pocket)"))
        .stdout(predicate::str::contains("CREATE Account").not())
        .stdout(predicate::str::contains("Showing 1 entries"));
}
