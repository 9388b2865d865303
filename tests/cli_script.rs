use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;
use regex::Regex;
use tempfile::TempDir;

fn run_script(home: &Path, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("cartera_cli")
        .unwrap()
        .env("CARTERA_CLI_SCRIPT", "1")
        .env("CARTERA_HOME", home)
        .write_stdin(input.to_string())
        .assert()
        .success()
}

#[test]
fn script_mode_records_and_sells_products() {
    let home = TempDir::new().unwrap();
    let output = run_script(home.path(), "product add Candle 8.50 10 --cost 3\nexit\n")
        .stdout(contains("Product Candle created"))
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    let id = Regex::new(r"\(id: (prod_[0-9a-z_]+)\)")
        .unwrap()
        .captures(&stdout)
        .expect("product id in output")[1]
        .to_string();

    run_script(home.path(), &format!("product sell {id} 4\nproduct sell {id} 7\nproduct list\n"))
        .stdout(contains("Sold 4x Candle for $34.00. 6 left in stock."))
        .stdout(contains("Only 6 units available"))
        .stdout(contains("6 in stock"));

    let stored = std::fs::read_to_string(home.path().join("store").join("transactions.json")).unwrap();
    assert!(stored.contains("\"type\":\"sale\""));
}

#[test]
fn locked_app_refuses_commands_until_unlocked() {
    let home = TempDir::new().unwrap();
    run_script(
        home.path(),
        "pin setup 1234\nlock\ndashboard\nunlock 0000\nunlock 1234\ndashboard\n",
    )
    .stdout(contains("PIN set."))
    .stdout(contains("App is locked."))
    .stdout(contains("Incorrect PIN."))
    .stdout(contains("Unlocked."))
    .stdout(contains("=== Recent ==="));

    run_script(home.path(), "tx list\nstatus\n")
        .stdout(contains("App is locked."))
        .stdout(contains("State      : locked"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = TempDir::new().unwrap();
    run_script(home.path(), "prodcut list\n")
        .stdout(contains("Unknown command `prodcut`"))
        .stdout(contains("Suggestion: `product`?"));
}

#[test]
fn transactions_feed_top_categories_and_budgets() {
    let home = TempDir::new().unwrap();
    run_script(
        home.path(),
        "tx add expense 30 food Groceries\n\
         tx add expense 12.5 transport \"Bus pass\"\n\
         tx add income 100 food\n\
         budget add food 32 monthly\n\
         top expense\n\
         budget list\n",
    )
    .stdout(contains("Recorded expense $30.00"))
    .stdout(contains("category `food` is not offered for income"))
    .stdout(contains("1. Food"))
    .stdout(contains("Food budget is close to its limit."));
}

#[test]
fn clear_data_needs_both_flags_and_writes_a_backup() {
    let home = TempDir::new().unwrap();
    run_script(
        home.path(),
        "tx add expense 5 food Snack\nclear-data --yes\nclear-data --yes --force\ntx list\n",
    )
    .stdout(contains("Nothing cleared."))
    .stdout(contains("Backup written to"))
    .stdout(contains("No transactions."));

    let backups: Vec<_> = std::fs::read_dir(home.path().join("exports"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("cartera_backup_"))
        .collect();
    assert_eq!(backups.len(), 1);
}
