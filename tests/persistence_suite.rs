mod common;

use std::{fs, sync::Arc};

use assert_fs::prelude::*;
use assert_fs::TempDir;
use common::{open_manager, today};
use expense_core::core::services::ExpenseInput;
use expense_core::core::{ExpenseError, ExpenseManager, FixedClock};
use expense_core::domain::{ExpenseId, Period};
use expense_core::storage::{JsonFileStore, KeyValueStore, CATEGORIES_KEY, EXPENSES_KEY};
use predicates::prelude::*;

#[test]
fn mutations_survive_a_restart() {
    let temp = TempDir::new().unwrap();
    {
        let mut manager = open_manager(temp.path());
        manager.add_category("Food").unwrap();
        manager.add_category("Travel").unwrap();
        manager
            .save_expense(&ExpenseInput::new("Food", "12.5", "2024-06-10", "lunch"), None)
            .unwrap();
        manager.rename_category(1, "Trips").unwrap();
    }

    temp.child("categories.json")
        .assert(predicate::str::contains("\"Trips\""));
    temp.child("expenses.json")
        .assert(predicate::str::contains("\"2024-06-10\""));

    let mut reopened = open_manager(temp.path());
    assert_eq!(reopened.categories().names(), ["Food", "Trips"]);
    assert_eq!(reopened.expenses().len(), 1);
    assert_eq!(reopened.summary(Period::Total, None).total(), 12.5);

    // The counter continues from the largest stored id.
    let next = reopened
        .save_expense(&ExpenseInput::new("Food", "1", "2024-06-11", ""), None)
        .unwrap();
    assert_eq!(next, ExpenseId(2));
}

#[test]
fn malformed_values_load_as_empty_with_warnings() {
    let temp = TempDir::new().unwrap();
    temp.child("categories.json").write_str("{not json").unwrap();
    temp.child("expenses.json").write_str("\"oops\"").unwrap();

    let manager = open_manager(temp.path());
    assert!(manager.categories().is_empty());
    assert!(manager.expenses().is_empty());
    assert_eq!(manager.load_warnings().len(), 2);
}

#[test]
fn bad_records_are_dropped_individually() {
    let temp = TempDir::new().unwrap();
    temp.child("categories.json")
        .write_str(r#"["Food", " Food ", 7, "<>", "Rent"]"#)
        .unwrap();
    temp.child("expenses.json")
        .write_str(
            r#"[
                {"id": 4, "category": "Food", "amount": 3.5, "date": "2024-06-12", "description": ""},
                {"id": "x", "category": "Food"},
                {"id": 9, "category": "Rent", "amount": 900, "date": "2024-06-01"}
            ]"#,
        )
        .unwrap();

    let manager = open_manager(temp.path());
    assert_eq!(manager.categories().names(), ["Food", "Rent"]);
    let ids: Vec<_> = manager.expenses().iter().map(|expense| expense.id).collect();
    assert_eq!(ids, vec![ExpenseId(4), ExpenseId(9)]);
    assert_eq!(manager.expense(ExpenseId(9)).unwrap().description, "");
    assert_eq!(manager.load_warnings().len(), 4);
}

#[test]
fn hand_edited_records_outside_the_rules_are_not_loaded() {
    let temp = TempDir::new().unwrap();
    temp.child("categories.json").write_str(r#"["Food"]"#).unwrap();
    temp.child("expenses.json")
        .write_str(
            r#"[
                {"id": 1, "category": "Food", "amount": 1e300, "date": "2024-06-12"},
                {"id": 2, "category": "Food", "amount": 1e300, "date": "2024-06-12"},
                {"id": 3, "category": "Food", "amount": -4, "date": "2024-06-12"},
                {"id": 4, "category": "Food", "amount": 2.005, "date": "1999-12-31"},
                {"id": 5, "category": "Food", "amount": 1.999, "date": "2024-06-12", "description": "<i>"}
            ]"#,
        )
        .unwrap();

    let manager = open_manager(temp.path());
    let ids: Vec<_> = manager.expenses().iter().map(|expense| expense.id).collect();
    assert_eq!(ids, vec![ExpenseId(5)]);
    assert_eq!(manager.load_warnings().len(), 6);

    let summary = manager.summary(Period::Total, None);
    assert_eq!(summary.total_cents, 200);
    assert_eq!(manager.expense(ExpenseId(5)).unwrap().description, "i");
}

#[test]
fn failed_write_rolls_back_and_keeps_file() {
    let temp = TempDir::new().unwrap();
    let mut manager = open_manager(temp.path());
    manager.add_category("Food").unwrap();
    let original = fs::read_to_string(temp.child("categories.json").path()).unwrap();

    // A directory where the staging file belongs makes the next write fail.
    temp.child("categories.json.tmp").create_dir_all().unwrap();

    let err = manager.add_category("Rent").expect_err("write must fail");
    assert!(matches!(err, ExpenseError::StorageError(_)));
    assert_eq!(manager.categories().names(), ["Food"]);
    temp.child("categories.json")
        .assert(predicate::str::diff(original));
}

#[test]
fn store_keys_map_to_json_files() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(temp.path()).unwrap());
    store.set(CATEGORIES_KEY, r#"["Books"]"#).unwrap();
    store.set(EXPENSES_KEY, "[]").unwrap();
    assert!(store.set("../escape", "[]").is_err());

    let manager =
        ExpenseManager::open(Box::new(store.clone()), Arc::new(FixedClock(today()))).unwrap();
    assert_eq!(manager.categories().names(), ["Books"]);
    assert_eq!(store.get("missing").unwrap(), None);
    temp.child("escape.json").assert(predicate::path::missing());
}
