mod common;

use common::{date, setup_test_env};
use expense_core::core::services::ExpenseInput;
use expense_core::core::validation::{normalize_amount, normalize_category_name, normalize_date};
use expense_core::core::ExpenseError;
use expense_core::domain::{ExpenseId, Period};

fn input(category: &str, amount: &str, day: &str) -> ExpenseInput {
    ExpenseInput::new(category, amount, day, "")
}

#[test]
fn weekly_summary_matches_sunday_to_saturday_window() {
    let (mut manager, _dir) = setup_test_env();
    manager.add_category("Food").unwrap();
    manager.save_expense(&input("Food", "10", "2024-06-10"), None).unwrap();
    manager.save_expense(&input("Food", "2.5", "2024-06-14"), None).unwrap();
    manager.save_expense(&input("Food", "7", "2024-06-16"), None).unwrap();

    let summary = manager.summary(Period::Weekly, Some(date(2024, 6, 12)));
    let window = summary.window.expect("weekly window");
    assert_eq!(window.start, date(2024, 6, 9));
    assert_eq!(window.end, date(2024, 6, 15));
    assert_eq!(summary.entries.len(), 2);
    assert_eq!(summary.total(), 12.50);
}

#[test]
fn monthly_summary_only_counts_the_reference_month() {
    let (mut manager, _dir) = setup_test_env();
    manager.add_category("Rent").unwrap();
    for day in ["2024-05-31", "2024-06-01", "2024-06-30", "2024-07-01"] {
        manager.save_expense(&input("Rent", "100", day), None).unwrap();
    }

    let summary = manager.summary(Period::Monthly, Some(date(2024, 6, 12)));
    assert_eq!(summary.entries.len(), 2);
    assert_eq!(summary.total(), 200.0);
    assert_eq!(manager.summary(Period::Total, None).total(), 400.0);
}

#[test]
fn duplicate_categories_are_rejected_after_trimming() {
    let (mut manager, _dir) = setup_test_env();
    manager.add_category("Food").unwrap();
    assert!(matches!(
        manager.add_category("Food"),
        Err(ExpenseError::DuplicateCategory(_))
    ));
    assert!(matches!(
        manager.add_category(" Food "),
        Err(ExpenseError::DuplicateCategory(_))
    ));
    assert_eq!(manager.categories().len(), 1);
}

#[test]
fn expenses_require_a_registered_category() {
    let (mut manager, _dir) = setup_test_env();
    let err = manager
        .save_expense(&input("Ghost", "5", "2024-06-12"), None)
        .expect_err("unknown category");
    assert!(matches!(err, ExpenseError::UnknownCategory(ref name) if name == "Ghost"));
    assert!(manager.expenses().is_empty());
}

#[test]
fn editing_preserves_the_identifier() {
    let (mut manager, _dir) = setup_test_env();
    manager.add_category("Food").unwrap();
    manager.add_category("Fun").unwrap();
    let id = manager
        .save_expense(&input("Food", "4", "2024-06-01"), None)
        .unwrap();

    let edited = manager
        .save_expense(&ExpenseInput::new("Fun", "9.99", "2024-06-02", "cinema"), Some(id))
        .unwrap();
    assert_eq!(edited, id);
    assert_eq!(manager.expenses().len(), 1);
    let stored = manager.expense(id).unwrap();
    assert_eq!(stored.category, "Fun");
    assert_eq!(stored.description, "cinema");
}

#[test]
fn ids_are_never_reused_after_deletion() {
    let (mut manager, _dir) = setup_test_env();
    manager.add_category("Food").unwrap();
    let first = manager.save_expense(&input("Food", "1", "2024-06-01"), None).unwrap();
    let second = manager.save_expense(&input("Food", "2", "2024-06-01"), None).unwrap();
    manager.delete_expense(second).unwrap();
    let third = manager.save_expense(&input("Food", "3", "2024-06-01"), None).unwrap();

    assert!(first < second && second < third);
    assert!(matches!(
        manager.delete_expense(ExpenseId(99)),
        Err(ExpenseError::ExpenseNotFound(ExpenseId(99)))
    ));
}

#[test]
fn removing_a_category_keeps_its_expenses() {
    let (mut manager, _dir) = setup_test_env();
    manager.add_category("Food").unwrap();
    let id = manager.save_expense(&input("Food", "8", "2024-06-12"), None).unwrap();
    manager.remove_category(0).unwrap();

    let expense = manager.expense(id).expect("kept");
    assert_eq!(expense.category, "Food");
    assert!(manager.is_orphaned(expense));
    assert_eq!(manager.summary(Period::Daily, None).total(), 8.0);
}

#[test]
fn normalizers_hold_their_bounds() {
    let long = "x".repeat(80) + "<>";
    let name = normalize_category_name(&long);
    assert!(name.chars().count() <= 50);
    assert!(!name.contains('<') && !name.contains('>'));

    for raw in ["12.345678", "-3", "99999999999", "0.004"] {
        let amount = normalize_amount(raw).expect("numeric");
        assert!((0.0..=9_999_999.99).contains(&amount), "{raw}");
        assert_eq!((amount * 100.0).round() / 100.0, amount);
    }
    assert_eq!(normalize_amount("ten"), None);

    let today = date(2024, 6, 12);
    assert_eq!(normalize_date("2021-02-30", today), None);
    assert_eq!(normalize_date("2026-06-12", today), None);
    assert_eq!(normalize_date("2024-06-12", today), Some(today));
}
