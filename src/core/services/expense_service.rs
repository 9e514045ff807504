//! Business logic helpers for recording expenses.

use chrono::NaiveDate;

use crate::core::errors::ExpenseError;
use crate::core::ids::IdGenerator;
use crate::core::validation::{
    normalize_amount, normalize_category_name, normalize_date, normalize_description,
};
use crate::domain::{CategoryRegistry, Expense, ExpenseId, ExpenseLedger};

use super::ServiceResult;

/// Raw, unvalidated expense fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseInput {
    pub category: String,
    pub amount: String,
    pub date: String,
    pub description: String,
}

impl ExpenseInput {
    pub fn new(
        category: impl Into<String>,
        amount: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            amount: amount.into(),
            date: date.into(),
            description: description.into(),
        }
    }
}

/// Validated fields ready to be stored.
#[derive(Debug, Clone, PartialEq)]
struct ValidExpense {
    category: String,
    amount: f64,
    date: NaiveDate,
    description: String,
}

/// Provides validated create/update/delete helpers for the expense ledger.
pub struct ExpenseService;

impl ExpenseService {
    /// Creates a new expense, or updates the one identified by `editing` when it exists.
    ///
    /// Nothing is mutated unless every field validates. Returns the id of the
    /// stored record.
    pub fn save(
        registry: &CategoryRegistry,
        ledger: &mut ExpenseLedger,
        ids: &mut dyn IdGenerator,
        today: NaiveDate,
        input: &ExpenseInput,
        editing: Option<ExpenseId>,
    ) -> ServiceResult<ExpenseId> {
        let valid = Self::validate(registry, today, input)?;

        if let Some(existing) = editing.and_then(|id| ledger.get_mut(id)) {
            existing.category = valid.category;
            existing.amount = valid.amount;
            existing.date = valid.date;
            existing.description = valid.description;
            return Ok(existing.id);
        }

        let id = ids.next_id();
        ledger.push(Expense::new(
            id,
            valid.category,
            valid.amount,
            valid.date,
            valid.description,
        ));
        Ok(id)
    }

    /// Removes the expense identified by `id`, returning the removed record.
    pub fn delete(ledger: &mut ExpenseLedger, id: ExpenseId) -> ServiceResult<Expense> {
        ledger.remove(id).ok_or(ExpenseError::ExpenseNotFound(id))
    }

    pub fn get(ledger: &ExpenseLedger, id: ExpenseId) -> ServiceResult<&Expense> {
        ledger.get(id).ok_or(ExpenseError::ExpenseNotFound(id))
    }

    /// Returns a snapshot of the ledger's expenses in insertion order.
    pub fn list(ledger: &ExpenseLedger) -> Vec<&Expense> {
        ledger.iter().collect()
    }

    fn validate(
        registry: &CategoryRegistry,
        today: NaiveDate,
        input: &ExpenseInput,
    ) -> ServiceResult<ValidExpense> {
        let category = normalize_category_name(&input.category);
        if category.is_empty() {
            return Err(ExpenseError::InvalidCategory);
        }
        if !registry.contains(&category) {
            return Err(ExpenseError::UnknownCategory(category));
        }

        let amount = normalize_amount(&input.amount)
            .filter(|amount| *amount > 0.0)
            .ok_or(ExpenseError::InvalidAmount)?;

        let date = normalize_date(&input.date, today).ok_or(ExpenseError::InvalidDate)?;

        Ok(ValidExpense {
            category,
            amount,
            date,
            description: normalize_description(&input.description),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::SequentialIds;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn registry() -> CategoryRegistry {
        CategoryRegistry::from_names(vec!["Food".into(), "Rent".into()])
    }

    #[test]
    fn unknown_category_is_rejected_even_with_valid_fields() {
        let mut ledger = ExpenseLedger::new();
        let mut ids = SequentialIds::default();
        let input = ExpenseInput::new("Travel", "12.50", "2024-06-10", "train");
        let err = ExpenseService::save(&registry(), &mut ledger, &mut ids, today(), &input, None)
            .expect_err("unknown category");
        assert!(matches!(err, ExpenseError::UnknownCategory(ref name) if name == "Travel"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn category_is_checked_before_amount_and_date() {
        let mut ledger = ExpenseLedger::new();
        let mut ids = SequentialIds::default();
        let input = ExpenseInput::new("", "abc", "nope", "");
        let err = ExpenseService::save(&registry(), &mut ledger, &mut ids, today(), &input, None)
            .unwrap_err();
        assert!(matches!(err, ExpenseError::InvalidCategory));

        let input = ExpenseInput::new("Food", "abc", "nope", "");
        let err = ExpenseService::save(&registry(), &mut ledger, &mut ids, today(), &input, None)
            .unwrap_err();
        assert!(matches!(err, ExpenseError::InvalidAmount));

        let input = ExpenseInput::new("Food", "3", "nope", "");
        let err = ExpenseService::save(&registry(), &mut ledger, &mut ids, today(), &input, None)
            .unwrap_err();
        assert!(matches!(err, ExpenseError::InvalidDate));
    }

    #[test]
    fn zero_amount_is_not_positive() {
        let mut ledger = ExpenseLedger::new();
        let mut ids = SequentialIds::default();
        for amount in ["0", "0.001", "-0"] {
            let input = ExpenseInput::new("Food", amount, "2024-06-10", "");
            let err =
                ExpenseService::save(&registry(), &mut ledger, &mut ids, today(), &input, None)
                    .unwrap_err();
            assert!(matches!(err, ExpenseError::InvalidAmount), "{amount}");
        }
    }

    #[test]
    fn new_expense_is_normalized_and_appended() {
        let mut ledger = ExpenseLedger::new();
        let mut ids = SequentialIds::default();
        let input = ExpenseInput::new("  Food ", "-12.346", "2024-06-10", " lunch   <b>out</b> ");
        let id = ExpenseService::save(&registry(), &mut ledger, &mut ids, today(), &input, None)
            .unwrap();

        let stored = ExpenseService::get(&ledger, id).unwrap();
        assert_eq!(stored.category, "Food");
        assert_eq!(stored.amount, 12.35);
        assert_eq!(stored.date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        assert_eq!(stored.description, "lunch bout/b");
    }

    #[test]
    fn editing_preserves_identifier() {
        let mut ledger = ExpenseLedger::new();
        let mut ids = SequentialIds::default();
        let first = ExpenseInput::new("Food", "10", "2024-06-10", "groceries");
        let id = ExpenseService::save(&registry(), &mut ledger, &mut ids, today(), &first, None)
            .unwrap();

        let update = ExpenseInput::new("Rent", "900", "2024-06-01", "June");
        let updated =
            ExpenseService::save(&registry(), &mut ledger, &mut ids, today(), &update, Some(id))
                .unwrap();

        assert_eq!(updated, id);
        assert_eq!(ledger.len(), 1);
        let stored = ledger.get(id).unwrap();
        assert_eq!(stored.category, "Rent");
        assert_eq!(stored.amount, 900.0);
        assert_eq!(stored.description, "June");
    }

    #[test]
    fn invalid_edit_leaves_record_untouched() {
        let mut ledger = ExpenseLedger::new();
        let mut ids = SequentialIds::default();
        let first = ExpenseInput::new("Food", "10", "2024-06-10", "");
        let id = ExpenseService::save(&registry(), &mut ledger, &mut ids, today(), &first, None)
            .unwrap();
        let before = ledger.clone();

        let update = ExpenseInput::new("Food", "10", "2030-01-01", "");
        assert!(
            ExpenseService::save(&registry(), &mut ledger, &mut ids, today(), &update, Some(id))
                .is_err()
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn editing_unknown_id_appends_new_record() {
        let mut ledger = ExpenseLedger::new();
        let mut ids = SequentialIds::starting_after(100);
        let input = ExpenseInput::new("Food", "5", "2024-06-10", "");
        let id = ExpenseService::save(
            &registry(),
            &mut ledger,
            &mut ids,
            today(),
            &input,
            Some(ExpenseId(7)),
        )
        .unwrap();
        assert_eq!(id, ExpenseId(101));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn delete_reports_missing_ids() {
        let mut ledger = ExpenseLedger::new();
        let mut ids = SequentialIds::default();
        let input = ExpenseInput::new("Food", "5", "2024-06-10", "");
        let id = ExpenseService::save(&registry(), &mut ledger, &mut ids, today(), &input, None)
            .unwrap();

        let removed = ExpenseService::delete(&mut ledger, id).unwrap();
        assert_eq!(removed.id, id);
        assert!(matches!(
            ExpenseService::delete(&mut ledger, id),
            Err(ExpenseError::ExpenseNotFound(missing)) if missing == id
        ));
    }
}
