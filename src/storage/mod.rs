//! Key-value persistence for the category registry and expense ledger.

pub mod json_backend;
pub mod memory;

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use crate::core::errors::ExpenseError;
use crate::core::validation::{
    date_bounds, normalize_category_name, normalize_description, MAX_AMOUNT,
};
use crate::domain::{CategoryRegistry, Expense, ExpenseLedger};

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, ExpenseError>;

pub const CATEGORIES_KEY: &str = "categories";
pub const EXPENSES_KEY: &str = "expenses";

/// Abstraction over string-valued key-value stores.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Collections read from a store plus any entries dropped along the way.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub categories: CategoryRegistry,
    pub expenses: ExpenseLedger,
    pub warnings: Vec<String>,
}

/// Loads both collections. Absent or malformed values become empty collections.
///
/// Expense dates are checked against the window around `today`.
pub fn load_all(store: &dyn KeyValueStore, today: NaiveDate) -> Result<LoadReport> {
    let mut warnings = Vec::new();
    let categories = load_categories(store, &mut warnings)?;
    let expenses = load_expenses(store, today, &mut warnings)?;
    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    Ok(LoadReport {
        categories,
        expenses,
        warnings,
    })
}

/// Reads the category registry, re-normalizing names and dropping empties and duplicates.
pub fn load_categories(
    store: &dyn KeyValueStore,
    warnings: &mut Vec<String>,
) -> Result<CategoryRegistry> {
    let Some(items) = read_array(store, CATEGORIES_KEY, warnings)? else {
        return Ok(CategoryRegistry::new());
    };
    let mut names: Vec<String> = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        let Value::String(raw) = item else {
            warnings.push(format!("dropped non-text category at position {idx}"));
            continue;
        };
        let name = normalize_category_name(&raw);
        if name.is_empty() {
            warnings.push(format!("dropped invalid category `{raw}`"));
        } else if names.contains(&name) {
            warnings.push(format!("dropped duplicate category `{name}`"));
        } else {
            names.push(name);
        }
    }
    Ok(CategoryRegistry::from_names(names))
}

/// Reads the expense ledger, skipping entries that are not well-formed records.
///
/// Records that parse but break the rules applied on entry are dropped when
/// the amount or date is out of range, and cleaned up otherwise.
pub fn load_expenses(
    store: &dyn KeyValueStore,
    today: NaiveDate,
    warnings: &mut Vec<String>,
) -> Result<ExpenseLedger> {
    let Some(items) = read_array(store, EXPENSES_KEY, warnings)? else {
        return Ok(ExpenseLedger::new());
    };
    let bounds = date_bounds(today);
    let mut expenses = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Expense>(item) {
            Ok(expense) => {
                if let Some(expense) = admit_expense(expense, bounds, warnings) {
                    expenses.push(expense);
                }
            }
            Err(err) => warnings.push(format!("dropped malformed expense at position {idx}: {err}")),
        }
    }
    Ok(ExpenseLedger::from_expenses(expenses))
}

fn admit_expense(
    mut expense: Expense,
    bounds: Option<(NaiveDate, NaiveDate)>,
    warnings: &mut Vec<String>,
) -> Option<Expense> {
    let id = expense.id;
    if !expense.amount.is_finite() || expense.amount <= 0.0 || expense.amount > MAX_AMOUNT {
        warnings.push(format!(
            "dropped expense #{id}: amount {} out of range",
            expense.amount
        ));
        return None;
    }
    if let Some((earliest, latest)) = bounds {
        if expense.date < earliest || expense.date > latest {
            warnings.push(format!(
                "dropped expense #{id}: date {} out of range",
                expense.date
            ));
            return None;
        }
    }

    let category = normalize_category_name(&expense.category);
    if category.is_empty() {
        warnings.push(format!("dropped expense #{id}: invalid category"));
        return None;
    }
    if category != expense.category {
        warnings.push(format!("expense #{id}: category cleaned to `{category}`"));
        expense.category = category;
    }

    let cents = (expense.amount * 100.0).round() / 100.0;
    if cents != expense.amount {
        warnings.push(format!("expense #{id}: amount rounded to {cents:.2}"));
        expense.amount = cents;
    }

    let description = normalize_description(&expense.description);
    if description != expense.description {
        warnings.push(format!("expense #{id}: description cleaned"));
        expense.description = description;
    }
    Some(expense)
}

pub fn save_categories(store: &dyn KeyValueStore, categories: &CategoryRegistry) -> Result<()> {
    let json = serde_json::to_string(categories)?;
    store.set(CATEGORIES_KEY, &json)
}

pub fn save_expenses(store: &dyn KeyValueStore, expenses: &ExpenseLedger) -> Result<()> {
    let json = serde_json::to_string(expenses)?;
    store.set(EXPENSES_KEY, &json)
}

fn read_array(
    store: &dyn KeyValueStore,
    key: &str,
    warnings: &mut Vec<String>,
) -> Result<Option<Vec<Value>>> {
    let Some(raw) = store.get(key)? else {
        tracing::debug!(key, "no stored value");
        return Ok(None);
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => Ok(Some(items)),
        Ok(Value::Null) => Ok(None),
        Ok(_) => {
            warnings.push(format!("stored `{key}` is not a list; starting empty"));
            Ok(None)
        }
        Err(err) => {
            warnings.push(format!("stored `{key}` is not valid JSON ({err}); starting empty"));
            Ok(None)
        }
    }
}
