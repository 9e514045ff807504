//! Expense records and the ordered ledger that holds them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::Displayable;

/// Integer identifier assigned to an expense at creation time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ExpenseId(pub u64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single recorded expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

impl Expense {
    pub fn new(
        id: ExpenseId,
        category: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            category: category.into(),
            amount,
            date,
            description: description.into(),
        }
    }

    /// Amount expressed in whole cents, the unit totals are accumulated in.
    pub fn amount_cents(&self) -> i64 {
        (self.amount * 100.0).round() as i64
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        if self.description.is_empty() {
            format!("{} - {:.2} ({})", self.category, self.amount, self.date)
        } else {
            format!(
                "{} - {:.2} ({}) {}",
                self.category, self.amount, self.date, self.description
            )
        }
    }
}

/// Insertion-ordered collection of expenses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ExpenseLedger {
    expenses: Vec<Expense>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_expenses(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: ExpenseId) -> Option<&mut Expense> {
        self.expenses.iter_mut().find(|expense| expense.id == id)
    }

    pub(crate) fn push(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    /// Removes the first expense carrying `id`.
    pub(crate) fn remove(&mut self, id: ExpenseId) -> Option<Expense> {
        let index = self.expenses.iter().position(|expense| expense.id == id)?;
        Some(self.expenses.remove(index))
    }

    pub fn max_id(&self) -> Option<ExpenseId> {
        self.expenses.iter().map(|expense| expense.id).max()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expense> {
        self.expenses.iter()
    }
}
