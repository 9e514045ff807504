use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::{DateWindow, Expense, Period};

/// Period-scoped view over the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Summary<'a> {
    pub period: Period,
    /// Anchor date used for filtering; `None` for [`Period::Total`].
    pub reference: Option<NaiveDate>,
    pub window: Option<DateWindow>,
    pub entries: Vec<&'a Expense>,
    pub total_cents: i64,
}

impl Summary<'_> {
    /// Sum of the selected amounts, rounded to cents.
    pub fn total(&self) -> f64 {
        self.total_cents as f64 / 100.0
    }

    /// Per-category subtotals in order of first appearance.
    pub fn by_category(&self) -> Vec<CategoryTotal> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        for expense in &self.entries {
            match totals
                .iter_mut()
                .find(|total| total.category == expense.category)
            {
                Some(total) => {
                    total.total_cents = total.total_cents.saturating_add(expense.amount_cents());
                    total.count += 1;
                }
                None => totals.push(CategoryTotal {
                    category: expense.category.clone(),
                    total_cents: expense.amount_cents(),
                    count: 1,
                }),
            }
        }
        totals
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_cents: i64,
    pub count: usize,
}

impl CategoryTotal {
    pub fn total(&self) -> f64 {
        self.total_cents as f64 / 100.0
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Filters `expenses` to `period` around `reference` (or `today`) and totals them.
    pub fn summarize(
        expenses: &[Expense],
        period: Period,
        reference: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Summary<'_> {
        let target = reference.unwrap_or(today);
        let entries: Vec<&Expense> = expenses
            .iter()
            .filter(|expense| Self::includes(period, target, expense.date))
            .collect();
        // Saturates rather than overflowing on hand-edited ledgers.
        let total_cents = entries
            .iter()
            .fold(0i64, |acc, expense| acc.saturating_add(expense.amount_cents()));

        Summary {
            period,
            reference: period.uses_reference().then_some(target),
            window: period.window(target),
            entries,
            total_cents,
        }
    }

    /// Whether an expense dated `date` belongs to `period` anchored at `target`.
    pub fn includes(period: Period, target: NaiveDate, date: NaiveDate) -> bool {
        match period {
            Period::Daily => date == target,
            Period::Weekly => DateWindow::week_of(target).contains(date),
            Period::Monthly => date.year() == target.year() && date.month() == target.month(),
            Period::Total => true,
        }
    }
}
