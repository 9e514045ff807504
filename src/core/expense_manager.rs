use std::sync::Arc;

use chrono::NaiveDate;

use crate::core::errors::Result;
use crate::core::ids::SequentialIds;
use crate::core::services::{
    CategoryService, ExpenseInput, ExpenseService, Summary, SummaryService,
};
use crate::core::time::Clock;
use crate::domain::{CategoryRegistry, Expense, ExpenseId, ExpenseLedger, Period};
use crate::storage::{self, KeyValueStore};

/// Facade that owns the session's registry and ledger and persists every mutation.
pub struct ExpenseManager {
    categories: CategoryRegistry,
    expenses: ExpenseLedger,
    store: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ids: SequentialIds,
    warnings: Vec<String>,
}

impl ExpenseManager {
    /// Loads both collections from `store`, treating bad data as empty.
    pub fn open(store: Box<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Result<Self> {
        let report = storage::load_all(store.as_ref(), clock.today())?;
        tracing::info!(
            categories = report.categories.len(),
            expenses = report.expenses.len(),
            "session loaded"
        );
        Ok(Self {
            ids: SequentialIds::for_ledger(&report.expenses),
            categories: report.categories,
            expenses: report.expenses,
            store,
            clock,
            warnings: report.warnings,
        })
    }

    /// Discards in-memory state and reloads it from storage.
    pub fn reload(&mut self) -> Result<()> {
        let report = storage::load_all(self.store.as_ref(), self.clock.today())?;
        // Ids handed out earlier in this session stay retired.
        if let Some(max) = report.expenses.max_id() {
            self.ids.observe(max);
        }
        self.categories = report.categories;
        self.expenses = report.expenses;
        self.warnings = report.warnings;
        Ok(())
    }

    /// Problems found in stored data during the last load.
    pub fn load_warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn expenses(&self) -> &ExpenseLedger {
        &self.expenses
    }

    pub fn expense(&self, id: ExpenseId) -> Result<&Expense> {
        ExpenseService::get(&self.expenses, id)
    }

    pub fn list_expenses(&self) -> Vec<&Expense> {
        ExpenseService::list(&self.expenses)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn add_category(&mut self, raw: &str) -> Result<String> {
        let name = persist_or_rollback(
            &mut self.categories,
            self.store.as_ref(),
            storage::save_categories,
            |registry| CategoryService::add(registry, raw),
        )?;
        tracing::info!(category = %name, "category added");
        Ok(name)
    }

    pub fn rename_category(&mut self, index: usize, raw: &str) -> Result<String> {
        let name = persist_or_rollback(
            &mut self.categories,
            self.store.as_ref(),
            storage::save_categories,
            |registry| CategoryService::rename(registry, index, raw),
        )?;
        tracing::info!(index, category = %name, "category renamed");
        Ok(name)
    }

    pub fn remove_category(&mut self, index: usize) -> Result<String> {
        let name = persist_or_rollback(
            &mut self.categories,
            self.store.as_ref(),
            storage::save_categories,
            |registry| CategoryService::remove(registry, index),
        )?;
        tracing::info!(index, category = %name, "category removed");
        Ok(name)
    }

    /// Creates an expense, or updates `editing` in place when it exists.
    pub fn save_expense(
        &mut self,
        input: &ExpenseInput,
        editing: Option<ExpenseId>,
    ) -> Result<ExpenseId> {
        let today = self.clock.today();
        let categories = &self.categories;
        let ids = &mut self.ids;
        let id = persist_or_rollback(
            &mut self.expenses,
            self.store.as_ref(),
            storage::save_expenses,
            |ledger| ExpenseService::save(categories, ledger, ids, today, input, editing),
        )?;
        tracing::info!(%id, edited = editing == Some(id), "expense saved");
        Ok(id)
    }

    pub fn delete_expense(&mut self, id: ExpenseId) -> Result<Expense> {
        let removed = persist_or_rollback(
            &mut self.expenses,
            self.store.as_ref(),
            storage::save_expenses,
            |ledger| ExpenseService::delete(ledger, id),
        )?;
        tracing::info!(%id, "expense deleted");
        Ok(removed)
    }

    /// Totals the ledger for `period`, anchored at `reference` or today.
    pub fn summary(&self, period: Period, reference: Option<NaiveDate>) -> Summary<'_> {
        SummaryService::summarize(
            self.expenses.expenses(),
            period,
            reference,
            self.clock.today(),
        )
    }

    /// Whether an expense's category no longer exists in the registry.
    pub fn is_orphaned(&self, expense: &Expense) -> bool {
        !self.categories.contains(&expense.category)
    }
}

/// Applies `op` to `collection` and persists it, restoring the previous value if
/// the write fails.
fn persist_or_rollback<C, T>(
    collection: &mut C,
    store: &dyn KeyValueStore,
    save: fn(&dyn KeyValueStore, &C) -> storage::Result<()>,
    op: impl FnOnce(&mut C) -> Result<T>,
) -> Result<T>
where
    C: Clone,
{
    let snapshot = collection.clone();
    let value = op(collection)?;
    if let Err(err) = save(store, collection) {
        tracing::warn!(error = %err, "persisting mutation failed; rolling back");
        *collection = snapshot;
        return Err(err);
    }
    Ok(value)
}
