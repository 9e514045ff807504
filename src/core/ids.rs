use crate::domain::{ExpenseId, ExpenseLedger};

/// Source of fresh expense identifiers.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> ExpenseId;
}

/// Monotonic counter that continues after the largest identifier already stored.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    last: u64,
}

impl SequentialIds {
    pub fn starting_after(last: u64) -> Self {
        Self { last }
    }

    pub fn for_ledger(ledger: &ExpenseLedger) -> Self {
        Self::starting_after(ledger.max_id().map_or(0, |id| id.0))
    }

    /// Ensures subsequent ids stay above `id`.
    pub fn observe(&mut self, id: ExpenseId) {
        self.last = self.last.max(id.0);
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> ExpenseId {
        self.last = self.last.saturating_add(1);
        ExpenseId(self.last)
    }
}
