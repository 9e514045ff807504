pub mod category;
pub mod common;
pub mod expense;
pub mod period;

pub use category::CategoryRegistry;
pub use common::Displayable;
pub use expense::{Expense, ExpenseId, ExpenseLedger};
pub use period::{DateWindow, ParsePeriodError, Period};
