pub mod errors;
pub mod expense_manager;
pub mod ids;
pub mod services;
pub mod time;
pub mod utils;
pub mod validation;

pub use errors::{CliError, ExpenseError};
pub use expense_manager::ExpenseManager;
pub use time::{Clock, FixedClock, SystemClock};
