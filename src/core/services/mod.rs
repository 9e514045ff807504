pub mod category_service;
pub mod expense_service;
pub mod summary_service;

pub use category_service::CategoryService;
pub use expense_service::{ExpenseInput, ExpenseService};
pub use summary_service::{CategoryTotal, Summary, SummaryService};

use crate::core::errors::ExpenseError;

pub type ServiceResult<T> = Result<T, ExpenseError>;
