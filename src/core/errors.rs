use std::result::Result as StdResult;

use thiserror::Error;

use crate::domain::expense::ExpenseId;

/// Unified error type for the validation, service, and storage layers.
#[derive(Error, Debug)]
pub enum ExpenseError {
    #[error("Invalid category name")]
    InvalidCategory,
    #[error("Category `{0}` already exists")]
    DuplicateCategory(String),
    #[error("Category name unchanged")]
    CategoryUnchanged,
    #[error("Unknown category `{0}`; add it before recording expenses")]
    UnknownCategory(String),
    #[error("No category at index {0}")]
    CategoryIndexOutOfRange(usize),
    #[error("Enter a valid positive amount (e.g. 10.50)")]
    InvalidAmount,
    #[error("Date is invalid or out of range (at most 10 years back, 1 year ahead)")]
    InvalidDate,
    #[error("Expense {0} not found")]
    ExpenseNotFound(ExpenseId),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ExpenseError {
    /// Whether the error is a rejected user input rather than an environment failure.
    pub fn is_validation(&self) -> bool {
        !matches!(self, ExpenseError::StorageError(_))
    }
}

pub type Result<T> = StdResult<T, ExpenseError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ExpenseError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for ExpenseError {
    fn from(err: std::io::Error) -> Self {
        ExpenseError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for ExpenseError {
    fn from(err: serde_json::Error) -> Self {
        ExpenseError::StorageError(err.to_string())
    }
}
