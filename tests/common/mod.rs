#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;
use expense_core::{
    core::{ExpenseManager, FixedClock},
    storage::JsonFileStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// The fixed "today" used across integration tests.
pub fn today() -> NaiveDate {
    date(2024, 6, 12)
}

/// Creates a unique data directory that outlives the calling test.
pub fn temp_data_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Opens a manager over a JSON store rooted at `dir` with a frozen clock.
pub fn open_manager(dir: &Path) -> ExpenseManager {
    let store = JsonFileStore::new(dir).expect("create json store");
    ExpenseManager::open(Box::new(store), Arc::new(FixedClock(today()))).expect("open manager")
}

/// Creates an isolated manager backed by a unique directory.
pub fn setup_test_env() -> (ExpenseManager, PathBuf) {
    let dir = temp_data_dir();
    (open_manager(&dir), dir)
}
