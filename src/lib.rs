#![doc(test(attr(deny(warnings))))]

//! Expense Core offers the category registry, expense ledger, and period
//! summaries behind a personal expense tracker, plus the CLI that drives them.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!(build = %utils::build_info::current().summary(), "tracing initialized");
    });
}
