#![doc(test(attr(deny(warnings))))]

//! Cartera core: local bookkeeping for transactions, product sales, budgets,
//! savings goals and recurring definitions, behind a PIN/biometric lock gate.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod repository;
pub mod security;
pub mod storage;
pub mod time;
pub mod utils;
pub mod validation;

pub use app::AppContext;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cartera core tracing initialized.");
    });
}
