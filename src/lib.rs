#![doc(test(attr(deny(warnings))))]

//! Wallet Core is an in-memory personal-finance ledger: phone-keyed accounts,
//! payments debited against their balances, favorite payment templates, and
//! export/import of the whole state as delimited `.dump` files.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use errors::{Result, WalletError};
pub use ledger::Ledger;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Wallet Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
