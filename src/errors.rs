use std::result::Result as StdResult;

use thiserror::Error;

use crate::ledger::{AccountId, Money, Phone};

/// Error type that captures ledger, persistence and configuration failures.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("phone already registered: {0}")]
    PhoneAlreadyRegistered(Phone),
    #[error("amount must be greater than zero")]
    AmountMustBePositive,
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),
    #[error("payment not found: {0}")]
    PaymentNotFound(String),
    #[error("favorite not found: {0}")]
    FavoriteNotFound(String),
    #[error("payment already executed: {0}")]
    PaymentAlreadyExecuted(String),
    #[error("balance not enough: available {available}, requested {requested}")]
    NotEnoughBalance { available: Money, requested: Money },
    #[error("balance overflow: {balance} + {amount}")]
    BalanceOverflow { balance: Money, amount: Money },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed row {line} in {file}: {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("cannot encode field: {0}")]
    Encoding(String),
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, WalletError>;

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Config(err.to_string())
    }
}
