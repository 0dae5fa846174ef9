use std::{fmt, str::FromStr};

use serde::Serialize;
use uuid::Uuid;

use super::{
    account::{AccountId, Money},
    common::Identifiable,
};

const STATUS_IN_PROGRESS: &str = "INPROGRESS";
const STATUS_FAIL: &str = "FAIL";

/// Free-form tag attached to a payment, e.g. `auto` or `food`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct PaymentCategory(pub String);

impl PaymentCategory {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PaymentCategory {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PaymentCategory {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PaymentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a payment. `Fail` is terminal.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum PaymentStatus {
    #[serde(rename = "INPROGRESS")]
    InProgress,
    #[serde(rename = "FAIL")]
    Fail,
}

impl PaymentStatus {
    /// Canonical token used in snapshot files.
    pub fn token(self) -> &'static str {
        match self {
            PaymentStatus::InProgress => STATUS_IN_PROGRESS,
            PaymentStatus::Fail => STATUS_FAIL,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            STATUS_IN_PROGRESS => Ok(PaymentStatus::InProgress),
            STATUS_FAIL => Ok(PaymentStatus::Fail),
            other => Err(format!("unknown payment status `{other}`")),
        }
    }
}

/// A debit recorded against an account. The balance is already reduced by `amount`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Payment {
    pub id: String,
    pub account_id: AccountId,
    pub amount: Money,
    pub category: PaymentCategory,
    pub status: PaymentStatus,
}

impl Payment {
    pub fn new(account_id: AccountId, amount: Money, category: PaymentCategory) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            amount,
            category,
            status: PaymentStatus::InProgress,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self.status, PaymentStatus::InProgress)
    }
}

impl Identifiable for Payment {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }
}
