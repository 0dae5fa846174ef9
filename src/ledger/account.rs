use std::fmt;

use serde::Serialize;

use super::common::Identifiable;

/// Sequential account identifier assigned by the ledger.
pub type AccountId = i64;

/// Whole currency units. Balances and payment amounts never use fractions.
pub type Money = i64;

/// Phone number keying an account. Compared exactly, case and whitespace included.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct Phone(pub String);

impl Phone {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Phone {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Phone {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Balance-holding entity registered under a unique phone number.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub phone: Phone,
    pub balance: Money,
}

impl Account {
    /// Creates a new account with a zero balance.
    pub fn new(id: AccountId, phone: Phone) -> Self {
        Self {
            id,
            phone,
            balance: 0,
        }
    }
}

impl Identifiable for Account {
    type Id = AccountId;

    fn id(&self) -> &AccountId {
        &self.id
    }
}
