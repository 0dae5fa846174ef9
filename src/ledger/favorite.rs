use serde::Serialize;
use uuid::Uuid;

use super::{
    account::{AccountId, Money},
    common::Identifiable,
    payment::{Payment, PaymentCategory},
};

/// Named payment template. Holds copies of the source payment's fields,
/// so later changes to that payment never reach the favorite.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Favorite {
    pub id: String,
    pub account_id: AccountId,
    pub name: String,
    pub amount: Money,
    pub category: PaymentCategory,
}

impl Favorite {
    pub fn from_payment(payment: &Payment, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id: payment.account_id,
            name: name.into(),
            amount: payment.amount,
            category: payment.category.clone(),
        }
    }
}

impl Identifiable for Favorite {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }
}
