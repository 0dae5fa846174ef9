//! Ledger domain models, in-memory store, and snapshot reconciliation.

pub mod account;
pub mod common;
pub mod favorite;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod payment;
pub mod reconcile;

pub use account::{Account, AccountId, Money, Phone};
pub use common::Identifiable;
pub use favorite::Favorite;
pub use ledger::Ledger;
pub use payment::{Payment, PaymentCategory, PaymentStatus};
pub use reconcile::MergeStats;
