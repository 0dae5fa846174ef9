//! Merging of freshly loaded snapshot rows into a live ledger.
//!
//! Rows are matched by identifier: a match is overwritten in place, anything
//! unseen is appended. Merging the same rows twice leaves the ledger unchanged.

use tracing::debug;

use super::{
    account::Account, common::Identifiable, favorite::Favorite, ledger::Ledger, payment::Payment,
};

/// Counts of rows that replaced an existing record versus rows appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub updated: usize,
    pub inserted: usize,
}

impl MergeStats {
    pub fn total(&self) -> usize {
        self.updated + self.inserted
    }
}

fn upsert<T: Identifiable>(target: &mut Vec<T>, rows: Vec<T>) -> MergeStats {
    let mut stats = MergeStats::default();
    for row in rows {
        match target.iter().position(|existing| existing.id() == row.id()) {
            Some(position) => {
                target[position] = row;
                stats.updated += 1;
            }
            None => {
                target.push(row);
                stats.inserted += 1;
            }
        }
    }
    stats
}

impl Ledger {
    /// Upserts accounts and moves the id counter past every merged id.
    pub fn merge_accounts(&mut self, rows: Vec<Account>) -> MergeStats {
        if let Some(max_id) = rows.iter().map(|account| account.id).max() {
            self.next_account_id = self.next_account_id.max(max_id);
        }
        let stats = upsert(&mut self.accounts, rows);
        debug!(?stats, next_account_id = self.next_account_id, "accounts merged");
        stats
    }

    pub fn merge_payments(&mut self, rows: Vec<Payment>) -> MergeStats {
        let stats = upsert(&mut self.payments, rows);
        debug!(?stats, "payments merged");
        stats
    }

    pub fn merge_favorites(&mut self, rows: Vec<Favorite>) -> MergeStats {
        let stats = upsert(&mut self.favorites, rows);
        debug!(?stats, "favorites merged");
        stats
    }
}
