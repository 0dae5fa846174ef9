//! Shared identity contract for entities stored in the ledger.

/// Exposes a stable identifier used when merging snapshots into a live ledger.
pub trait Identifiable {
    type Id: PartialEq + Clone;

    fn id(&self) -> &Self::Id;
}
