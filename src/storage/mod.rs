pub mod codec;
pub mod dump_backend;

use std::path::{Path, PathBuf};

use crate::{errors::Result, ledger::Ledger};

/// Abstraction over backends that snapshot a ledger into a directory and merge it back.
pub trait SnapshotStorage {
    /// Writes the ledger's non-empty collections into `dir`, which must already exist.
    /// Returns the paths written.
    fn export(&self, ledger: &Ledger, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Reads a snapshot from `dir` and merges it into `ledger` by identifier.
    fn import(&self, ledger: &mut Ledger, dir: &Path) -> Result<ImportSummary>;
}

pub use codec::{ParsePolicy, FIELD_SEPARATOR, LINE_SEPARATOR};
pub use dump_backend::{copy_file, DumpStorage, ImportSummary, MissingFilePolicy};
