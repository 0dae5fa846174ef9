use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{self, ErrorKind, Read, Write},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::{
    config::Config,
    errors::{Result, WalletError},
    ledger::{Account, Favorite, Ledger, MergeStats, Payment},
};

use super::{
    codec::{self, DumpRecord, ParsePolicy},
    SnapshotStorage,
};

/// What to do when `payments.dump` or `favorites.dump` is absent on import.
/// A missing `accounts.dump` always fails.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingFilePolicy {
    #[default]
    Skip,
    Fail,
}

/// Per-section outcome of an import. Skipped sections report zero rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub accounts: MergeStats,
    pub payments: MergeStats,
    pub favorites: MergeStats,
    /// Integrity problems in the ledger after merging.
    pub warnings: Vec<String>,
}

/// Snapshot storage writing one `.dump` file per collection into a directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpStorage {
    parse_policy: ParsePolicy,
    missing_files: MissingFilePolicy,
}

impl DumpStorage {
    pub fn new(parse_policy: ParsePolicy, missing_files: MissingFilePolicy) -> Self {
        Self {
            parse_policy,
            missing_files,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.parse_policy, config.missing_files)
    }

    /// Writes only the accounts section to an arbitrary file.
    pub fn export_accounts_to_file(&self, ledger: &Ledger, path: &Path) -> Result<()> {
        let content = codec::encode(ledger.accounts())?;
        write_dump(path, &content)?;
        info!(path = %path.display(), accounts = ledger.accounts().len(), "accounts exported");
        Ok(())
    }

    /// Merges account rows from a file written by [`DumpStorage::export_accounts_to_file`].
    pub fn import_accounts_from_file(&self, ledger: &mut Ledger, path: &Path) -> Result<MergeStats> {
        let rows = self.read_section::<Account>(path)?;
        let stats = ledger.merge_accounts(rows);
        info!(path = %path.display(), ?stats, "accounts imported");
        Ok(stats)
    }

    /// Copies every dump file present in `from` into `to`, creating `to` if needed.
    pub fn backup_dir(&self, from: &Path, to: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(to)?;
        let mut copied = Vec::new();
        for name in [Account::FILE_NAME, Payment::FILE_NAME, Favorite::FILE_NAME] {
            let source = from.join(name);
            if !source.exists() {
                continue;
            }
            let target = to.join(name);
            copy_file(&source, &target)?;
            copied.push(target);
        }
        info!(from = %from.display(), to = %to.display(), files = copied.len(), "snapshot backed up");
        Ok(copied)
    }

    fn read_section<T: DumpRecord>(&self, path: &Path) -> Result<Vec<T>> {
        let content = read_dump(path)?;
        codec::decode(&content, self.parse_policy)
    }

    fn read_optional_section<T: DumpRecord>(&self, dir: &Path) -> Result<Vec<T>> {
        let path = dir.join(T::FILE_NAME);
        match read_dump(&path) {
            Ok(content) => codec::decode(&content, self.parse_policy),
            Err(err) if err.kind() == ErrorKind::NotFound => match self.missing_files {
                MissingFilePolicy::Skip => {
                    info!(path = %path.display(), "section absent, skipped");
                    Ok(Vec::new())
                }
                MissingFilePolicy::Fail => Err(err.into()),
            },
            Err(err) => Err(err.into()),
        }
    }
}

impl SnapshotStorage for DumpStorage {
    fn export(&self, ledger: &Ledger, dir: &Path) -> Result<Vec<PathBuf>> {
        // Encode everything up front so an unencodable value writes nothing.
        let sections = [
            (Account::FILE_NAME, codec::encode(ledger.accounts())?),
            (Payment::FILE_NAME, codec::encode(ledger.payments())?),
            (Favorite::FILE_NAME, codec::encode(ledger.favorites())?),
        ];

        let mut written = Vec::new();
        for (name, content) in sections {
            if content.is_empty() {
                continue;
            }
            let path = dir.join(name);
            write_dump(&path, &content)?;
            written.push(path);
        }
        info!(
            dir = %dir.display(),
            accounts = ledger.accounts().len(),
            payments = ledger.payments().len(),
            favorites = ledger.favorites().len(),
            "snapshot exported"
        );
        Ok(written)
    }

    fn import(&self, ledger: &mut Ledger, dir: &Path) -> Result<ImportSummary> {
        let accounts = self.read_section::<Account>(&dir.join(Account::FILE_NAME))?;
        let payments = self.read_optional_section::<Payment>(dir)?;
        let favorites = self.read_optional_section::<Favorite>(dir)?;

        let mut summary = ImportSummary {
            accounts: ledger.merge_accounts(accounts),
            payments: ledger.merge_payments(payments),
            favorites: ledger.merge_favorites(favorites),
            warnings: Vec::new(),
        };
        summary.warnings = ledger.integrity_warnings();
        for warning in &summary.warnings {
            warn!("{warning}");
        }
        info!(
            dir = %dir.display(),
            accounts = ?summary.accounts,
            payments = ?summary.payments,
            favorites = ?summary.favorites,
            warnings = summary.warnings.len(),
            "snapshot imported"
        );
        Ok(summary)
    }
}

/// Copies `from` to `to`, failing if the byte count written differs from the source length.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    let mut source = File::open(from)?;
    let expected = source.metadata()?.len();
    let mut target = File::create(to)?;
    let written = io::copy(&mut source, &mut target)?;
    close_logged(target, to);
    if written != expected {
        return Err(WalletError::Io(io::Error::new(
            ErrorKind::Other,
            format!("copied size: {written}, original size: {expected}"),
        )));
    }
    Ok(written)
}

fn write_dump(path: &Path, content: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    close_logged(file, path);
    Ok(())
}

fn read_dump(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

/// Flushes and drops a written file. A failure here is logged, not returned.
fn close_logged(file: File, path: &Path) {
    if let Err(err) = file.sync_all() {
        warn!(path = %path.display(), error = %err, "failed to close dump file");
    }
}
