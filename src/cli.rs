//! Demonstration driver: runs a short ledger scenario and moves snapshots around.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use thiserror::Error;

use crate::{
    config::{Config, ConfigManager},
    errors::WalletError,
    ledger::Ledger,
    storage::{DumpStorage, SnapshotStorage},
};

const DEMO_PHONE: &str = "+992000000001";

const USAGE: &str = "Usage: wallet_cli <command>\n\
     Commands:\n  \
     demo [dir]         run the sample scenario, exporting to dir (or the configured dump_dir)\n  \
     show <dir>         import a snapshot and list its contents\n  \
     backup <from> <to> copy the dump files of a snapshot";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("{0}")]
    Usage(&'static str),
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Wallet(err.into())
    }
}

/// Entry point used by the `wallet_cli` binary. Configuration is read from the app data dir.
pub fn run_cli() -> Result<(), CliError> {
    let config = ConfigManager::new()?.load()?;
    let stdout = io::stdout();
    run(std::env::args().skip(1), &config, &mut stdout.lock())
}

pub fn run<I, W>(args: I, config: &Config, out: &mut W) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
    W: Write,
{
    let mut args = args.into_iter();
    let storage: Box<dyn SnapshotStorage> = Box::new(DumpStorage::from_config(config));

    match args.next().as_deref() {
        Some("demo") => {
            let dir = args.next().map(PathBuf::from).or_else(|| config.dump_dir.clone());
            let ledger = demo(out)?;
            if let Some(dir) = dir {
                for path in storage.export(&ledger, &dir)? {
                    writeln!(out, "wrote {}", path.display())?;
                }
            }
        }
        Some("show") => {
            let dir = args.next().map(PathBuf::from).ok_or(CliError::Usage(USAGE))?;
            let mut ledger = Ledger::new();
            let summary = storage.import(&mut ledger, &dir)?;
            print_ledger(&ledger, out)?;
            for warning in &summary.warnings {
                writeln!(out, "warning: {warning}")?;
            }
        }
        Some("backup") => {
            let (from, to) = match (args.next(), args.next()) {
                (Some(from), Some(to)) => (PathBuf::from(from), PathBuf::from(to)),
                _ => return Err(CliError::Usage(USAGE)),
            };
            let copied = DumpStorage::from_config(config).backup_dir(&from, &to)?;
            writeln!(out, "copied {} file(s)", copied.len())?;
        }
        _ => return Err(CliError::Usage(USAGE)),
    }

    Ok(())
}

fn demo<W: Write>(out: &mut W) -> Result<Ledger, CliError> {
    let mut ledger = Ledger::new();
    let account = ledger.register_account(DEMO_PHONE)?;

    ledger.deposit(account.id, 100)?;
    writeln!(out, "balance: {}", balance(&ledger, account.id)?)?;

    let payment = ledger.pay(account.id, 50, "auto")?;
    writeln!(
        out,
        "paid {} ({}): balance {}",
        payment.amount,
        payment.status,
        balance(&ledger, account.id)?
    )?;

    ledger.favorite_payment(&payment.id, "car")?;
    ledger.reject(&payment.id)?;
    writeln!(out, "rejected: balance {}", balance(&ledger, account.id)?)?;

    Ok(ledger)
}

fn balance(ledger: &Ledger, account_id: i64) -> Result<i64, WalletError> {
    ledger
        .find_account_by_id(account_id)
        .map(|(account, _)| account.balance)
}

fn print_ledger<W: Write>(ledger: &Ledger, out: &mut W) -> io::Result<()> {
    for account in ledger.accounts() {
        writeln!(out, "account {} {} {}", account.id, account.phone, account.balance)?;
    }
    for payment in ledger.payments() {
        writeln!(
            out,
            "payment {} account={} amount={} category={} status={}",
            payment.id, payment.account_id, payment.amount, payment.category, payment.status
        )?;
    }
    for favorite in ledger.favorites() {
        writeln!(
            out,
            "favorite {} \"{}\" account={} amount={} category={}",
            favorite.id, favorite.name, favorite.account_id, favorite.amount, favorite.category
        )?;
    }
    Ok(())
}
