//! Line-oriented text encoding of ledger collections.
//!
//! One record per line, fields joined by `;`, records joined by `\n`, no
//! trailing separator after the last record. Rows go through `csv` with
//! quoting turned off; nothing is escaped, so the encoder refuses any value
//! that contains a separator.

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    errors::{Result, WalletError},
    ledger::{Account, Favorite, Payment, PaymentCategory, PaymentStatus, Phone},
};

pub const FIELD_SEPARATOR: &str = ";";
pub const LINE_SEPARATOR: &str = "\n";

const FIELD_DELIMITER: u8 = b';';
const RECORD_TERMINATOR: u8 = b'\n';

/// How malformed integer columns are handled while decoding.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// Reject the whole file.
    #[default]
    Strict,
    /// Substitute zero and log a warning.
    Lenient,
}

/// Parses individual columns under a given policy.
#[derive(Debug, Clone, Copy)]
pub struct FieldParser {
    policy: ParsePolicy,
}

impl FieldParser {
    pub fn new(policy: ParsePolicy) -> Self {
        Self { policy }
    }

    pub fn int(&self, column: &str, raw: &str) -> std::result::Result<i64, String> {
        match raw.parse::<i64>() {
            Ok(value) => Ok(value),
            Err(err) => match self.policy {
                ParsePolicy::Strict => Err(format!("{column}: `{raw}` is not an integer ({err})")),
                ParsePolicy::Lenient => {
                    warn!(column, raw, "malformed integer column read as 0");
                    Ok(0)
                }
            },
        }
    }
}

/// A record kind stored as one section of a snapshot.
///
/// Rows are written through the record's `Serialize` impl, so the struct
/// field order is the column order.
pub trait DumpRecord: Serialize + Sized {
    /// File name of the section inside a snapshot directory.
    const FILE_NAME: &'static str;
    const COLUMNS: usize;

    /// Free-text values that must not contain a separator.
    fn text_fields(&self) -> Vec<&str>;
    fn from_record(record: &StringRecord, parser: &FieldParser) -> std::result::Result<Self, String>;
}

impl DumpRecord for Account {
    const FILE_NAME: &'static str = "accounts.dump";
    const COLUMNS: usize = 3;

    fn text_fields(&self) -> Vec<&str> {
        vec![self.phone.as_str()]
    }

    fn from_record(record: &StringRecord, parser: &FieldParser) -> std::result::Result<Self, String> {
        Ok(Self {
            id: parser.int("id", &record[0])?,
            phone: Phone::from(&record[1]),
            balance: parser.int("balance", &record[2])?,
        })
    }
}

impl DumpRecord for Payment {
    const FILE_NAME: &'static str = "payments.dump";
    const COLUMNS: usize = 5;

    fn text_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.category.as_str()]
    }

    fn from_record(record: &StringRecord, parser: &FieldParser) -> std::result::Result<Self, String> {
        Ok(Self {
            id: record[0].to_string(),
            account_id: parser.int("account_id", &record[1])?,
            amount: parser.int("amount", &record[2])?,
            category: PaymentCategory::from(&record[3]),
            status: record[4].parse::<PaymentStatus>()?,
        })
    }
}

impl DumpRecord for Favorite {
    const FILE_NAME: &'static str = "favorites.dump";
    const COLUMNS: usize = 5;

    fn text_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str(), self.category.as_str()]
    }

    fn from_record(record: &StringRecord, parser: &FieldParser) -> std::result::Result<Self, String> {
        Ok(Self {
            id: record[0].to_string(),
            account_id: parser.int("account_id", &record[1])?,
            name: record[2].to_string(),
            amount: parser.int("amount", &record[3])?,
            category: PaymentCategory::from(&record[4]),
        })
    }
}

/// Renders records as snapshot text. An empty slice renders as an empty string.
pub fn encode<T: DumpRecord>(records: &[T]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(RECORD_TERMINATOR))
        .from_writer(Vec::new());

    for record in records {
        if let Some(bad) = record
            .text_fields()
            .into_iter()
            .find(|field| field.contains(FIELD_SEPARATOR) || field.contains(LINE_SEPARATOR))
        {
            return Err(WalletError::Encoding(format!(
                "{}: value `{}` contains a separator",
                T::FILE_NAME,
                bad.escape_debug()
            )));
        }
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| WalletError::Encoding(err.to_string()))?;
    let mut text =
        String::from_utf8(bytes).map_err(|err| WalletError::Encoding(err.to_string()))?;
    if text.ends_with(LINE_SEPARATOR) {
        text.truncate(text.len() - LINE_SEPARATOR.len());
    }
    Ok(text)
}

/// Parses snapshot text back into records. Blank lines, including a trailing
/// line separator, are skipped.
pub fn decode<T: DumpRecord>(content: &str, policy: ParsePolicy) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let parser = FieldParser::new(policy);
    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map_or(index + 1, |position| position.line() as usize);
        let parsed = if record.len() == T::COLUMNS {
            T::from_record(&record, &parser)
        } else {
            Err(format!(
                "expected {} columns, found {}",
                T::COLUMNS,
                record.len()
            ))
        };
        rows.push(parsed.map_err(|reason| WalletError::Parse {
            file: T::FILE_NAME.to_string(),
            line,
            reason,
        })?);
    }
    Ok(rows)
}
