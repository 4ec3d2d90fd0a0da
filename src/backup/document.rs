//! Backup document format
//!
//! ```json
//! {
//!   "accounts": [ ... ],
//!   "transactions": [ ... ],
//!   "goals": [ ... ],
//!   "backupDate": "2025-03-14T09:30:00Z"
//! }
//! ```
//!
//! Categories are not part of a backup. Documents carrying a `categories`
//! key (or any other extra key) still load; the extra data is ignored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FinanzenError, FinanzenResult};
use crate::models::{Account, Goal, Transaction};

const FILENAME_PREFIX: &str = "finanzen-backup-";
const FILENAME_SUFFIX: &str = ".json";

/// Keys every backup must carry as arrays
const REQUIRED_COLLECTIONS: [&str; 3] = ["accounts", "transactions", "goals"];

/// A portable copy of accounts, transactions and goals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
    pub goals: Vec<Goal>,
    /// When the backup was taken; optional on input
    #[serde(default)]
    pub backup_date: Option<DateTime<Utc>>,
}

impl BackupDocument {
    /// Parse and validate a backup document
    ///
    /// `accounts`, `transactions` and `goals` must all be present and be
    /// arrays, otherwise this is a validation error.
    pub fn parse(json: &str) -> FinanzenResult<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            FinanzenError::Validation(format!("Invalid backup file format: {}", e))
        })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> FinanzenResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            FinanzenError::Validation("Invalid backup file format: expected a JSON object".into())
        })?;

        for key in REQUIRED_COLLECTIONS {
            match object.get(key) {
                Some(Value::Array(_)) => {}
                Some(Value::Null) | None => {
                    return Err(FinanzenError::Validation(format!(
                        "Invalid backup file format: missing '{}'",
                        key
                    )))
                }
                Some(_) => {
                    return Err(FinanzenError::Validation(format!(
                        "Invalid backup file format: '{}' must be an array",
                        key
                    )))
                }
            }
        }

        serde_json::from_value(value).map_err(|e| {
            FinanzenError::Validation(format!("Invalid record in backup file: {}", e))
        })
    }

    pub fn to_json(&self) -> FinanzenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn record_count(&self) -> usize {
        self.accounts.len() + self.transactions.len() + self.goals.len()
    }
}

/// File name of the backup taken on `date`
pub fn backup_filename(date: NaiveDate) -> String {
    format!(
        "{}{}{}",
        FILENAME_PREFIX,
        date.format("%Y-%m-%d"),
        FILENAME_SUFFIX
    )
}

/// The date encoded in a backup file name, if it is one
pub fn parse_backup_filename(filename: &str) -> Option<NaiveDate> {
    let date = filename
        .strip_prefix(FILENAME_PREFIX)?
        .strip_suffix(FILENAME_SUFFIX)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
