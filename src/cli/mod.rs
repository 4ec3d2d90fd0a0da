//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod audit;
pub mod backup;
pub mod category;
pub mod goal;
pub mod report;
pub mod transaction;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::{FinanzenError, FinanzenResult};
use crate::models::Money;

pub use account::{handle_account_command, AccountCommands};
pub use audit::handle_audit_command;
pub use backup::{handle_backup_command, handle_restore_command, BackupCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use report::{handle_spending_command, handle_summary_command};
pub use transaction::{handle_transaction_command, TransactionCommands};

/// Parse a user-entered amount such as "1,250.00" or "$30"
pub(crate) fn parse_money(input: &str) -> FinanzenResult<Money> {
    Money::parse(input).map_err(|e| {
        FinanzenError::Validation(format!(
            "{}. Use a format like '1000.00' or '1000'",
            e
        ))
    })
}

/// Parse a YYYY-MM-DD date as midnight UTC
pub(crate) fn parse_date(input: &str) -> FinanzenResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        FinanzenError::Validation(format!(
            "Invalid date format: '{}'. Use YYYY-MM-DD",
            input
        ))
    })?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

/// Parse a YYYY-MM-DD date as the last second of that day, for inclusive
/// upper bounds
pub(crate) fn parse_end_date(input: &str) -> FinanzenResult<DateTime<Utc>> {
    Ok(parse_date(input)? + chrono::Duration::days(1) - chrono::Duration::seconds(1))
}
