//! Core data models for FinanZen
//!
//! Accounts, transactions, savings goals and categories, plus the typed keys
//! and the decimal money type they share. Field names on the wire are
//! camelCase, the same shape the web client reads from backup files.

pub mod account;
pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountType, AccountValidationError, NewAccount};
pub use category::{Category, NewCategory, DEFAULT_CATEGORIES, UNCATEGORIZED};
pub use goal::{Goal, GoalValidationError, NewGoal};
pub use ids::{AccountId, CategoryId, GoalId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use transaction::{
    signed_amount, NewTransaction, Transaction, TransactionStatus, TransactionType,
    TransactionValidationError,
};
