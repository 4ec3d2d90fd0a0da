//! FinanZen - local persistence core for a personal finance tracker
//!
//! This library keeps accounts, transactions, savings goals and categories in
//! a versioned on-disk database and keeps every account balance consistent
//! with its transactions. It also produces and restores portable JSON
//! backups.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, transactions, goals, categories)
//! - `storage`: Versioned object-store database with atomic write scopes
//! - `services`: Validation, balance reconciliation and audit logging
//! - `audit`: Append-only audit trail
//! - `backup`: Backup documents, creation and restore
//! - `reports`: Dashboard summary and spending by category
//! - `cli`, `display`: Command-line front end
//!
//! # Example
//!
//! ```rust,ignore
//! use finanzen::config::FinanzenPaths;
//! use finanzen::models::{AccountType, Money, NewAccount};
//! use finanzen::services::AccountService;
//! use finanzen::storage::Storage;
//!
//! let storage = Storage::open(FinanzenPaths::new()?).await?;
//! let account = AccountService::new(&storage)
//!     .create(NewAccount::new("Checking", AccountType::Checking, Money::from_major(100)))
//!     .await?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{FinanzenError, FinanzenResult};
