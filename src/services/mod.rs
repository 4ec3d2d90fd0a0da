//! Service layer for FinanZen
//!
//! Validation, reconciliation and audit logging on top of the storage layer.
//! Each mutating call runs in one write scope.

pub mod account;
pub mod category;
pub mod goal;
pub mod transaction;

pub use account::AccountService;
pub use category::CategoryService;
pub use goal::GoalService;
pub use transaction::{TransactionFilter, TransactionService};
