//! Reports for FinanZen
//!
//! Read-only views derived from stored records: the dashboard summary and
//! spending by category.

pub mod dashboard;
pub mod spending;

pub use dashboard::{account_name, DashboardSummary, GoalProgress, UNKNOWN_ACCOUNT};
pub use spending::{SpendingByCategory, SpendingReport};
