//! Audit trail for FinanZen
//!
//! Every committed create, update, delete and restore is appended to
//! `audit.log` as one JSON object per line, with the record's state before
//! and after the change.
//!
//! - `AuditEntry`: one operation on one record (or one restore).
//! - `AuditLogger`: appends entries and reads them back.
//! - `summarize_changes`: short `field: old -> new` text stored with updates.

mod diff;
mod entry;
mod logger;

pub use diff::summarize_changes;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
