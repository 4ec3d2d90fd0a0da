//! Category model
//!
//! Categories are a plain list of names offered when entering transactions.
//! Transactions reference them by name only, so deleting a category never
//! touches existing transactions.

use serde::{Deserialize, Serialize};

use super::ids::CategoryId;

/// Label used for expenses whose category is blank
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A stored category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A category that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    /// Create a draft with a trimmed name
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
        }
    }
}

/// Categories created together with the demo data
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Salary",
    "Food",
    "Housing",
    "Utilities",
    "Transportation",
    "Entertainment",
    "Shopping",
    "Health",
];
