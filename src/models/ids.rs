//! Strongly-typed ID wrappers for all record types
//!
//! Keys are auto-increment integers assigned by the object store. Newtype
//! wrappers keep an account key from being passed where a goal key is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw store key
            pub const fn new(key: u64) -> Self {
                Self(key)
            }

            /// Get the raw store key
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<u64> for $name {
            fn from(key: u64) -> Self {
                Self(key)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            /// Accepts both the bare key ("7") and the display form ("acc-7")
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(s.parse()?))
            }
        }
    };
}

define_id!(AccountId, "acc-");
define_id!(TransactionId, "txn-");
define_id!(GoalId, "goal-");
define_id!(CategoryId, "cat-");
