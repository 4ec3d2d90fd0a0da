//! Account model
//!
//! Represents balance-bearing accounts (checking, savings, credit cards,
//! investments).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// Maximum length of an account name
pub const MAX_ACCOUNT_NAME_LEN: usize = 100;

/// Type of financial account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
    CreditCard,
    Investment,
}

impl AccountType {
    pub const ALL: [AccountType; 4] = [
        Self::Checking,
        Self::Savings,
        Self::CreditCard,
        Self::Investment,
    ];

    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Some(Self::Checking),
            "savings" => Some(Self::Savings),
            "credit_card" | "credit-card" | "creditcard" | "credit" => Some(Self::CreditCard),
            "investment" => Some(Self::Investment),
            _ => None,
        }
    }

    /// Returns true if this account type usually carries debt
    pub fn is_liability(&self) -> bool {
        matches!(self, Self::CreditCard)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checking => write!(f, "Checking"),
            Self::Savings => write!(f, "Savings"),
            Self::CreditCard => write!(f, "Credit Card"),
            Self::Investment => write!(f, "Investment"),
        }
    }
}

/// A stored account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned key
    pub id: AccountId,

    pub name: String,

    /// Current balance, adjusted whenever a transaction against this
    /// account is added, edited or deleted
    pub balance: Money,

    #[serde(rename = "type")]
    pub account_type: AccountType,
}

/// An account that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,

    /// Opening balance
    pub balance: Money,

    #[serde(rename = "type")]
    pub account_type: AccountType,
}

impl NewAccount {
    pub fn new(name: impl Into<String>, account_type: AccountType, balance: Money) -> Self {
        Self {
            name: name.into(),
            balance,
            account_type,
        }
    }

    pub fn validate(&self) -> Result<(), AccountValidationError> {
        validate_name(&self.name)
    }
}

impl Account {
    /// Apply a signed balance change
    pub fn apply_delta(&mut self, delta: Money) {
        self.balance += delta;
    }

    pub fn validate(&self) -> Result<(), AccountValidationError> {
        validate_name(&self.name)
    }
}

fn validate_name(name: &str) -> Result<(), AccountValidationError> {
    if name.trim().is_empty() {
        return Err(AccountValidationError::EmptyName);
    }

    if name.len() > MAX_ACCOUNT_NAME_LEN {
        return Err(AccountValidationError::NameTooLong(name.len()));
    }

    Ok(())
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Account name too long ({} chars, max {})",
                len, MAX_ACCOUNT_NAME_LEN
            ),
        }
    }
}

impl std::error::Error for AccountValidationError {}
