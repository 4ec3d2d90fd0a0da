//! Transaction model
//!
//! A dated income or expense event against one account. Amounts are stored
//! as non-negative magnitudes; the type decides the sign of the effect on
//! the account balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, TransactionId};
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

/// Status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
}

impl TransactionStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "completed" | "complete" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    /// The other status (the transaction list toggles between the two)
    pub fn toggled(&self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }

    /// The value stored in the `status` index
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Signed balance effect of an amount of the given type
pub fn signed_amount(transaction_type: TransactionType, amount: Money) -> Money {
    match transaction_type {
        TransactionType::Income => amount,
        TransactionType::Expense => -amount,
    }
}

/// A stored transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,

    /// Owning account (not enforced by the store)
    pub account_id: AccountId,

    pub description: String,

    /// Non-negative magnitude
    pub amount: Money,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Free-text category; may or may not match a stored Category name
    #[serde(default)]
    pub category: String,

    pub date: DateTime<Utc>,

    /// Documents written before statuses existed load as pending
    #[serde(default)]
    pub status: TransactionStatus,
}

impl Transaction {
    /// The change this transaction applies to its account's balance
    pub fn balance_delta(&self) -> Money {
        signed_amount(self.transaction_type, self.amount)
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        validate_fields(&self.description, self.amount)
    }
}

/// A transaction that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub description: String,
    pub amount: Money,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub date: DateTime<Utc>,
    pub status: TransactionStatus,
}

impl NewTransaction {
    /// Create a pending transaction dated now
    pub fn new(
        account_id: AccountId,
        transaction_type: TransactionType,
        amount: Money,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            description: description.into(),
            amount,
            transaction_type,
            category: String::new(),
            date: Utc::now(),
            status: TransactionStatus::Pending,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn balance_delta(&self) -> Money {
        signed_amount(self.transaction_type, self.amount)
    }

    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        validate_fields(&self.description, self.amount)
    }
}

fn validate_fields(description: &str, amount: Money) -> Result<(), TransactionValidationError> {
    if description.trim().is_empty() {
        return Err(TransactionValidationError::EmptyDescription);
    }

    if amount.is_negative() {
        return Err(TransactionValidationError::NegativeAmount(amount));
    }

    Ok(())
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    EmptyDescription,
    NegativeAmount(Money),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Transaction description cannot be empty"),
            Self::NegativeAmount(amount) => write!(
                f,
                "Transaction amount must be a non-negative magnitude, got {}",
                amount
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expense(amount: Money) -> Transaction {
        Transaction {
            id: TransactionId::new(1),
            account_id: AccountId::new(1),
            description: "Groceries".into(),
            amount,
            transaction_type: TransactionType::Expense,
            category: "Food".into(),
            date: Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap(),
            status: TransactionStatus::Pending,
        }
    }

    #[test]
    fn test_balance_delta_sign() {
        let mut txn = expense(Money::from_major(30));
        assert_eq!(txn.balance_delta(), Money::from_major(-30));

        txn.transaction_type = TransactionType::Income;
        assert_eq!(txn.balance_delta(), Money::from_major(30));
    }

    #[test]
    fn test_validation() {
        let draft = NewTransaction::new(
            AccountId::new(1),
            TransactionType::Expense,
            Money::from_major(-5),
            "Refund",
        );
        assert!(matches!(
            draft.validate(),
            Err(TransactionValidationError::NegativeAmount(_))
        ));

        let draft = NewTransaction::new(
            AccountId::new(1),
            TransactionType::Income,
            Money::zero(),
            " ",
        );
        assert_eq!(
            draft.validate(),
            Err(TransactionValidationError::EmptyDescription)
        );

        assert!(expense(Money::zero()).validate().is_ok());
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(TransactionStatus::Pending.toggled(), TransactionStatus::Completed);
        assert_eq!(TransactionStatus::Completed.toggled(), TransactionStatus::Pending);
        assert_eq!(TransactionStatus::parse("done"), Some(TransactionStatus::Completed));
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(expense(Money::from_cents(15050))).unwrap();
        assert_eq!(json["accountId"], 1);
        assert_eq!(json["type"], "expense");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["category"], "Food");
        assert!(json["date"].as_str().unwrap().starts_with("2025-03-14T12:00:00"));
    }

    #[test]
    fn test_missing_status_defaults_to_pending() {
        let txn: Transaction = serde_json::from_str(
            r#"{
                "id": 3,
                "accountId": 1,
                "description": "Paycheck",
                "amount": 3000,
                "type": "income",
                "category": "Salary",
                "date": "2024-05-01T09:30:00.000Z"
            }"#,
        )
        .unwrap();
        assert_eq!(txn.status, TransactionStatus::Pending);
        assert_eq!(txn.amount, Money::from_major(3000));
        assert!(txn.is_income());
    }
}
