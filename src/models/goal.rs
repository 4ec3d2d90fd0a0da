//! Savings goal model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;
use super::money::Money;

/// A stored savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Money,
    pub deadline: DateTime<Utc>,
}

impl Goal {
    /// Progress towards the target as a percentage in `0..=100`
    ///
    /// A goal with a zero target reports no progress.
    pub fn progress_percent(&self) -> Decimal {
        if !self.target_amount.is_positive() {
            return Decimal::ZERO;
        }

        let current = self.current_amount.amount();
        let percent = current
            .checked_div(self.target_amount.amount())
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

        match percent {
            Some(percent) => percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED),
            // Too large to represent: far past a positive target
            None if current.is_sign_positive() => Decimal::ONE_HUNDRED,
            None => Decimal::ZERO,
        }
    }

    /// Amount still missing to reach the target (never negative)
    pub fn remaining(&self) -> Money {
        let remaining = self.target_amount - self.current_amount;
        if remaining.is_negative() {
            Money::zero()
        } else {
            remaining
        }
    }

    pub fn is_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        validate_fields(&self.name, self.target_amount, self.current_amount)
    }
}

/// A goal that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Money,
    pub deadline: DateTime<Utc>,
}

impl NewGoal {
    pub fn new(name: impl Into<String>, target_amount: Money, deadline: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            target_amount,
            current_amount: Money::zero(),
            deadline,
        }
    }

    pub fn with_current(mut self, current_amount: Money) -> Self {
        self.current_amount = current_amount;
        self
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        validate_fields(&self.name, self.target_amount, self.current_amount)
    }
}

fn validate_fields(name: &str, target: Money, current: Money) -> Result<(), GoalValidationError> {
    if name.trim().is_empty() {
        return Err(GoalValidationError::EmptyName);
    }
    if !target.is_positive() {
        return Err(GoalValidationError::NonPositiveTarget(target));
    }
    if current.is_negative() {
        return Err(GoalValidationError::NegativeCurrent(current));
    }
    Ok(())
}

/// Validation errors for goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalValidationError {
    EmptyName,
    NonPositiveTarget(Money),
    NegativeCurrent(Money),
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Goal name cannot be empty"),
            Self::NonPositiveTarget(target) => {
                write!(f, "Goal target must be greater than zero, got {}", target)
            }
            Self::NegativeCurrent(current) => {
                write!(f, "Goal progress cannot be negative, got {}", current)
            }
        }
    }
}

impl std::error::Error for GoalValidationError {}
