//! Spending Report
//!
//! Expense totals by category, largest first.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::FinanzenResult;
use crate::models::{Money, Transaction, UNCATEGORIZED};
use crate::services::{TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Spending in one category
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingByCategory {
    pub category: String,
    pub total: Money,
    pub transaction_count: usize,
    /// Share of all spending, `0..=100`, two decimal places
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpendingReport {
    pub categories: Vec<SpendingByCategory>,
    pub total_spending: Money,
    pub transaction_count: usize,
}

impl SpendingReport {
    /// Build the report from a set of transactions; income is ignored
    ///
    /// Blank categories are reported as `Uncategorized`. Ties are ordered by
    /// category name.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut by_category: HashMap<String, (Money, usize)> = HashMap::new();

        for txn in transactions.iter().filter(|t| t.is_expense()) {
            let category = match txn.category.trim() {
                "" => UNCATEGORIZED.to_string(),
                name => name.to_string(),
            };
            let entry = by_category.entry(category).or_insert((Money::zero(), 0));
            entry.0 += txn.amount;
            entry.1 += 1;
        }

        let total_spending: Money = by_category.values().map(|(total, _)| *total).sum();
        let transaction_count = by_category.values().map(|(_, count)| count).sum();

        let mut categories: Vec<SpendingByCategory> = by_category
            .into_iter()
            .map(|(category, (total, transaction_count))| SpendingByCategory {
                percentage: percentage_of(total, total_spending),
                category,
                total,
                transaction_count,
            })
            .collect();

        categories.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });

        Self {
            categories,
            total_spending,
            transaction_count,
        }
    }

    /// Spending report over stored transactions, optionally limited to a
    /// date range
    pub async fn generate(
        storage: &Storage,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> FinanzenResult<Self> {
        let filter = TransactionFilter {
            start,
            end,
            ..TransactionFilter::default()
        };
        let transactions = TransactionService::new(storage).list(filter).await?;
        Ok(Self::from_transactions(&transactions))
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// The `limit` largest categories
    pub fn top_categories(&self, limit: usize) -> &[SpendingByCategory] {
        &self.categories[..limit.min(self.categories.len())]
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Spending by Category\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>12} {:>7} {:>8}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for row in &self.categories {
            output.push_str(&format!(
                "{:<30} {:>12} {:>7} {:>7}%\n",
                row.category,
                row.total.to_string(),
                row.transaction_count,
                row.percentage
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>12} {:>7}\n",
            "TOTAL SPENDING",
            self.total_spending.to_string(),
            self.transaction_count
        ));

        output
    }
}

fn percentage_of(part: Money, whole: Money) -> Decimal {
    if !whole.is_positive() {
        return Decimal::ZERO;
    }
    part.amount()
        .checked_div(whole.amount())
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::ONE_HUNDRED, |percent| {
            percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        })
        .round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, NewTransaction, TransactionId, TransactionType};
    use rust_decimal_macros::dec;

    fn txn(id: u64, kind: TransactionType, amount: i64, category: &str) -> Transaction {
        let draft = NewTransaction::new(
            AccountId::new(1),
            kind,
            Money::from_major(amount),
            "test",
        )
        .with_category(category);

        Transaction {
            id: TransactionId::new(id),
            account_id: draft.account_id,
            description: draft.description,
            amount: draft.amount,
            transaction_type: draft.transaction_type,
            category: draft.category,
            date: draft.date,
            status: draft.status,
        }
    }

    #[test]
    fn test_groups_and_sorts_expenses() {
        let transactions = vec![
            txn(1, TransactionType::Income, 3000, "Salary"),
            txn(2, TransactionType::Expense, 150, "Food"),
            txn(3, TransactionType::Expense, 1200, "Housing"),
            txn(4, TransactionType::Expense, 50, "Food"),
            txn(5, TransactionType::Expense, 100, ""),
        ];

        let report = SpendingReport::from_transactions(&transactions);
        let names: Vec<&str> = report.categories.iter().map(|c| c.category.as_str()).collect();

        assert_eq!(names, vec!["Housing", "Food", "Uncategorized"]);
        assert_eq!(report.total_spending, Money::from_major(1500));
        assert_eq!(report.transaction_count, 4);
        assert_eq!(report.categories[1].total, Money::from_major(200));
        assert_eq!(report.categories[1].transaction_count, 2);
        assert_eq!(report.categories[0].percentage, dec!(80));
    }

    #[test]
    fn test_percentage_never_overflows() {
        let huge = Money::from_decimal(Decimal::MAX);
        let tiny = Money::from_decimal(Decimal::new(1, 20));

        assert_eq!(percentage_of(huge, tiny), dec!(100));
        assert_eq!(percentage_of(Money::from_major(1), Money::from_major(4)), dec!(25));
        assert_eq!(percentage_of(tiny, Money::zero()), Decimal::ZERO);
    }

    #[test]
    fn test_empty_report() {
        let report =
            SpendingReport::from_transactions(&[txn(1, TransactionType::Income, 10, "Salary")]);
        assert!(report.is_empty());
        assert!(report.total_spending.is_zero());
        assert!(report.top_categories(3).is_empty());
    }

    #[test]
    fn test_format_terminal() {
        let report = SpendingReport::from_transactions(&[txn(
            1,
            TransactionType::Expense,
            60,
            "Utilities",
        )]);
        let output = report.format_terminal();

        assert!(output.contains("Utilities"));
        assert!(output.contains("$60.00"));
        assert!(output.contains("100"));
    }
}
