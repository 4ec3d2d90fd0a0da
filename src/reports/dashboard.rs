//! Dashboard summary
//!
//! The figures shown on the overview screen: total balance, recent
//! activity, income and expense totals, and progress on each goal.

use rust_decimal::Decimal;

use crate::error::FinanzenResult;
use crate::models::{Account, AccountId, Goal, Money, Transaction};
use crate::storage::Storage;

/// Number of transactions listed under recent activity
pub const RECENT_TRANSACTION_COUNT: usize = 5;

/// Label for transactions whose account no longer exists
pub const UNKNOWN_ACCOUNT: &str = "Unknown Account";

/// Name of the account with `id`, or `Unknown Account`
pub fn account_name(accounts: &[Account], id: AccountId) -> &str {
    accounts
        .iter()
        .find(|a| a.id == id)
        .map(|a| a.name.as_str())
        .unwrap_or(UNKNOWN_ACCOUNT)
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub goal: Goal,
    /// Percent of target reached, capped at 100
    pub percent: Decimal,
    pub remaining: Money,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_balance: Money,
    pub account_count: usize,
    /// Newest first
    pub recent_transactions: Vec<Transaction>,
    pub total_income: Money,
    pub total_expenses: Money,
    pub goals: Vec<GoalProgress>,
}

impl DashboardSummary {
    pub fn from_records(accounts: &[Account], transactions: &[Transaction], goals: &[Goal]) -> Self {
        let mut recent = transactions.to_vec();
        recent.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        recent.truncate(RECENT_TRANSACTION_COUNT);

        let total_income: Money = transactions
            .iter()
            .filter(|t| t.is_income())
            .map(|t| t.amount)
            .sum();
        let total_expenses: Money = transactions
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.amount)
            .sum();

        Self {
            total_balance: accounts.iter().map(|a| a.balance).sum(),
            account_count: accounts.len(),
            recent_transactions: recent,
            total_income,
            total_expenses,
            goals: goals
                .iter()
                .map(|goal| GoalProgress {
                    percent: goal.progress_percent(),
                    remaining: goal.remaining(),
                    goal: goal.clone(),
                })
                .collect(),
        }
    }

    /// Summary over everything stored, read from one snapshot
    pub async fn generate(storage: &Storage) -> FinanzenResult<Self> {
        storage
            .db()
            .read(|tx| {
                let accounts = tx.get_all::<Account>()?;
                let transactions = tx.get_all::<Transaction>()?;
                let goals = tx.get_all::<Goal>()?;
                Ok(Self::from_records(&accounts, &transactions, &goals))
            })
            .await
    }

    /// Income minus expenses
    pub fn net_flow(&self) -> Money {
        self.total_income - self.total_expenses
    }

    pub fn format_terminal(&self, accounts: &[Account]) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Total Balance: {} across {} accounts\n",
            self.total_balance, self.account_count
        ));
        output.push_str(&format!(
            "Income: {}   Expenses: {}   Net: {}\n",
            self.total_income,
            self.total_expenses,
            self.net_flow()
        ));

        output.push_str("\nRecent Transactions\n");
        output.push_str(&"-".repeat(60));
        output.push('\n');
        if self.recent_transactions.is_empty() {
            output.push_str("  (none)\n");
        }
        for txn in &self.recent_transactions {
            let amount = if txn.is_income() {
                format!("+{}", txn.amount)
            } else {
                format!("-{}", txn.amount)
            };
            output.push_str(&format!(
                "  {} {:<24} {:<16} {:>12}\n",
                txn.date.format("%Y-%m-%d"),
                txn.description,
                account_name(accounts, txn.account_id),
                amount
            ));
        }

        if !self.goals.is_empty() {
            output.push_str("\nGoals\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for progress in &self.goals {
                output.push_str(&format!(
                    "  {:<24} {} of {} ({}%)\n",
                    progress.goal.name,
                    progress.goal.current_amount,
                    progress.goal.target_amount,
                    progress.percent.round_dp(1)
                ));
            }
        }

        output
    }
}
