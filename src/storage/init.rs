//! First-run demo data
//!
//! A brand-new database gets two accounts, a month's worth of Checking
//! activity, one savings goal and the default categories. Records go in
//! through the raw store: the seeded balances already include the seeded
//! transactions, so nothing is reconciled.

use chrono::{Duration, Utc};

use super::database::{Database, WriteTx};
use crate::error::FinanzenResult;
use crate::models::{
    Account, AccountType, Category, Goal, Money, NewAccount, NewCategory, NewGoal,
    NewTransaction, Transaction, TransactionType, DEFAULT_CATEGORIES,
};

/// What `seed_if_empty` inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub accounts: usize,
    pub transactions: usize,
    pub goals: usize,
    pub categories: usize,
}

impl SeedSummary {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Seed demo data into a database with no accounts
///
/// Categories are seeded separately, only when that store is empty too.
pub async fn seed_if_empty(db: &Database) -> FinanzenResult<SeedSummary> {
    let summary = db
        .write(|tx| {
            let mut summary = SeedSummary::default();
            if tx.get_all::<Account>()?.is_empty() {
                seed_demo_records(tx, &mut summary)?;
            }
            if tx.get_all::<Category>()?.is_empty() {
                for name in DEFAULT_CATEGORIES {
                    tx.add::<Category>(&NewCategory::new(name))?;
                    summary.categories += 1;
                }
            }
            Ok(summary)
        })
        .await?;

    if !summary.is_empty() {
        tracing::info!(
            accounts = summary.accounts,
            transactions = summary.transactions,
            goals = summary.goals,
            categories = summary.categories,
            "seeded demo data"
        );
    }

    Ok(summary)
}

fn seed_demo_records(tx: &mut WriteTx<'_>, summary: &mut SeedSummary) -> FinanzenResult<()> {
    let checking = tx.add::<Account>(&NewAccount::new(
        "Checking",
        AccountType::Checking,
        Money::from_major(5000),
    ))?;
    tx.add::<Account>(&NewAccount::new(
        "Savings",
        AccountType::Savings,
        Money::from_major(15000),
    ))?;
    summary.accounts = 2;

    let now = Utc::now();
    let activity = [
        ("Paycheck", 3000, TransactionType::Income, "Salary", 0),
        ("Groceries", 150, TransactionType::Expense, "Food", 2),
        ("Rent", 1200, TransactionType::Expense, "Housing", 5),
        ("Internet Bill", 60, TransactionType::Expense, "Utilities", 10),
    ];

    for (description, amount, transaction_type, category, days_ago) in activity {
        let draft = NewTransaction::new(
            checking.id,
            transaction_type,
            Money::from_major(amount),
            description,
        )
        .with_category(category)
        .with_date(now - Duration::days(days_ago));
        tx.add::<Transaction>(&draft)?;
        summary.transactions += 1;
    }

    tx.add::<Goal>(
        &NewGoal::new("Japan Trip", Money::from_major(4000), now + Duration::days(365))
            .with_current(Money::from_major(500)),
    )?;
    summary.goals = 1;

    Ok(())
}
