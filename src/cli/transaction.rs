//! Transaction CLI commands
//!
//! Implements CLI commands for transaction management. Balances are kept in
//! step by the service, so every add, edit and delete prints the account's
//! new balance.

use clap::Subcommand;

use super::{parse_date, parse_end_date, parse_money};
use crate::config::Settings;
use crate::display::transaction::{format_transaction_details, format_transaction_list};
use crate::display::DisplayOptions;
use crate::error::{FinanzenError, FinanzenResult};
use crate::models::{AccountId, NewTransaction, TransactionId, TransactionStatus, TransactionType};
use crate::services::{AccountService, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// List transactions, newest first
    List {
        /// Filter by account name or ID
        #[arg(short, long)]
        account: Option<String>,
        /// Filter by status (pending, completed)
        #[arg(short, long)]
        status: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Add a new transaction
    Add {
        /// Account name or ID
        account: String,
        /// Transaction type (income, expense)
        #[arg(value_name = "TYPE")]
        transaction_type: String,
        /// Amount (e.g., "30.00")
        amount: String,
        /// Description
        description: String,
        /// Category name
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to now
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// Move to another account (name or ID)
        #[arg(short, long)]
        account: Option<String>,
        /// New type (income, expense)
        #[arg(short = 't', long = "type")]
        transaction_type: Option<String>,
        /// New amount
        #[arg(long)]
        amount: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Delete a transaction and reverse its effect on the account
    Delete {
        /// Transaction ID
        id: String,
    },
    /// Set or toggle a transaction's status
    Status {
        /// Transaction ID
        id: String,
        /// New status (pending, completed); toggles when omitted
        status: Option<String>,
    },
}

fn parse_id(input: &str) -> FinanzenResult<TransactionId> {
    input.parse().map_err(|_| {
        FinanzenError::Validation(format!("Invalid transaction ID: '{}'", input))
    })
}

fn parse_type(input: &str) -> FinanzenResult<TransactionType> {
    TransactionType::parse(input).ok_or_else(|| {
        FinanzenError::Validation(format!(
            "Invalid transaction type: '{}'. Use 'income' or 'expense'",
            input
        ))
    })
}

fn parse_status(input: &str) -> FinanzenResult<TransactionStatus> {
    TransactionStatus::parse(input).ok_or_else(|| {
        FinanzenError::Validation(format!(
            "Invalid status: '{}'. Use 'pending' or 'completed'",
            input
        ))
    })
}

/// Handle a transaction command
pub async fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> FinanzenResult<()> {
    let service = TransactionService::new(storage);
    let accounts = AccountService::new(storage);
    let options = DisplayOptions::from_settings(settings);

    match cmd {
        TransactionCommands::List {
            account,
            status,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(account) = account {
                filter = filter.account(accounts.require(&account).await?.id);
            }
            if let Some(status) = status {
                filter = filter.status(parse_status(&status)?);
            }
            if let Some(from) = from {
                filter.start = Some(parse_date(&from)?);
            }
            if let Some(to) = to {
                filter.end = Some(parse_end_date(&to)?);
            }

            let transactions = service.list(filter).await?;
            let all_accounts = accounts.list().await?;
            print!(
                "{}",
                format_transaction_list(&transactions, &all_accounts, options)
            );
        }

        TransactionCommands::Show { id } => {
            let id = parse_id(&id)?;
            let txn = service
                .get(id)
                .await?
                .ok_or_else(|| FinanzenError::transaction_not_found(id.to_string()))?;
            let all_accounts = accounts.list().await?;
            print!(
                "{}",
                format_transaction_details(&txn, &all_accounts, options)
            );
        }

        TransactionCommands::Add {
            account,
            transaction_type,
            amount,
            description,
            category,
            date,
        } => {
            let account = accounts.require(&account).await?;
            let mut draft = NewTransaction::new(
                account.id,
                parse_type(&transaction_type)?,
                parse_money(&amount)?,
                description,
            );
            if let Some(category) = category {
                draft = draft.with_category(category);
            }
            if let Some(date) = date {
                draft = draft.with_date(parse_date(&date)?);
            }

            let txn = service.add(draft).await?;
            println!("Added transaction: {} ({})", txn.description, txn.id);
            println!("  {} {}", txn.transaction_type, options.money(txn.amount));
            print_balance(&accounts, &account.name, txn.account_id, options).await?;
        }

        TransactionCommands::Edit {
            id,
            account,
            transaction_type,
            amount,
            description,
            category,
            date,
        } => {
            let id = parse_id(&id)?;
            let mut txn = service
                .get(id)
                .await?
                .ok_or_else(|| FinanzenError::transaction_not_found(id.to_string()))?;

            if account.is_none()
                && transaction_type.is_none()
                && amount.is_none()
                && description.is_none()
                && category.is_none()
                && date.is_none()
            {
                println!("No changes specified.");
                return Ok(());
            }

            if let Some(account) = account {
                txn.account_id = accounts.require(&account).await?.id;
            }
            if let Some(transaction_type) = transaction_type {
                txn.transaction_type = parse_type(&transaction_type)?;
            }
            if let Some(amount) = amount {
                txn.amount = parse_money(&amount)?;
            }
            if let Some(description) = description {
                txn.description = description;
            }
            if let Some(category) = category {
                txn.category = category;
            }
            if let Some(date) = date {
                txn.date = parse_date(&date)?;
            }

            let updated = service.update(txn).await?;
            println!("Updated transaction: {} ({})", updated.description, updated.id);
        }

        TransactionCommands::Delete { id } => {
            let id = parse_id(&id)?;
            let txn = service
                .get(id)
                .await?
                .ok_or_else(|| FinanzenError::transaction_not_found(id.to_string()))?;

            match service.delete(&txn).await? {
                Some(account) => {
                    println!("Deleted transaction: {}", txn.description);
                    println!(
                        "  {} balance: {}",
                        account.name,
                        options.money(account.balance)
                    );
                }
                None => println!(
                    "Deleted transaction: {} (account {} no longer exists)",
                    txn.description, txn.account_id
                ),
            }
        }

        TransactionCommands::Status { id, status } => {
            let id = parse_id(&id)?;
            let txn = match status {
                Some(status) => service.set_status(id, parse_status(&status)?).await?,
                None => service.toggle_status(id).await?,
            };
            println!("{} is now {}", txn.id, txn.status);
        }
    }

    Ok(())
}

async fn print_balance(
    accounts: &AccountService<'_>,
    name: &str,
    id: AccountId,
    options: DisplayOptions<'_>,
) -> FinanzenResult<()> {
    if let Some(account) = accounts.get(id).await? {
        println!("  {} balance: {}", name, options.money(account.balance));
    }
    Ok(())
}
