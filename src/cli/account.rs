//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use super::parse_money;
use crate::config::Settings;
use crate::display::account::{format_account_details, format_account_list};
use crate::display::DisplayOptions;
use crate::error::{FinanzenError, FinanzenResult};
use crate::models::{AccountType, NewAccount};
use crate::services::AccountService;
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// List all accounts with the total balance
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Add a new account
    #[command(alias = "create")]
    Add {
        /// Account name
        name: String,
        /// Account type (checking, savings, credit_card, investment)
        #[arg(short = 't', long = "type", default_value = "checking")]
        account_type: String,
        /// Opening balance (e.g., "1000.00" or "1000")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        balance: String,
    },
    /// Edit an account
    Edit {
        /// Account name or ID
        account: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New account type
        #[arg(short = 't', long = "type")]
        account_type: Option<String>,
        /// Overwrite the balance
        #[arg(short, long, allow_hyphen_values = true)]
        balance: Option<String>,
    },
    /// Delete an account (its transactions are kept)
    Delete {
        /// Account name or ID
        account: String,
    },
}

fn parse_account_type(input: &str) -> FinanzenResult<AccountType> {
    AccountType::parse(input).ok_or_else(|| {
        FinanzenError::Validation(format!(
            "Invalid account type: '{}'. Valid types: checking, savings, credit_card, investment",
            input
        ))
    })
}

/// Handle an account command
pub async fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AccountCommands,
) -> FinanzenResult<()> {
    let service = AccountService::new(storage);
    let options = DisplayOptions::from_settings(settings);

    match cmd {
        AccountCommands::List => {
            let accounts = service.list().await?;
            print!("{}", format_account_list(&accounts, options));
        }

        AccountCommands::Show { account } => {
            let found = service.require(&account).await?;
            print!("{}", format_account_details(&found, options));
        }

        AccountCommands::Add {
            name,
            account_type,
            balance,
        } => {
            let account_type = parse_account_type(&account_type)?;
            let balance = parse_money(&balance)?;

            let account = service
                .create(NewAccount::new(name, account_type, balance))
                .await?;

            println!("Created account: {}", account.name);
            println!("  Type: {}", account.account_type);
            println!("  Balance: {}", options.money(account.balance));
            println!("  ID: {}", account.id);
        }

        AccountCommands::Edit {
            account,
            name,
            account_type,
            balance,
        } => {
            let mut found = service.require(&account).await?;

            if name.is_none() && account_type.is_none() && balance.is_none() {
                println!("No changes specified. Use --name, --type or --balance.");
                return Ok(());
            }

            if let Some(name) = name {
                found.name = name.trim().to_string();
            }
            if let Some(account_type) = account_type {
                found.account_type = parse_account_type(&account_type)?;
            }
            if let Some(balance) = balance {
                found.balance = parse_money(&balance)?;
            }

            let updated = service.update(found).await?;
            println!("Updated account: {}", updated.name);
        }

        AccountCommands::Delete { account } => {
            let found = service.require(&account).await?;
            let deleted = service.delete(found.id).await?;
            println!("Deleted account: {}", deleted.name);
        }
    }

    Ok(())
}
