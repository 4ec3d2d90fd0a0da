//! Account display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::DisplayOptions;
use crate::models::{Account, Money};

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    account_type: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

/// Format accounts as a table followed by the total balance
pub fn format_account_list(accounts: &[Account], options: DisplayOptions<'_>) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let rows = accounts.iter().map(|account| AccountRow {
        id: account.id.to_string(),
        name: account.name.clone(),
        account_type: account.account_type.to_string(),
        balance: options.money(account.balance),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::single(3)).with(Alignment::right()));

    let total: Money = accounts.iter().map(|a| a.balance).sum();
    format!("{}\n\nTotal: {}\n", table, options.money(total))
}

pub fn format_account_details(account: &Account, options: DisplayOptions<'_>) -> String {
    let mut output = String::new();
    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  ID:      {}\n", account.id));
    output.push_str(&format!("  Type:    {}\n", account.account_type));
    output.push_str(&format!("  Balance: {}\n", options.money(account.balance)));
    output
}
