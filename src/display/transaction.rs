//! Transaction display formatting
//!
//! Amounts are shown signed: income positive, expenses negative.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::{truncate, DisplayOptions};
use crate::models::{Account, Transaction, TransactionStatus};
use crate::reports::dashboard::account_name;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "St")]
    status: &'static str,
}

fn status_icon(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Pending => " ",
        TransactionStatus::Completed => "✓",
    }
}

/// Format transactions as a register; account names are resolved from
/// `accounts`
pub fn format_transaction_list(
    transactions: &[Transaction],
    accounts: &[Account],
    options: DisplayOptions<'_>,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions.iter().map(|txn| TransactionRow {
        id: txn.id.to_string(),
        date: options.date(txn.date),
        description: truncate(&txn.description, 30),
        account: account_name(accounts, txn.account_id).to_string(),
        category: txn.category.clone(),
        amount: options.money(txn.balance_delta()),
        status: status_icon(txn.status),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::single(5)).with(Alignment::right()));
    format!("{}\n", table)
}

pub fn format_transaction_details(
    txn: &Transaction,
    accounts: &[Account],
    options: DisplayOptions<'_>,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("  Date:        {}\n", options.date(txn.date)));
    output.push_str(&format!("  Description: {}\n", txn.description));
    output.push_str(&format!(
        "  Account:     {}\n",
        account_name(accounts, txn.account_id)
    ));
    output.push_str(&format!("  Type:        {}\n", txn.transaction_type));
    output.push_str(&format!("  Amount:      {}\n", options.money(txn.amount)));
    if !txn.category.is_empty() {
        output.push_str(&format!("  Category:    {}\n", txn.category));
    }
    output.push_str(&format!("  Status:      {}\n", txn.status));
    output
}
