//! CLI commands for reports

use crate::cli::{parse_date, parse_end_date};
use crate::error::FinanzenResult;
use crate::reports::{DashboardSummary, SpendingReport};
use crate::services::AccountService;
use crate::storage::Storage;

/// Print the dashboard summary
pub async fn handle_summary_command(storage: &Storage) -> FinanzenResult<()> {
    let summary = DashboardSummary::generate(storage).await?;
    let accounts = AccountService::new(storage).list().await?;

    println!("FinanZen Summary");
    println!("================");
    print!("{}", summary.format_terminal(&accounts));
    Ok(())
}

/// Print spending by category, optionally limited to a date range
pub async fn handle_spending_command(
    storage: &Storage,
    from: Option<String>,
    to: Option<String>,
    top: Option<usize>,
) -> FinanzenResult<()> {
    let start = from.as_deref().map(parse_date).transpose()?;
    let end = to.as_deref().map(parse_end_date).transpose()?;

    let report = SpendingReport::generate(storage, start, end).await?;
    if report.is_empty() {
        println!("No spending recorded for this period.");
        return Ok(());
    }

    match top {
        Some(limit) => {
            println!("Top {} spending categories", limit);
            for entry in report.top_categories(limit) {
                println!(
                    "  {:<20} {:>12} ({}%)",
                    entry.category, entry.total, entry.percentage
                );
            }
            println!("  Total spending: {}", report.total_spending);
        }
        None => print!("{}", report.format_terminal()),
    }

    Ok(())
}
