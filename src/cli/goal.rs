//! Savings goal CLI commands

use clap::Subcommand;

use super::{parse_date, parse_money};
use crate::config::Settings;
use crate::display::goal::{format_goal_details, format_goal_list};
use crate::display::DisplayOptions;
use crate::error::{FinanzenError, FinanzenResult};
use crate::models::NewGoal;
use crate::services::GoalService;
use crate::storage::Storage;

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// List all goals with progress
    List,
    /// Show goal details
    Show {
        /// Goal name or ID
        goal: String,
    },
    /// Add a new savings goal
    Add {
        /// Goal name
        name: String,
        /// Target amount
        target: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: String,
        /// Amount already saved
        #[arg(short, long, default_value = "0")]
        saved: String,
    },
    /// Edit a goal
    Edit {
        /// Goal name or ID
        goal: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New target amount
        #[arg(short, long)]
        target: Option<String>,
        /// New saved amount
        #[arg(short, long)]
        saved: Option<String>,
        /// New deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: Option<String>,
    },
    /// Delete a goal
    Delete {
        /// Goal name or ID
        goal: String,
    },
}

/// Handle a goal command
pub async fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GoalCommands,
) -> FinanzenResult<()> {
    let service = GoalService::new(storage);
    let options = DisplayOptions::from_settings(settings);

    match cmd {
        GoalCommands::List => {
            let goals = service.list().await?;
            print!("{}", format_goal_list(&goals, options));
        }

        GoalCommands::Show { goal } => {
            let found = service
                .find(&goal)
                .await?
                .ok_or_else(|| FinanzenError::goal_not_found(&goal))?;
            print!("{}", format_goal_details(&found, options));
        }

        GoalCommands::Add {
            name,
            target,
            deadline,
            saved,
        } => {
            let draft = NewGoal::new(name, parse_money(&target)?, parse_date(&deadline)?)
                .with_current(parse_money(&saved)?);
            let goal = service.create(draft).await?;

            println!("Created goal: {}", goal.name);
            println!(
                "  {} of {} by {}",
                options.money(goal.current_amount),
                options.money(goal.target_amount),
                options.date(goal.deadline)
            );
            println!("  ID: {}", goal.id);
        }

        GoalCommands::Edit {
            goal,
            name,
            target,
            saved,
            deadline,
        } => {
            let mut found = service
                .find(&goal)
                .await?
                .ok_or_else(|| FinanzenError::goal_not_found(&goal))?;

            if name.is_none() && target.is_none() && saved.is_none() && deadline.is_none() {
                println!("No changes specified.");
                return Ok(());
            }

            if let Some(name) = name {
                found.name = name.trim().to_string();
            }
            if let Some(target) = target {
                found.target_amount = parse_money(&target)?;
            }
            if let Some(saved) = saved {
                found.current_amount = parse_money(&saved)?;
            }
            if let Some(deadline) = deadline {
                found.deadline = parse_date(&deadline)?;
            }

            let updated = service.update(found).await?;
            println!(
                "Updated goal: {} ({}% reached)",
                updated.name,
                updated.progress_percent().round_dp(1)
            );
        }

        GoalCommands::Delete { goal } => {
            let found = service
                .find(&goal)
                .await?
                .ok_or_else(|| FinanzenError::goal_not_found(&goal))?;
            let deleted = service.delete(found.id).await?;
            println!("Deleted goal: {}", deleted.name);
        }
    }

    Ok(())
}
