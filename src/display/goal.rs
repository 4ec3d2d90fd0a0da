//! Savings goal display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::DisplayOptions;
use crate::models::Goal;

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
}

pub fn format_goal_list(goals: &[Goal], options: DisplayOptions<'_>) -> String {
    if goals.is_empty() {
        return "No goals found.\n".to_string();
    }

    let rows = goals.iter().map(|goal| GoalRow {
        id: goal.id.to_string(),
        name: goal.name.clone(),
        saved: options.money(goal.current_amount),
        target: options.money(goal.target_amount),
        progress: format!("{}%", goal.progress_percent().round_dp(1)),
        deadline: options.date(goal.deadline),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(2..5)).with(Alignment::right()));
    format!("{}\n", table)
}

pub fn format_goal_details(goal: &Goal, options: DisplayOptions<'_>) -> String {
    let mut output = String::new();
    output.push_str(&format!("Goal: {}\n", goal.name));
    output.push_str(&format!("  ID:        {}\n", goal.id));
    output.push_str(&format!("  Saved:     {}\n", options.money(goal.current_amount)));
    output.push_str(&format!("  Target:    {}\n", options.money(goal.target_amount)));
    output.push_str(&format!("  Remaining: {}\n", options.money(goal.remaining())));
    output.push_str(&format!("  Deadline:  {}\n", options.date(goal.deadline)));
    if goal.is_reached() {
        output.push_str("  Reached!\n");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalId, Money};
    use chrono::{TimeZone, Utc};

    fn vacation() -> Goal {
        Goal {
            id: GoalId::new(1),
            name: "Vacation".into(),
            target_amount: Money::from_major(2000),
            current_amount: Money::from_major(500),
            deadline: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_goal_list() {
        let output = format_goal_list(&[vacation()], DisplayOptions::default());
        assert!(output.contains("Vacation"));
        assert!(output.contains("25.0%"));
        assert!(output.contains("2026-06-01"));
    }

    #[test]
    fn test_goal_details() {
        let output = format_goal_details(&vacation(), DisplayOptions::default());
        assert!(output.contains("Remaining: $1500.00"));
        assert!(!output.contains("Reached"));
    }
}
