//! Display formatting for terminal output
//!
//! Table and detail views for the CLI. Amounts and dates are rendered with
//! the user's currency symbol and date format from the settings file.

pub mod account;
pub mod category;
pub mod goal;
pub mod transaction;

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::models::Money;

pub use account::{format_account_details, format_account_list};
pub use category::format_category_list;
pub use goal::{format_goal_details, format_goal_list};
pub use transaction::{format_transaction_details, format_transaction_list};

/// Formatting preferences shared by every view
#[derive(Debug, Clone, Copy)]
pub struct DisplayOptions<'a> {
    pub currency_symbol: &'a str,
    pub date_format: &'a str,
}

impl<'a> DisplayOptions<'a> {
    pub fn from_settings(settings: &'a Settings) -> Self {
        Self {
            currency_symbol: &settings.currency_symbol,
            date_format: &settings.date_format,
        }
    }

    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(self.currency_symbol)
    }

    pub fn date(&self, date: DateTime<Utc>) -> String {
        date.format(self.date_format).to_string()
    }
}

impl Default for DisplayOptions<'static> {
    fn default() -> Self {
        Self {
            currency_symbol: "$",
            date_format: "%Y-%m-%d",
        }
    }
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Café au lait", 7), "Café...");
    }

    #[test]
    fn test_options_from_settings() {
        let mut settings = Settings::default();
        settings.currency_symbol = "€".into();
        settings.date_format = "%d.%m.%Y".into();
        let options = DisplayOptions::from_settings(&settings);

        assert_eq!(options.money(Money::from_cents(-1250)), "-€12.50");
        let date = Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(options.date(date), "09.03.2025");
    }
}
