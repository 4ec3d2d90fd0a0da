//! Category CLI commands
//!
//! Categories are labels only; deleting one leaves transactions that use the
//! name untouched.

use clap::Subcommand;

use crate::display::category::format_category_list;
use crate::error::{FinanzenError, FinanzenResult};
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,
    /// Add a new category
    #[command(alias = "create")]
    Add {
        /// Category name
        name: String,
    },
    /// Delete a category
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub async fn handle_category_command(
    storage: &Storage,
    cmd: CategoryCommands,
) -> FinanzenResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            let categories = service.list().await?;
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Add { name } => {
            let category = service.create(&name).await?;
            println!("Created category: {} ({})", category.name, category.id);
        }

        CategoryCommands::Delete { category } => {
            let found = service
                .find(&category)
                .await?
                .ok_or_else(|| FinanzenError::category_not_found(&category))?;
            let deleted = service.delete(found.id).await?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}
