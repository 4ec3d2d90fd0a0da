use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finanzen::cli::{
    handle_account_command, handle_audit_command, handle_backup_command, handle_category_command,
    handle_goal_command, handle_restore_command, handle_spending_command, handle_summary_command,
    handle_transaction_command,
};
use finanzen::config::{FinanzenPaths, Settings};
use finanzen::storage::{seed_if_empty, Storage};

/// Environment variable holding the log filter
const LOG_ENV: &str = "FINANZEN_LOG";

#[derive(Parser)]
#[command(
    name = "finanzen",
    version,
    about = "Personal finance tracker with local storage and JSON backups",
    long_about = "FinanZen keeps accounts, transactions and savings goals in a local \
                  database and keeps every account balance in step with its \
                  transactions. Backups are plain JSON files."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and seed demo data
    Init,

    /// Show current configuration and paths
    Config,

    /// Account management commands
    #[command(subcommand)]
    Account(finanzen::cli::AccountCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(finanzen::cli::TransactionCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(finanzen::cli::GoalCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(finanzen::cli::CategoryCommands),

    /// Backup commands
    #[command(subcommand)]
    Backup(finanzen::cli::BackupCommands),

    /// Restore accounts, transactions and goals from a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip the confirmation step
        #[arg(short, long)]
        force: bool,
    },

    /// Show balances, recent activity and goal progress
    Summary,

    /// Show the most recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show spending by category
    Spending {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Show top N categories only
        #[arg(long)]
        top: Option<usize>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = FinanzenPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let storage = Storage::open(paths.clone()).await?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing FinanZen at: {}", paths.base_dir().display());
            settings.save(&paths)?;

            if settings.seed_demo_data {
                let seeded = seed_if_empty(storage.db()).await?;
                if seeded.is_empty() {
                    println!("Existing data found; nothing seeded.");
                } else {
                    println!(
                        "Seeded {} accounts, {} transactions, {} goals and {} categories.",
                        seeded.accounts, seeded.transactions, seeded.goals, seeded.categories
                    );
                }
            }

            println!("Initialization complete!");
            println!();
            println!("Run 'finanzen summary' to see your dashboard.");
        }
        Some(Commands::Config) => {
            println!("FinanZen Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Database file:    {}", paths.database_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Database:");
            println!("  Schema version: {}", storage.db().version().await);
            let stores: Vec<String> = storage
                .db()
                .store_names()
                .await
                .iter()
                .map(|store| store.to_string())
                .collect();
            println!("  Stores: {}", stores.join(", "));
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  Audit enabled:   {}", settings.audit_enabled);
            println!("  Seed demo data:  {}", settings.seed_demo_data);
        }
        Some(Commands::Account(cmd)) => {
            handle_account_command(&storage, &settings, cmd).await?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd).await?;
        }
        Some(Commands::Goal(cmd)) => {
            handle_goal_command(&storage, &settings, cmd).await?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd).await?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&storage, cmd).await?;
        }
        Some(Commands::Restore { backup, force }) => {
            handle_restore_command(&storage, &backup, force).await?;
        }
        Some(Commands::Summary) => {
            handle_summary_command(&storage).await?;
        }
        Some(Commands::Audit { limit }) => {
            handle_audit_command(&storage, limit).await?;
        }
        Some(Commands::Spending { from, to, top }) => {
            handle_spending_command(&storage, from, to, top).await?;
        }
        None => {
            println!("FinanZen - personal finance tracker");
            println!();
            println!("Run 'finanzen --help' for usage information.");
            if !storage.is_initialized() {
                println!("Run 'finanzen init' to get started.");
            }
        }
    }

    Ok(())
}
