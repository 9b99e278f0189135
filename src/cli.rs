//! CLI module for the movers ETL
//!
//! Runs the daily load by default, plus the one-time schema step and a
//! read-back of stored rows.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::{
    configuration::{get_configuration, set_configuration, Config},
    error::Error,
    handler::stock_movers,
    model::Category,
    provider::DatabasePool,
};

/// Stock movers ETL
#[derive(Parser)]
#[command(name = "movers-etl")]
#[command(about = "Daily stock movers ETL", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Fetch, transform and load today's movers (default if no command specified)
    Run {
        /// Fetch and transform only, never connect to the database
        #[arg(long)]
        dry_run: bool,
    },

    /// Create the movers tables and their (name, date_added) primary keys
    Migrate,

    /// Print the rows stored for one category
    Show {
        /// gainers, decliners or most-active
        #[arg(long)]
        category: Category,

        /// Capture date as YYYY-MM-DD, today if omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run { dry_run: false }
    }
}

/// Initialize configuration and return Config
pub fn init_config() -> Result<Config, Error> {
    set_configuration()?;
    get_configuration()
}

pub async fn run_etl(dry_run: bool) -> Result<(), Error> {
    let config = init_config()?;

    tracing::info!("Starting stock movers ETL...");
    if dry_run {
        tracing::info!("DRY RUN MODE - no changes will be made");
    }

    if let Some(summary) =
        stock_movers::fetch_transform_load(&config, dry_run).await?
    {
        for (category, rows) in &summary.inserted {
            tracing::info!("  {}: {} rows", category, rows);
        }
    }

    tracing::info!("ETL complete");

    Ok(())
}

pub async fn run_migrate() -> Result<(), Error> {
    let config = init_config()?;
    let database = DatabasePool::new(&config).await?;

    tracing::info!("Creating movers tables...");
    let result = database.init_schema().await;
    database.close().await;
    result?;
    tracing::info!("Schema is up to date");

    Ok(())
}

pub async fn run_show(
    category: Category,
    date: Option<NaiveDate>,
) -> Result<(), Error> {
    let config = init_config()?;
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let database = DatabasePool::new(&config).await?;
    let table = database.table(category);

    let rows = table.get_by_date(date).await;
    database.close().await;
    let rows = rows?;

    tracing::info!("{} rows in {} for {}", rows.len(), table.name, date);
    for row in rows {
        tracing::info!(
            "  {} | last {} | change {} | {} | volume {}",
            row.name,
            row.last_price.as_deref().unwrap_or("-"),
            row.price_change.as_deref().unwrap_or("-"),
            row.percent_change.as_deref().unwrap_or("-"),
            row.volume.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}
