use clap::Parser;
use tracing::{error, Level};

use movers_etl::{
    cli::{run_etl, run_migrate, run_show, Cli, Commands},
    error::Error,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level({
            #[cfg(debug_assertions)]
            {
                Level::DEBUG
            }

            #[cfg(not(debug_assertions))]
            {
                Level::INFO
            }
        })
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command.unwrap_or_default() {
        Commands::Run { dry_run } => run_etl(dry_run).await,
        Commands::Migrate => run_migrate().await,
        Commands::Show { category, date } => run_show(category, date).await,
    }
}
