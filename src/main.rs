mod cli;
mod db;
mod error;
mod models;

use clap::Parser;
use cli::{App, Cli};
use colored::*;
use error::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads DATABASE_URL
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries command output
    let (log_writer, _log_guard) = tracing_appender::non_blocking(std::io::stderr());
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(log_writer)
        .init();

    info!("Opening user store at {}", cli.database_url);

    let app = match App::new(&cli.database_url, cli.format).await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {:?}", e);
            eprintln!("{}", format!("Error: {}", e).red());
            return Err(e);
        },
    };

    let mut stdout = std::io::stdout();
    let result = app.run(cli.command, &mut stdout).await;
    app.shutdown().await;

    if let Err(e) = result {
        error!("Command execution failed: {:?}", e);
        eprintln!("{}", format!("Error: {}", e).red());
        return Err(e);
    }

    Ok(())
}
