mod cli;
mod console;
mod settings;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dynamic_search::adapters::outbound::{TracingErrorSink, UrlState};
use dynamic_search::{validate, QueryPreview, SearchController};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::console::Console;
use crate::settings::{read_settings, Environment};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let environment = Environment::from_env()?;
    let settings = read_settings(&cli.config_dir, &environment)?;
    let options = settings.load_panel_options()?;

    info!(
        %environment,
        datasource = %settings.datasource.uid,
        query_kind = %options.query_kind,
        "Settings loaded"
    );

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Check => {
            let status = validate(&options);
            if status.configured {
                println!("Panel configured");
            } else {
                for field in status.missing {
                    println!("missing: {field}");
                }
            }
        }
        Commands::Preview => println!("{}", QueryPreview::from_options(&options)),
        Commands::Query { input } => {
            let controller = SearchController::new(
                Arc::new(settings.load_registry()?),
                Arc::new(TracingErrorSink),
                options,
            )
            .with_debounce(settings.debounce());

            for candidate in controller.resolve(&input).await {
                println!("{}", candidate.value);
            }
        }
        Commands::Run => {
            let controller = SearchController::new(
                Arc::new(settings.load_registry()?),
                Arc::new(TracingErrorSink),
                options,
            )
            .with_debounce(settings.debounce());

            Console::new(Arc::new(controller), Arc::new(UrlState::new()))
                .run()
                .await?;
        }
    }

    Ok(())
}
