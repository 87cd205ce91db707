mod api;
mod cli;
mod config;
mod probe;
mod render;
mod report;
mod state;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, TechniciansArgs};
use config::DashConfig;
use state::{TechnicianFilter, TechnicianView};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::from_filename(".env.local").ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "dash_cli=info,warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ConfigPath => {
            let path = DashConfig::config_path()?;
            if !path.exists() {
                DashConfig::default().save()?;
                println!("Created default config at: {}", path.display());
            } else {
                println!("{}", path.display());
            }
        }
        Commands::Probe => probe::run(probe::ProbeSettings::from_env()?).await?,
        Commands::Report(args) => report::run(args, &DashConfig::load()?).await?,
        Commands::Technicians(args) => list_technicians(args, &DashConfig::load()?).await?,
    }

    Ok(())
}

async fn list_technicians(args: TechniciansArgs, config: &DashConfig) -> Result<()> {
    let client = api::DashClient::new(&config.api_url)?;
    let mut view = TechnicianView::new(TechnicianFilter {
        search: args.search,
        active_only: !args.all,
    });

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let refreshed = view.refresh(&client, &cancel).await;
    ctrl_c.abort();

    if !refreshed {
        eprintln!("Cancelled");
        return Ok(());
    }

    let visible = view.visible();
    if view.is_empty() {
        println!("No technicians");
    } else if visible.is_empty() {
        println!("No technicians match the filter");
    } else {
        print!("{}", render::technicians(&visible));
        tracing::debug!(shown = visible.len(), total = view.len(), "listed technicians");
    }

    Ok(())
}
