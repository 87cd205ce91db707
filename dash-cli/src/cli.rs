use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use installs::GroupMode;

#[derive(Debug, Parser)]
#[command(name = "dash-cli")]
#[command(about = "Install and technician dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List technicians through the dashboard API
    Technicians(TechniciansArgs),
    /// Group installs by technician or installer
    Report(ReportArgs),
    /// Call the technicians endpoint directly with a bearer token from the environment
    Probe,
    /// Print config path and create default file if missing
    ConfigPath,
}

#[derive(Debug, Args)]
pub struct TechniciansArgs {
    /// Only show technicians whose name contains this text
    #[arg(long)]
    pub search: Option<String>,
    /// Include inactive technicians
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Single day, YYYY-MM-DD
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub date: Option<String>,
    /// First day of an inclusive range
    #[arg(long, requires = "to")]
    pub from: Option<String>,
    /// Last day of an inclusive range
    #[arg(long, requires = "from")]
    pub to: Option<String>,
    #[arg(long, default_value_t = GroupMode::Technician)]
    pub group: GroupMode,
    /// Technician to include (repeatable, defaults to the whole roster)
    #[arg(long = "technician")]
    pub technicians: Vec<String>,
    /// Installer to include (repeatable, defaults to the whole roster)
    #[arg(long = "installer")]
    pub installers: Vec<String>,
    /// Print totals per group, largest first, instead of every install
    #[arg(long)]
    pub summary: bool,
    /// Write the report as CSV into this directory
    #[arg(long)]
    pub export: Option<PathBuf>,
}
