use std::{fs::File, io::BufWriter, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use installs::{
    export_file_name, load_installs, write_csv, DateSelection, DemoGenerator, DemoSource, Report,
    ReportFilter, Roster,
};
use tokio_util::sync::CancellationToken;

use crate::{cli::ReportArgs, config::DashConfig, render};

/// Selected names, or the whole roster when none were given.
fn filter_from(args: &ReportArgs, roster: &Roster) -> ReportFilter {
    let technicians = if args.technicians.is_empty() {
        &roster.technicians
    } else {
        &args.technicians
    };
    let installers = if args.installers.is_empty() {
        &roster.installers
    } else {
        &args.installers
    };
    ReportFilter::new(technicians.iter(), installers.iter())
}

pub async fn run(args: ReportArgs, config: &DashConfig) -> Result<()> {
    let selection = DateSelection::parse(
        args.date.as_deref(),
        args.from.as_deref(),
        args.to.as_deref(),
    )?;

    let source = DemoSource::new(
        DemoGenerator::new(config.roster.clone()),
        Duration::from_millis(config.demo_latency_ms),
    );

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let loaded = load_installs(&source, &selection, &cancel).await;
    ctrl_c.abort();

    let Some(records) = loaded.context("Failed to load installs")? else {
        eprintln!("Cancelled");
        return Ok(());
    };
    tracing::info!(days = selection.days().len(), records = records.len(), "loaded installs");

    let report = Report::build(
        &records,
        selection,
        args.group,
        &filter_from(&args, &config.roster),
    );

    if args.summary {
        print!("{}", render::summary(&report, &report.summary()));
    } else {
        print!("{}", render::detail(&report));
    }

    if let Some(dir) = args.export {
        let path = export(&report, dir)?;
        eprintln!("Wrote {}", path.display());
    }

    Ok(())
}

fn export(report: &Report, dir: PathBuf) -> Result<PathBuf> {
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(export_file_name(report));
    let file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(report, BufWriter::new(file))?;
    Ok(path)
}
