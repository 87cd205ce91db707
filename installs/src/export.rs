//! CSV export of a [`Report`].
//!
//! Each group contributes its records (highest invoice first) followed by a subtotal row.
//! Every field is quoted; embedded quotes are doubled.

use std::io;

use csv::{QuoteStyle, WriterBuilder};
use thiserror::Error;

use crate::{round_cents, InstallRecord, Report, ReportGroup};

const HEADER: [&str; 8] = [
    "Group",
    "Technician",
    "Invoice Amount",
    "Commission",
    "Customer",
    "Installer",
    "Sold Date",
    "Install Date",
];

const SUBTOTAL_LABEL: &str = "Subtotal";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV: {0}")]
    Io(#[from] io::Error),
    #[error("CSV output was not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// `installs_<date-or-range>_<groupMode>.csv`
pub fn export_file_name(report: &Report) -> String {
    format!("installs_{}_{}.csv", report.label, report.group_mode)
}

pub fn write_csv<W: io::Write>(report: &Report, writer: W) -> Result<(), ExportError> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    wtr.write_record(HEADER)?;
    for group in &report.groups {
        for record in &group.records {
            wtr.write_record(record_row(report, group, record))?;
        }
        wtr.write_record(subtotal_row(group))?;
    }
    wtr.flush()?;

    Ok(())
}

pub fn to_csv_string(report: &Report) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(report, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

fn record_row(report: &Report, group: &ReportGroup, record: &InstallRecord) -> [String; 8] {
    let commission = report
        .range_mode
        .then(|| round_cents(record.invoice_amount * report.group_mode.commission_rate()));

    [
        group.label.clone(),
        record.technician.clone(),
        money(record.invoice_amount),
        commission.map(money).unwrap_or_default(),
        record.customer.clone(),
        record.installer.clone(),
        record.sold_date.to_string(),
        record.install_date.to_string(),
    ]
}

fn subtotal_row(group: &ReportGroup) -> [String; 8] {
    [
        group.label.clone(),
        SUBTOTAL_LABEL.to_string(),
        money(group.subtotal),
        group.commission.map(money).unwrap_or_default(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
    ]
}

fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}
