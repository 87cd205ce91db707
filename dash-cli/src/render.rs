use installs::{InstallRecord, Report, SummaryRow};
use servicetitan::Technician;

pub fn technicians(technicians: &[&Technician]) -> String {
    let mut out = String::new();
    for technician in technicians {
        let status = if technician.active { "" } else { " (inactive)" };
        out.push_str(&format!(
            "{:>8}  {}{}\n",
            technician.id, technician.name, status
        ));
    }
    out
}

/// Every group with its installs, alphabetical by group.
pub fn detail(report: &Report) -> String {
    let mut out = format!(
        "Installs {} by {}\n",
        report.label.replace('_', " "),
        report.group_mode
    );

    for group in &report.groups {
        out.push_str(&format!("\n{}\n", group.label));
        for record in &group.records {
            out.push_str(&record_line(record));
        }
        out.push_str(&format!(
            "  {:<20} {:>12.2}{}\n",
            "Subtotal",
            group.subtotal,
            commission_cell(group.commission)
        ));
    }

    out.push_str(&format!(
        "\n{:<22} {:>12.2}{}\n",
        "Total",
        report.grand_total,
        commission_cell(report.grand_commission)
    ));
    out
}

/// One line per group, largest total first.
pub fn summary(report: &Report, rows: &[SummaryRow]) -> String {
    let mut out = format!(
        "{:<22} {:>8} {:>12} {:>12}\n",
        report.group_mode.to_string(),
        "Installs",
        "Total",
        "Commission"
    );
    for row in rows {
        out.push_str(&format!(
            "{:<22} {:>8} {:>12.2}{}\n",
            row.label,
            row.installs,
            row.total,
            commission_cell(row.commission)
        ));
    }
    out
}

fn record_line(record: &InstallRecord) -> String {
    format!(
        "  {:<20} {:>12.2}  {:<22} {:<18} sold {} installed {}\n",
        record.technician,
        record.invoice_amount,
        record.customer,
        record.installer,
        record.sold_date,
        record.install_date
    )
}

fn commission_cell(commission: Option<f64>) -> String {
    commission
        .map(|c| format!(" {:>12.2}", c))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_technicians_are_marked() {
        let active = Technician::new(7, "Ava Brooks", true);
        let inactive = Technician::new(12, "Luis Ortega", false);

        let out = technicians(&[&active, &inactive]);

        assert_eq!(
            out,
            "       7  Ava Brooks\n      12  Luis Ortega (inactive)\n"
        );
    }

    #[test]
    fn commission_cell_is_blank_without_commission() {
        assert_eq!(commission_cell(None), "");
        assert_eq!(commission_cell(Some(50.0)), "        50.00");
    }
}
