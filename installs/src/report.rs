use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{round_cents, DateSelection, InstallRecord, Roster};

/// The axis records are aggregated along.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GroupMode {
    #[default]
    Technician,
    Installer,
}

impl GroupMode {
    /// Commission rate applied to a group's subtotal.
    ///
    /// Tied to the grouping axis rather than to who actually earns the commission.
    pub fn commission_rate(self) -> f64 {
        match self {
            GroupMode::Technician => 0.05,
            GroupMode::Installer => 0.075,
        }
    }

    pub fn key(self, record: &InstallRecord) -> &str {
        match self {
            GroupMode::Technician => &record.technician,
            GroupMode::Installer => &record.installer,
        }
    }
}

/// Which technicians and installers a report includes. A record is kept only when both its
/// technician and its installer are selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    technicians: BTreeSet<String>,
    installers: BTreeSet<String>,
}

impl ReportFilter {
    pub fn new(
        technicians: impl IntoIterator<Item = impl Into<String>>,
        installers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            technicians: technicians.into_iter().map(Into::into).collect(),
            installers: installers.into_iter().map(Into::into).collect(),
        }
    }

    /// Everyone on the roster selected.
    pub fn all(roster: &Roster) -> Self {
        Self::new(roster.technicians.iter(), roster.installers.iter())
    }

    pub fn matches(&self, record: &InstallRecord) -> bool {
        self.technicians.contains(&record.technician) && self.installers.contains(&record.installer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportGroup {
    pub label: String,
    /// Highest invoice first.
    pub records: Vec<InstallRecord>,
    pub subtotal: f64,
    /// Only computed in range mode.
    pub commission: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub label: String,
    pub installs: usize,
    pub total: f64,
    pub commission: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(skip)]
    pub selection: DateSelection,
    pub label: String,
    pub group_mode: GroupMode,
    pub range_mode: bool,
    /// Sorted alphabetically by label.
    pub groups: Vec<ReportGroup>,
    pub grand_total: f64,
    pub grand_commission: Option<f64>,
}

impl Report {
    pub fn build(
        records: &[InstallRecord],
        selection: DateSelection,
        group_mode: GroupMode,
        filter: &ReportFilter,
    ) -> Self {
        let range_mode = selection.is_range();

        let groups: Vec<ReportGroup> = records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .into_group_map_by(|record| group_mode.key(record).to_string())
            .into_iter()
            .map(|(label, mut records)| {
                records.sort_by(|a, b| b.invoice_amount.total_cmp(&a.invoice_amount));
                let subtotal = round_cents(records.iter().map(|r| r.invoice_amount).sum());
                let commission =
                    range_mode.then(|| round_cents(subtotal * group_mode.commission_rate()));

                ReportGroup {
                    label,
                    records,
                    subtotal,
                    commission,
                }
            })
            .sorted_by(|a, b| a.label.cmp(&b.label))
            .collect();

        let grand_total = round_cents(groups.iter().map(|g| g.subtotal).sum());
        let grand_commission = range_mode
            .then(|| round_cents(groups.iter().filter_map(|g| g.commission).sum()));

        Self {
            selection,
            label: selection.label(),
            group_mode,
            range_mode,
            groups,
            grand_total,
            grand_commission,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// One row per group, largest total first.
    pub fn summary(&self) -> Vec<SummaryRow> {
        self.groups
            .iter()
            .map(|group| SummaryRow {
                label: group.label.clone(),
                installs: group.records.len(),
                total: group.subtotal,
                commission: group.commission,
            })
            .sorted_by(|a, b| {
                b.total
                    .total_cmp(&a.total)
                    .then_with(|| a.label.cmp(&b.label))
            })
            .collect()
    }
}
