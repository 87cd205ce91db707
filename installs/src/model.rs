use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single completed installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallRecord {
    pub install_date: NaiveDate,
    pub sold_date: NaiveDate,
    pub invoice_amount: f64,
    pub customer: String,
    pub installer: String,
    /// The technician who sold the job.
    pub technician: String,
}

/// The configured technician and installer names.
///
/// Records naming someone outside the roster are not rejected, they simply never match the
/// default filters and drop out of filtered views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub technicians: Vec<String>,
    pub installers: Vec<String>,
}

impl Roster {
    pub fn new(
        technicians: impl IntoIterator<Item = impl Into<String>>,
        installers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            technicians: technicians.into_iter().map(Into::into).collect(),
            installers: installers.into_iter().map(Into::into).collect(),
        }
    }

    /// Sample roster used by the demo generator when nothing else is configured.
    pub fn demo() -> Self {
        Self::new(
            [
                "Ava Brooks",
                "Luis Ortega",
                "Maya Chen",
                "Noah Patel",
                "Grace Kim",
            ],
            ["Apex Installs", "Blue Ridge Crew", "Summit Team", "Valley Pros"],
        )
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::demo()
    }
}

/// Round a currency amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_cents_rounds_half_away_from_zero() {
        assert_eq!(round_cents(50.0), 50.0);
        assert_eq!(round_cents(12.345), 12.35);
        assert_eq!(round_cents(0.004), 0.0);
    }

    #[test]
    fn records_serialize_in_camel_case_with_iso_dates() {
        let record = InstallRecord {
            install_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            sold_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            invoice_amount: 1200.5,
            customer: "Jordan Lee".to_string(),
            installer: "Apex Installs".to_string(),
            technician: "Ava Brooks".to_string(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["installDate"], "2024-01-10");
        assert_eq!(value["soldDate"], "2024-01-05");
        assert_eq!(value["invoiceAmount"], 1200.5);
    }
}
