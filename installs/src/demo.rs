use chrono::{Datelike, Duration, NaiveDate};
use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};

use crate::{InstallRecord, Roster};

const CUSTOMERS: &[&str] = &[
    "Harper Residence",
    "Jordan Lee",
    "Miller & Sons",
    "O'Connor Family",
    "Riverside Dental",
    "Sanchez Home",
    "Thompson Bakery",
    "Whitfield Apartments",
    "Young Household",
    "Zimmerman Farm",
];

const MIN_RECORDS_PER_DAY: usize = 3;
const MAX_RECORDS_PER_DAY: usize = 8;
const MIN_INVOICE_CENTS: u64 = 150_000;
const MAX_INVOICE_CENTS: u64 = 1_500_000;
const MAX_SOLD_OFFSET_DAYS: i64 = 21;

/// Generates sample installs keyed by date. The same date always yields the same records.
#[derive(Debug, Clone)]
pub struct DemoGenerator {
    roster: Roster,
}

impl DemoGenerator {
    pub fn new(roster: Roster) -> Self {
        Self { roster }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn generate(&self, install_date: NaiveDate) -> Vec<InstallRecord> {
        let mut rng = StdRng::seed_from_u64(install_date.num_days_from_ce() as u64);
        let count = rng.random_range(MIN_RECORDS_PER_DAY..=MAX_RECORDS_PER_DAY);

        (0..count)
            .filter_map(|_| {
                let technician = self.roster.technicians.choose(&mut rng)?;
                let installer = self.roster.installers.choose(&mut rng)?;
                let customer = CUSTOMERS.choose(&mut rng)?;
                let cents = rng.random_range(MIN_INVOICE_CENTS..=MAX_INVOICE_CENTS);
                let offset = rng.random_range(1..=MAX_SOLD_OFFSET_DAYS);

                Some(InstallRecord {
                    install_date,
                    sold_date: sold_date(install_date, offset)?,
                    invoice_amount: cents as f64 / 100.0,
                    customer: customer.to_string(),
                    installer: installer.clone(),
                    technician: technician.clone(),
                })
            })
            .collect()
    }
}

/// The day a job was sold, `offset_days` before it was installed. `None` when that falls
/// before the earliest representable date.
pub fn sold_date(install_date: NaiveDate, offset_days: i64) -> Option<NaiveDate> {
    install_date.checked_sub_signed(Duration::days(offset_days))
}
