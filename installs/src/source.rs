use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{DateSelection, DemoGenerator, InstallRecord};

#[derive(Debug, Error)]
pub enum InstallSourceError {
    #[error("install source unavailable: {0}")]
    Unavailable(String),
}

/// Where install records come from, one calendar day at a time.
#[async_trait]
pub trait InstallSource: Send + Sync {
    async fn installs_on(&self, date: NaiveDate) -> Result<Vec<InstallRecord>, InstallSourceError>;
}

/// Serves generated records after a simulated network delay.
pub struct DemoSource {
    generator: DemoGenerator,
    latency: Duration,
}

impl DemoSource {
    pub fn new(generator: DemoGenerator, latency: Duration) -> Self {
        Self { generator, latency }
    }
}

#[async_trait]
impl InstallSource for DemoSource {
    async fn installs_on(&self, date: NaiveDate) -> Result<Vec<InstallRecord>, InstallSourceError> {
        let roster = self.generator.roster();
        if roster.technicians.is_empty() || roster.installers.is_empty() {
            return Err(InstallSourceError::Unavailable(
                "demo roster has no technicians or no installers".to_string(),
            ));
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.generator.generate(date))
    }
}

/// Load every record in `selection`, one day after another.
///
/// Days are fetched strictly in order and each fetch is awaited before the next starts.
/// `cancel` is checked before every day and once more before returning; a cancelled load
/// returns `Ok(None)` so callers never apply a stale result. A fetch already in flight is
/// allowed to finish.
pub async fn load_installs(
    source: &dyn InstallSource,
    selection: &DateSelection,
    cancel: &CancellationToken,
) -> Result<Option<Vec<InstallRecord>>, InstallSourceError> {
    let mut records = Vec::new();

    for day in selection.days() {
        if cancel.is_cancelled() {
            tracing::debug!(%day, "install load cancelled");
            return Ok(None);
        }
        let mut installs = source.installs_on(day).await?;
        tracing::debug!(%day, count = installs.len(), "loaded installs");
        records.append(&mut installs);
    }

    if cancel.is_cancelled() {
        return Ok(None);
    }
    Ok(Some(records))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::Roster;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Records which days were requested and cancels after a given number of calls.
    struct RecordingSource {
        seen: Mutex<Vec<NaiveDate>>,
        cancel_after: Option<(usize, CancellationToken)>,
    }

    impl RecordingSource {
        fn new(cancel_after: Option<(usize, CancellationToken)>) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                cancel_after,
            }
        }
    }

    #[async_trait]
    impl InstallSource for RecordingSource {
        async fn installs_on(
            &self,
            date: NaiveDate,
        ) -> Result<Vec<InstallRecord>, InstallSourceError> {
            let calls = {
                let mut seen = self.seen.lock().unwrap();
                seen.push(date);
                seen.len()
            };
            if let Some((limit, token)) = &self.cancel_after {
                if calls >= *limit {
                    token.cancel();
                }
            }
            Ok(vec![InstallRecord {
                install_date: date,
                sold_date: date,
                invoice_amount: 100.0,
                customer: "Jordan Lee".to_string(),
                installer: "Apex Installs".to_string(),
                technician: "Ava Brooks".to_string(),
            }])
        }
    }

    #[tokio::test]
    async fn range_is_loaded_day_by_day_in_order() {
        let source = RecordingSource::new(None);
        let selection = DateSelection::range(date(2024, 1, 1), date(2024, 1, 3)).unwrap();

        let records = load_installs(&source, &selection, &CancellationToken::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(
            *source.seen.lock().unwrap(),
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
        );
    }

    #[tokio::test]
    async fn cancellation_stops_at_next_day_and_discards_results() {
        let token = CancellationToken::new();
        let source = RecordingSource::new(Some((2, token.clone())));
        let selection = DateSelection::range(date(2024, 1, 1), date(2024, 1, 5)).unwrap();

        let result = load_installs(&source, &selection, &token).await.unwrap();

        assert!(result.is_none());
        assert_eq!(source.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn already_cancelled_token_fetches_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let source = RecordingSource::new(None);

        let result = load_installs(&source, &DateSelection::Day(date(2024, 1, 1)), &token)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(source.seen.lock().unwrap().is_empty());
    }

    struct OfflineSource;

    #[async_trait]
    impl InstallSource for OfflineSource {
        async fn installs_on(
            &self,
            _date: NaiveDate,
        ) -> Result<Vec<InstallRecord>, InstallSourceError> {
            Err(InstallSourceError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn source_failure_aborts_the_load() {
        let selection = DateSelection::range(date(2024, 1, 1), date(2024, 1, 3)).unwrap();

        let err = load_installs(&OfflineSource, &selection, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "install source unavailable: connection refused"
        );
    }

    #[tokio::test]
    async fn demo_source_without_installers_is_unavailable() {
        let roster = Roster::new(["Ava Brooks"], Vec::<String>::new());
        let source = DemoSource::new(DemoGenerator::new(roster), Duration::ZERO);

        let err = source.installs_on(date(2024, 1, 10)).await.unwrap_err();

        assert!(matches!(err, InstallSourceError::Unavailable(_)));
    }

    #[tokio::test]
    async fn demo_source_serves_generated_records() {
        let generator = DemoGenerator::new(Roster::demo());
        let expected = generator.generate(date(2024, 1, 10));
        let source = DemoSource::new(generator, Duration::ZERO);

        let records = source.installs_on(date(2024, 1, 10)).await.unwrap();

        assert_eq!(records, expected);
    }
}
