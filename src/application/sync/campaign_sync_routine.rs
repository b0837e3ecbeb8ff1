use error_stack::Report;
use tracing::{error, info, instrument, warn};

use crate::application::fetch::campaign_fetcher::{CampaignFetcher, FetchOutcome};
use crate::application::publish::campaign_publisher::{CampaignPublisher, PublishOutcome};
use crate::ports::campaign_source::CampaignSource;
use crate::ports::routine::{Routine, RoutineError};
use crate::ports::worksheet::{AuthError, PublishError, WorksheetConnector};

/// Records logged for manual checking when nothing is published.
pub const SAMPLE_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoRecords,
    MissingCredentials,
}

#[derive(Debug)]
pub enum PublishStatus {
    Published(PublishOutcome),
    NotAttempted(SkipReason),
    Failed(Report<PublishError>),
}

#[derive(Debug)]
pub struct SyncReport {
    pub fetch: FetchOutcome,
    pub publish: PublishStatus,
    /// JSON lines of the sampled records, when the data was logged instead of published.
    pub sample: Vec<String>,
}

/// Fetches every campaign and, when a spreadsheet is configured, replaces the worksheet
/// with them.
pub struct CampaignSyncRoutine<S, C> {
    fetcher: CampaignFetcher<S>,
    publisher: Option<CampaignPublisher<C>>,
}

impl<S: CampaignSource, C: WorksheetConnector> CampaignSyncRoutine<S, C> {
    pub fn new(fetcher: CampaignFetcher<S>, publisher: Option<CampaignPublisher<C>>) -> Self {
        Self { fetcher, publisher }
    }

    pub fn fetcher(&self) -> &CampaignFetcher<S> {
        &self.fetcher
    }

    pub fn publisher(&self) -> Option<&CampaignPublisher<C>> {
        self.publisher.as_ref()
    }

    #[instrument(skip(self), name = "CampaignSyncRoutine::sync")]
    pub async fn sync(&self) -> SyncReport {
        let fetch = self.fetcher.fetch_all().await;

        if fetch.records.is_empty() {
            info!("No data retrieved or the data list is empty.");
            return SyncReport {
                fetch,
                publish: PublishStatus::NotAttempted(SkipReason::NoRecords),
                sample: Vec::new(),
            };
        }

        let Some(publisher) = &self.publisher else {
            warn!("Data will not be sent to the spreadsheet because credentials are not available.");
            info!("Data retrieved (not sent to the spreadsheet):");
            let sample = fetch
                .records
                .iter()
                .take(SAMPLE_SIZE)
                .filter_map(|record| serde_json::to_string(record).ok())
                .collect::<Vec<_>>();
            for (index, line) in sample.iter().enumerate() {
                info!("Sample row {}: {}", index + 1, line);
            }
            return SyncReport {
                fetch,
                publish: PublishStatus::NotAttempted(SkipReason::MissingCredentials),
                sample,
            };
        };

        let publish = match publisher.publish(&fetch.records).await {
            Ok(outcome) => PublishStatus::Published(outcome),
            Err(report) => {
                if report.contains::<AuthError>() {
                    error!("❌ Could not authenticate with Google Sheets: {:?}", report);
                } else {
                    error!("❌ Error sending data to Google Sheets: {:?}", report);
                }
                PublishStatus::Failed(report)
            }
        };

        SyncReport {
            fetch,
            publish,
            sample: Vec::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S: CampaignSource, C: WorksheetConnector> Routine for CampaignSyncRoutine<S, C> {
    fn name(&self) -> &str {
        "Campaign sync"
    }

    #[instrument(skip(self), name = "CampaignSyncRoutine::run")]
    async fn run(&self) -> error_stack::Result<(), RoutineError> {
        let report = self.sync().await;
        let fetched = report.fetch.records.len();

        if let Some(failure) = report.fetch.failure {
            return Err(failure.change_context(RoutineError::FetchIncomplete { fetched }));
        }

        match report.publish {
            PublishStatus::Failed(failure) => Err(failure.change_context(RoutineError::PublishFailed)),
            PublishStatus::Published(_) | PublishStatus::NotAttempted(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fetch::campaign_fetcher::DEFAULT_PAGE_WAIT;
    use crate::ports::campaign_source::FetchError;
    use crate::test_support::{FakeCampaignSource, FakeConnector, FakeFailure, FakePage};

    fn routine(
        pages: Vec<FakePage>,
        page_size: u32,
        connector: Option<FakeConnector>,
    ) -> CampaignSyncRoutine<FakeCampaignSource, FakeConnector> {
        CampaignSyncRoutine::new(
            CampaignFetcher::new(FakeCampaignSource::new(pages), page_size, DEFAULT_PAGE_WAIT),
            connector.map(|connector| CampaignPublisher::new(connector, "Campaigns")),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_credentials_logs_a_sample() {
        let routine = routine(vec![FakePage::campaigns(1..=5)], 50, None);

        let report = routine.sync().await;

        assert_eq!(report.fetch.records.len(), 5);
        assert!(matches!(
            report.publish,
            PublishStatus::NotAttempted(SkipReason::MissingCredentials)
        ));
        assert_eq!(report.sample.len(), SAMPLE_SIZE);
        assert!(report.sample[0].contains("\"CampaignID\":\"1\""));
        assert_eq!(routine.fetcher().source().requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_records_skips_publishing() {
        let connector = FakeConnector::with_cells(vec![vec!["old"]]);
        let routine = routine(vec![], 50, Some(connector.clone()));

        let report = routine.sync().await;

        assert!(matches!(
            report.publish,
            PublishStatus::NotAttempted(SkipReason::NoRecords)
        ));
        assert_eq!(connector.opens(), 0);
        assert_eq!(connector.cells(), vec![vec!["old"]]);
        assert!(routine.run().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_then_publish() {
        let connector = FakeConnector::default();
        let routine = routine(
            vec![FakePage::campaigns(1..=2), FakePage::campaigns(3..=4)],
            2,
            Some(connector.clone()),
        );

        let report = routine.sync().await;

        assert!(matches!(
            report.publish,
            PublishStatus::Published(PublishOutcome::Written { rows: 4, columns: 18 })
        ));
        assert!(report.sample.is_empty());
        let cells = connector.cells();
        assert_eq!(cells.len(), 5);
        assert_eq!(
            cells[1..].iter().map(|row| row[0].as_str()).collect::<Vec<_>>(),
            vec!["1", "2", "3", "4"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_fetch_is_still_published() {
        let connector = FakeConnector::default();
        let routine = routine(
            vec![FakePage::campaigns(1..=2), FakePage::HttpStatus(429)],
            2,
            Some(connector.clone()),
        );

        let report = routine.run().await.unwrap_err();

        assert!(matches!(
            report.current_context(),
            RoutineError::FetchIncomplete { fetched: 2 }
        ));
        assert!(report.contains::<FetchError>());
        assert_eq!(connector.cells().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_failure_fails_the_routine() {
        let connector = FakeConnector::failing(FakeFailure::Auth);
        let routine = routine(vec![FakePage::campaigns(1..=1)], 50, Some(connector));

        let report = routine.run().await.unwrap_err();

        assert!(matches!(report.current_context(), RoutineError::PublishFailed));
        assert!(report.contains::<AuthError>());
    }
}
