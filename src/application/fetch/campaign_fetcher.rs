use std::time::Duration;

use error_stack::Report;
use tracing::{error, info, instrument, warn};

use crate::domain::campaign::CampaignRecord;
use crate::ports::campaign_source::{CampaignSource, FetchError};

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_PAGE_WAIT: Duration = Duration::from_secs(10);

/// Everything fetched in one run. A failure stops the run but keeps what came before it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub records: Vec<CampaignRecord>,
    pub pages_requested: u32,
    pub failure: Option<Report<FetchError>>,
}

impl FetchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

pub struct CampaignFetcher<S> {
    source: S,
    page_size: u32,
    page_wait: Duration,
}

impl<S: CampaignSource> CampaignFetcher<S> {
    pub fn new(source: S, page_size: u32, page_wait: Duration) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            page_wait,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Pages through the listing until an empty page or the first error.
    ///
    /// A full page is followed by a pause of `page_wait` before the next request.
    #[instrument(skip(self), name = "CampaignFetcher::fetch_all", fields(page_size = self.page_size))]
    pub async fn fetch_all(&self) -> FetchOutcome {
        let mut records = Vec::new();
        let mut offset = 0u32;
        let mut page_number = 1u32;

        info!("Starting retrieval of campaign data with globalStats...");

        let failure = loop {
            info!("--- Requesting page {} of campaigns ---", page_number);

            let page = match self.source.fetch_page(self.page_size, offset).await {
                Ok(page) => page,
                Err(report) => {
                    error!(
                        "❌ Stopping campaign retrieval at page {} (offset {}): {:?}",
                        page_number, offset, report
                    );
                    break Some(report);
                }
            };

            info!(
                "Campaigns on this page: {}. Current offset: {}.",
                page.len(),
                offset
            );

            if page.is_empty() {
                if offset == 0 {
                    warn!("No campaigns found on the first page.");
                } else {
                    info!("No more campaigns to retrieve.");
                }
                break None;
            }

            records.extend(page.campaigns().iter().map(CampaignRecord::from_campaign));

            if page.len() == self.page_size as usize {
                info!(
                    "Waiting {} seconds before the next page...",
                    self.page_wait.as_secs_f64()
                );
                tokio::time::sleep(self.page_wait).await;
            }

            offset = offset.saturating_add(self.page_size);
            page_number += 1;
        };

        info!(
            "Campaign retrieval finished. {} rows processed for the spreadsheet.",
            records.len()
        );

        FetchOutcome {
            records,
            pages_requested: page_number,
            failure,
        }
    }
}
