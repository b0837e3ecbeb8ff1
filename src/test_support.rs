//! In-memory stand-ins for the campaign listing and the spreadsheet.

use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};

use error_stack::report;
use serde_json::{json, Value};
use tokio::time::Instant;

use crate::domain::campaign::CampaignPage;
use crate::ports::campaign_source::{CampaignSource, FetchError};
use crate::ports::worksheet::{AuthError, PublishError, Worksheet, WorksheetConnector};

pub(crate) enum FakePage {
    Campaigns(Vec<Value>),
    HttpStatus(u16),
    Malformed,
}

impl FakePage {
    pub(crate) fn campaigns(ids: RangeInclusive<u32>) -> Self {
        FakePage::Campaigns(
            ids.map(|id| {
                json!({
                    "id": id,
                    "name": format!("Campaign {id}"),
                    "sentDate": "2024-03-05T10:00:00Z",
                    "recipients": { "lists": [id] },
                    "statistics": { "globalStats": { "sent": id * 10, "delivered": id * 9 } }
                })
            })
            .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PageRequest {
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) at: Instant,
}

/// Serves `pages` in order, one per request, then empty pages.
pub(crate) struct FakeCampaignSource {
    pages: Vec<FakePage>,
    requests: Mutex<Vec<PageRequest>>,
}

impl FakeCampaignSource {
    pub(crate) fn new(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_full_pages(page_count: u32, page_size: u32) -> Self {
        Self::new(
            (0..page_count)
                .map(|page| FakePage::campaigns(page * page_size + 1..=(page + 1) * page_size))
                .collect(),
        )
    }

    pub(crate) fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CampaignSource for FakeCampaignSource {
    async fn fetch_page(
        &self,
        limit: u32,
        offset: u32,
    ) -> error_stack::Result<CampaignPage, FetchError> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(PageRequest {
                limit,
                offset,
                at: Instant::now(),
            });
            requests.len() - 1
        };

        match self.pages.get(index) {
            Some(FakePage::Campaigns(campaigns)) => Ok(CampaignPage::new(campaigns.clone())),
            Some(FakePage::HttpStatus(code)) => Err(report!(FetchError::HttpStatus(*code))),
            Some(FakePage::Malformed) => Err(report!(FetchError::Parse)),
            None => Ok(CampaignPage::default()),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SheetState {
    pub(crate) cells: Vec<Vec<String>>,
    pub(crate) opens: usize,
    pub(crate) clears: usize,
    pub(crate) writes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FakeFailure {
    Auth,
    Write,
}

/// A spreadsheet with a single worksheet kept in memory.
#[derive(Clone, Default)]
pub(crate) struct FakeConnector {
    pub(crate) state: Arc<Mutex<SheetState>>,
    failure: Option<FakeFailure>,
}

impl FakeConnector {
    pub(crate) fn with_cells(cells: Vec<Vec<&str>>) -> Self {
        let connector = Self::default();
        connector.state.lock().unwrap().cells = cells
            .into_iter()
            .map(|row| row.into_iter().map(str::to_owned).collect())
            .collect();
        connector
    }

    pub(crate) fn failing(failure: FakeFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    pub(crate) fn cells(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().cells.clone()
    }

    pub(crate) fn opens(&self) -> usize {
        self.state.lock().unwrap().opens
    }

    pub(crate) fn clears(&self) -> usize {
        self.state.lock().unwrap().clears
    }

    pub(crate) fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }
}

struct FakeWorksheet {
    title: String,
    state: Arc<Mutex<SheetState>>,
    failure: Option<FakeFailure>,
}

#[async_trait::async_trait]
impl Worksheet for FakeWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    async fn clear(&self) -> error_stack::Result<(), PublishError> {
        let mut state = self.state.lock().unwrap();
        state.clears += 1;
        state.cells.clear();
        Ok(())
    }

    async fn write_rows(&self, rows: Vec<Vec<String>>) -> error_stack::Result<(), PublishError> {
        if self.failure == Some(FakeFailure::Write) {
            return Err(report!(PublishError::Write(self.title.clone())));
        }

        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        for (r, row) in rows.into_iter().enumerate() {
            if state.cells.len() <= r {
                state.cells.resize(r + 1, Vec::new());
            }
            for (c, value) in row.into_iter().enumerate() {
                let target = &mut state.cells[r];
                if target.len() <= c {
                    target.resize(c + 1, String::new());
                }
                target[c] = value;
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl WorksheetConnector for FakeConnector {
    async fn open_worksheet(
        &self,
        title: &str,
    ) -> error_stack::Result<Box<dyn Worksheet>, PublishError> {
        self.state.lock().unwrap().opens += 1;

        if self.failure == Some(FakeFailure::Auth) {
            return Err(report!(AuthError::TokenRejected).change_context(PublishError::Authentication));
        }

        Ok(Box::new(FakeWorksheet {
            title: title.to_owned(),
            state: Arc::clone(&self.state),
            failure: self.failure,
        }))
    }
}
