use std::fmt::Debug;
use std::time::Duration;

use error_stack::{report, ResultExt};
use reqwest::{header, Client, RequestBuilder};
use tracing::{event, instrument, Level};

use crate::domain::campaign::CampaignPage;
use crate::ports::campaign_source::{CampaignSource, FetchError};

pub const DEFAULT_BASE_URL: &str = "https://api.brevo.com/v3/emailCampaigns";

/// Brevo's email campaign listing, with the global statistics of each campaign.
pub struct BrevoApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl Debug for BrevoApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrevoApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl BrevoApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> error_stack::Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .change_context(FetchError::Transport)
            .attach_printable("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn page_request(&self, limit: u32, offset: u32) -> RequestBuilder {
        self.client
            .get(&self.base_url)
            .query(&[
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
                ("statistics", "globalStats".to_string()),
            ])
            .header("api-key", &self.api_key)
            .header(header::ACCEPT, "application/json")
    }
}

#[async_trait::async_trait]
impl CampaignSource for BrevoApiClient {
    #[instrument(skip(self))]
    async fn fetch_page(
        &self,
        limit: u32,
        offset: u32,
    ) -> error_stack::Result<CampaignPage, FetchError> {
        event!(
            Level::INFO,
            "Making request to: {}?limit={}&offset={}&statistics=globalStats",
            self.base_url,
            limit,
            offset
        );

        let response = self
            .page_request(limit, offset)
            .send()
            .await
            .change_context(FetchError::Transport)
            .attach_printable_lazy(|| format!("GET {} (offset {})", self.base_url, offset))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .change_context(FetchError::Transport)?;

        if !status.is_success() {
            return Err(report!(FetchError::HttpStatus(status.as_u16()))
                .attach_printable(format!("Server response: {text}")));
        }

        tracing::debug!(response = text, "Response OK 200");

        parse_page(&text)
    }
}

fn parse_page(text: &str) -> error_stack::Result<CampaignPage, FetchError> {
    serde_json::from_str(text)
        .change_context(FetchError::Parse)
        .attach_printable_lazy(|| format!("Response text (not valid JSON): {text}"))
}
