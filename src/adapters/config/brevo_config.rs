use std::time::Duration;

use crate::adapters::brevo::api_client::DEFAULT_BASE_URL;
use crate::application::fetch::campaign_fetcher::{DEFAULT_PAGE_SIZE, DEFAULT_PAGE_WAIT};

#[derive(serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BrevoConfig {
    pub base_url: Box<str>,
    pub page_size: u32,
    pub page_wait_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for BrevoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            page_size: DEFAULT_PAGE_SIZE,
            page_wait_secs: DEFAULT_PAGE_WAIT.as_secs(),
            request_timeout_secs: 30,
        }
    }
}

impl BrevoConfig {
    pub fn page_wait(&self) -> Duration {
        Duration::from_secs(self.page_wait_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
