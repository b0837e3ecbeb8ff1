use thiserror::Error;

use crate::domain::campaign::CampaignPage;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to the campaign listing failed")]
    Transport,
    #[error("Campaign listing answered with HTTP status {0}")]
    HttpStatus(u16),
    #[error("Failed to parse the campaign listing response")]
    Parse,
}

#[async_trait::async_trait]
pub trait CampaignSource: Send + Sync {
    /// Requests one page of campaigns, aggregate statistics included.
    async fn fetch_page(
        &self,
        limit: u32,
        offset: u32,
    ) -> error_stack::Result<CampaignPage, FetchError>;
}
