use std::fmt::Debug;

use error_stack::{report, ResultExt};
use google_sheets4::api::ValueRange;
use google_sheets4::Sheets;
use tracing::{info, instrument, warn};

use crate::adapters::config::sheets_config::SpreadsheetConfig;
use crate::domain::sheets::a1_notation::A1Notation;
use crate::ports::worksheet::{AuthError, PublishError, Worksheet, WorksheetConnector};

use super::auth;
use super::http_client;
use super::spreadsheet_manager::SpreadsheetManager;
use super::value_range_factory::ValueRangeFactory;

/// Opens worksheets of the configured spreadsheet as a service account.
pub struct GoogleSheetsConnector {
    config: SpreadsheetConfig,
    credentials_json: String,
}

impl Debug for GoogleSheetsConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GoogleSheetsConnector {{ config: {:?} }}", self.config)
    }
}

impl GoogleSheetsConnector {
    pub fn new(config: SpreadsheetConfig, credentials_json: impl Into<String>) -> Self {
        Self {
            config,
            credentials_json: credentials_json.into(),
        }
    }

    async fn connect(&self) -> error_stack::Result<SpreadsheetManager, PublishError> {
        let spreadsheet_id = self
            .config
            .spreadsheet_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                report!(PublishError::MissingSpreadsheetId)
                    .attach_printable("Set sheets.spreadsheet_id to the key of the target spreadsheet")
            })?;

        if self.credentials_json.trim().is_empty() {
            return Err(report!(AuthError::MissingCredentials)
                .change_context(PublishError::Authentication));
        }
        let secret = auth::service_account_key(&self.credentials_json)
            .change_context(PublishError::Authentication)?;

        info!("Authenticating with Google Sheets as {}", secret.client_email);
        let client = http_client::http_client().change_context(PublishError::Authentication)?;
        let authenticator = auth::auth(secret, client.clone())
            .await
            .change_context(PublishError::Authentication)?;

        Ok(SpreadsheetManager::new(
            spreadsheet_id,
            Sheets::new(client, authenticator),
        ))
    }
}

/// Worksheet titles are matched exactly, as the Sheets API does.
fn needs_creation(titles: &[String], title: &str) -> bool {
    !titles.iter().any(|existing| existing == title)
}

#[async_trait::async_trait]
impl WorksheetConnector for GoogleSheetsConnector {
    #[instrument(skip(self), name = "GoogleSheetsConnector::open_worksheet")]
    async fn open_worksheet(
        &self,
        title: &str,
    ) -> error_stack::Result<Box<dyn Worksheet>, PublishError> {
        let manager = self.connect().await?;

        info!("Opening spreadsheet with key: {}", manager.spreadsheet_id());
        let titles = manager.sheet_titles().await?;

        info!("Accessing worksheet: {}", title);
        if needs_creation(&titles, title) {
            warn!("Worksheet '{}' not found. Creating it.", title);
            manager.add_sheet(title).await?;
            info!("Worksheet '{}' created.", title);
        }

        Ok(Box::new(GoogleWorksheet {
            manager,
            title: title.to_string(),
        }))
    }
}

#[derive(Debug)]
struct GoogleWorksheet {
    manager: SpreadsheetManager,
    title: String,
}

#[async_trait::async_trait]
impl Worksheet for GoogleWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    async fn clear(&self) -> error_stack::Result<(), PublishError> {
        self.manager
            .clear_range(&A1Notation::whole_sheet(&self.title))
            .await
    }

    async fn write_rows(&self, rows: Vec<Vec<String>>) -> error_stack::Result<(), PublishError> {
        self.manager
            .write_range(&A1Notation::origin(&self.title), ValueRange::from_rows(rows))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(spreadsheet_id: Option<&str>) -> SpreadsheetConfig {
        SpreadsheetConfig {
            spreadsheet_id: spreadsheet_id.map(Into::into),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_spreadsheet_id() {
        for id in [None, Some(""), Some("   ")] {
            let connector = GoogleSheetsConnector::new(config(id), "{}");

            let report = connector.open_worksheet("Campaigns").await.err().unwrap();

            assert!(matches!(
                report.current_context(),
                PublishError::MissingSpreadsheetId
            ));
        }
    }

    #[tokio::test]
    async fn test_malformed_credentials_are_an_auth_failure() {
        let connector = GoogleSheetsConnector::new(config(Some("1AbC")), "not a key");

        let report = connector.open_worksheet("Campaigns").await.err().unwrap();

        assert!(matches!(report.current_context(), PublishError::Authentication));
        assert!(report.contains::<AuthError>());
    }

    #[tokio::test]
    async fn test_blank_credentials_are_missing() {
        let connector = GoogleSheetsConnector::new(config(Some("1AbC")), "  ");

        let report = connector.open_worksheet("Campaigns").await.err().unwrap();

        assert!(matches!(
            report.downcast_ref::<AuthError>(),
            Some(AuthError::MissingCredentials)
        ));
    }

    #[test]
    fn test_absent_worksheet_is_created() {
        let titles = vec!["Sheet1".to_string(), "Archive".to_string()];
        assert!(needs_creation(&titles, "Campaigns"));
        assert!(needs_creation(&[], "Campaigns"));
        assert!(needs_creation(&titles, "archive"));
    }

    #[test]
    fn test_existing_worksheet_is_reused() {
        let titles = vec!["Sheet1".to_string(), "Campaigns".to_string()];
        assert!(!needs_creation(&titles, "Campaigns"));
    }

    #[test]
    fn test_debug_hides_credentials() {
        let connector = GoogleSheetsConnector::new(config(Some("1AbC")), "private-key-material");
        assert!(!format!("{connector:?}").contains("private-key-material"));
    }
}
