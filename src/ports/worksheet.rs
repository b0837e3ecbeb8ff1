use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Google credentials were not provided")]
    MissingCredentials,
    #[error("Google credentials are not a valid service account key")]
    MalformedCredentials,
    #[error("Could not build the service account authenticator")]
    Authenticator,
    #[error("Google rejected the service account token request")]
    TokenRejected,
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("No spreadsheet id configured")]
    MissingSpreadsheetId,
    #[error("Failed to authenticate with Google Sheets")]
    Authentication,
    #[error("Failed to look up worksheet: {0}")]
    WorksheetLookup(String),
    #[error("Failed to create worksheet: {0}")]
    WorksheetCreate(String),
    #[error("Failed to clear worksheet: {0}")]
    Clear(String),
    #[error("Failed to write worksheet: {0}")]
    Write(String),
}

/// A single worksheet of the target spreadsheet.
#[async_trait::async_trait]
pub trait Worksheet: Send + Sync {
    fn title(&self) -> &str;

    /// Removes every value of the worksheet.
    async fn clear(&self) -> error_stack::Result<(), PublishError>;

    /// Writes `rows` in one call, anchored at the top-left cell. The destination interprets
    /// the strings as if typed by a user.
    async fn write_rows(&self, rows: Vec<Vec<String>>) -> error_stack::Result<(), PublishError>;
}

#[async_trait::async_trait]
pub trait WorksheetConnector: Send + Sync {
    /// Authenticates, resolves the spreadsheet and returns the worksheet titled `title`,
    /// creating it when it does not exist yet.
    async fn open_worksheet(
        &self,
        title: &str,
    ) -> error_stack::Result<Box<dyn Worksheet>, PublishError>;
}
