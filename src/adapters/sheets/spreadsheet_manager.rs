use std::fmt::Debug;

use error_stack::{Report, ResultExt};
use google_sheets4::{
    api::{
        AddSheetRequest, BatchUpdateSpreadsheetRequest, ClearValuesRequest, GridProperties,
        Request, SheetProperties, ValueRange,
    },
    Error as SheetsError, Sheets,
};
use tracing::instrument;

use crate::domain::sheets::a1_notation::A1Notation;
use crate::ports::worksheet::{AuthError, PublishError};

use super::http_client::HttpsConnector;

/// Size of a freshly created worksheet. Writes grow it as needed.
pub const NEW_SHEET_ROWS: i32 = 1;
pub const NEW_SHEET_COLUMNS: i32 = 20;

pub struct SpreadsheetManager {
    spreadsheet_id: String,
    hub: Sheets<HttpsConnector>,
}

impl Debug for SpreadsheetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SpreadsheetManager {{ spreadsheet_id: {:?} }}",
            self.spreadsheet_id
        )
    }
}

/// Token failures from any hub call are reported as authentication failures.
fn hub_failure(err: SheetsError, context: PublishError) -> Report<PublishError> {
    if matches!(err, SheetsError::MissingToken(_)) {
        Report::new(err)
            .change_context(AuthError::TokenRejected)
            .change_context(PublishError::Authentication)
    } else {
        Report::new(err).change_context(context)
    }
}

fn add_sheet_request(title: &str) -> BatchUpdateSpreadsheetRequest {
    BatchUpdateSpreadsheetRequest {
        requests: Some(vec![Request {
            add_sheet: Some(AddSheetRequest {
                properties: Some(SheetProperties {
                    title: Some(title.to_string()),
                    grid_properties: Some(GridProperties {
                        row_count: Some(NEW_SHEET_ROWS),
                        column_count: Some(NEW_SHEET_COLUMNS),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

impl SpreadsheetManager {
    pub fn new(spreadsheet_id: impl Into<String>, hub: Sheets<HttpsConnector>) -> Self {
        SpreadsheetManager {
            spreadsheet_id: spreadsheet_id.into(),
            hub,
        }
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    #[instrument]
    pub async fn sheet_titles(&self) -> error_stack::Result<Vec<String>, PublishError> {
        let (_, spreadsheet) = self
            .hub
            .spreadsheets()
            .get(&self.spreadsheet_id)
            .doit()
            .await
            .map_err(|err| {
                hub_failure(err, PublishError::WorksheetLookup(self.spreadsheet_id.clone()))
            })
            .attach_printable_lazy(|| format!("Spreadsheet key: {}", self.spreadsheet_id))?;

        Ok(spreadsheet
            .sheets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|sheet| sheet.properties.and_then(|p| p.title))
            .collect())
    }

    #[instrument]
    pub async fn add_sheet(&self, title: &str) -> error_stack::Result<(), PublishError> {
        let request = add_sheet_request(title);

        self.hub
            .spreadsheets()
            .batch_update(request, &self.spreadsheet_id)
            .doit()
            .await
            .map(|_| ())
            .map_err(|err| hub_failure(err, PublishError::WorksheetCreate(title.to_string())))
    }

    #[instrument]
    pub async fn clear_range(&self, range_str: &A1Notation) -> error_stack::Result<(), PublishError> {
        self.hub
            .spreadsheets()
            .values_clear(ClearValuesRequest::default(), &self.spreadsheet_id, range_str.as_ref())
            .doit()
            .await
            .map(|_| ())
            .map_err(|err| hub_failure(err, PublishError::Clear(range_str.to_string())))
    }

    #[instrument(skip(value_range))]
    pub async fn write_range(
        &self,
        range_str: &A1Notation,
        value_range: ValueRange,
    ) -> error_stack::Result<(), PublishError> {
        self.hub
            .spreadsheets()
            .values_update(value_range, &self.spreadsheet_id, range_str.as_ref())
            .value_input_option("USER_ENTERED")
            .doit()
            .await
            .map(|_| ())
            .map_err(|err| hub_failure(err, PublishError::Write(range_str.to_string())))
            .attach_printable_lazy(|| format!("Failed to write to range {} ", range_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_failures_are_authentication_errors() {
        let report = hub_failure(
            SheetsError::MissingToken("invalid_grant".into()),
            PublishError::Write("'Campaigns'!A1".to_string()),
        );

        assert!(report.contains::<AuthError>());
        assert!(matches!(report.current_context(), PublishError::Authentication));
    }

    #[test]
    fn test_add_sheet_request_is_one_row_by_twenty_columns() {
        let request = add_sheet_request("Campaigns");

        let requests = request.requests.unwrap();
        assert_eq!(requests.len(), 1);
        let properties = requests[0]
            .add_sheet
            .as_ref()
            .and_then(|add_sheet| add_sheet.properties.as_ref())
            .unwrap();
        assert_eq!(properties.title.as_deref(), Some("Campaigns"));
        let grid = properties.grid_properties.as_ref().unwrap();
        assert_eq!(grid.row_count, Some(1));
        assert_eq!(grid.column_count, Some(20));
    }

    #[test]
    fn test_other_failures_keep_their_context() {
        let report = hub_failure(
            SheetsError::FieldClash("range"),
            PublishError::Clear("'Campaigns'".to_string()),
        );

        assert!(!report.contains::<AuthError>());
        assert!(matches!(report.current_context(), PublishError::Clear(range) if range == "'Campaigns'"));
    }
}
