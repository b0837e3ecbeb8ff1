use tracing::{info, instrument, warn};

use crate::domain::campaign::CampaignColumn;
use crate::domain::sheets::table::{SheetRecord, Table};
use crate::ports::worksheet::{PublishError, WorksheetConnector};

use super::demo_noise::DemoNoise;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Header plus `rows` data rows were written.
    Written { rows: usize, columns: usize },
    /// The worksheet was cleared but there was nothing to write.
    SkippedEmpty,
}

/// Overwrites one worksheet with the campaign table.
pub struct CampaignPublisher<C> {
    connector: C,
    worksheet_name: String,
    demo_noise: Option<DemoNoise>,
}

impl<C: WorksheetConnector> CampaignPublisher<C> {
    pub fn new(connector: C, worksheet_name: impl Into<String>) -> Self {
        Self {
            connector,
            worksheet_name: worksheet_name.into(),
            demo_noise: None,
        }
    }

    pub fn with_demo_noise(mut self, demo_noise: Option<DemoNoise>) -> Self {
        self.demo_noise = demo_noise;
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn worksheet_name(&self) -> &str {
        &self.worksheet_name
    }

    #[instrument(
        skip(self, records),
        name = "CampaignPublisher::publish",
        fields(worksheet = %self.worksheet_name, records = records.len())
    )]
    pub async fn publish<R: SheetRecord + Sync>(
        &self,
        records: &[R],
    ) -> error_stack::Result<PublishOutcome, PublishError> {
        info!(
            "Attempting to send {} rows to worksheet '{}'...",
            records.len(),
            self.worksheet_name
        );

        let worksheet = self.connector.open_worksheet(&self.worksheet_name).await?;

        info!("Clearing previous sheet content...");
        worksheet.clear().await?;
        info!("Previous content cleared.");

        if records.is_empty() {
            warn!("No data to send to the spreadsheet.");
            return Ok(PublishOutcome::SkippedEmpty);
        }

        let mut table = Table::from_records(records, &CampaignColumn::headers());
        for missing in table.missing_columns() {
            warn!(
                "Column '{}' was not found in the campaign data. It will be omitted.",
                missing
            );
        }

        if let Some(demo_noise) = self.demo_noise {
            info!(
                "Replacing statistics with demo values (variation {})",
                demo_noise.variation()
            );
            demo_noise.apply(&mut table, &mut rand::thread_rng());
        }

        let (rows, columns) = (table.row_count(), table.column_count());
        info!("Preparing to write {} rows with {} columns.", rows, columns);

        worksheet.write_rows(table.into_values()).await?;

        info!(
            "✅ Data successfully sent to '{}'. Rows written: {}",
            worksheet.title(),
            rows
        );

        Ok(PublishOutcome::Written { rows, columns })
    }
}
