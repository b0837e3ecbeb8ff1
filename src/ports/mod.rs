pub mod campaign_source;
pub mod routine;
pub mod worksheet;

pub use campaign_source::{CampaignSource, FetchError};
pub use routine::{Routine, RoutineError};
pub use worksheet::{AuthError, PublishError, Worksheet, WorksheetConnector};
