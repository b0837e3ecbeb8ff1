pub mod campaign;
pub mod sheets;

// Re-export commonly used types
pub use campaign::{CampaignColumn, CampaignPage, CampaignRecord};
