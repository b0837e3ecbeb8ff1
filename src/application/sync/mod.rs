pub mod campaign_sync_routine;
