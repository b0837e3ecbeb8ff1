pub mod app_config;
pub mod brevo_config;
pub mod logging_config;
pub mod secrets;
pub mod sheets_config;
