pub mod brevo;
pub mod config;
pub mod sheets;
