pub mod campaign_publisher;
pub mod demo_noise;
