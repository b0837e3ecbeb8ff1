pub mod campaign_fetcher;
