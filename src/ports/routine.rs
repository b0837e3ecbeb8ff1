use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoutineError {
    #[error("Fetch stopped early after {fetched} campaigns")]
    FetchIncomplete { fetched: usize },
    #[error("Publishing to the spreadsheet failed")]
    PublishFailed,
}

/// A scheduled unit of work. The outcome is logged by the caller as a single ✅/❌ line.
#[async_trait::async_trait]
pub trait Routine: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> error_stack::Result<(), RoutineError>;
}
