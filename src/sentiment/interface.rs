use async_trait::async_trait;

use crate::envelope::Sentiment;
use crate::error::ServiceError;

/// Sentiment analysis interface
#[async_trait]
pub trait SentimentInterface: Send + Sync {
    /// Classify `text` and score it on `0.0..=1.0`
    async fn analyze(&self, text: &str) -> Result<Sentiment, ServiceError>;
}
