use async_trait::async_trait;

use crate::envelope::ChatReply;
use crate::error::ServiceError;

/// Single-turn chat. Implementations keep no conversation memory.
#[async_trait]
pub trait ChatInterface: Send + Sync {
    async fn respond(&self, text: &str) -> Result<ChatReply, ServiceError>;
}
