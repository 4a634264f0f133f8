pub mod http;

use async_trait::async_trait;

use crate::envelope::{AnalyzeReply, AnalyzeRequest};
use crate::error::ClientError;

pub use http::HttpTransport;

/// What came back from one `POST /analyze`.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeResponse {
    /// Non-2xx status. The body was not read.
    Status(u16),
    Reply(AnalyzeReply),
}

/// Sends the analysis request. One call, one request, no retries.
#[async_trait]
pub trait AnalyzeTransport: Send + Sync {
    async fn post_analyze(&self, payload: &AnalyzeRequest) -> Result<AnalyzeResponse, ClientError>;
}
