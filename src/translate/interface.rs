/// Translate interface - implemented against a remote translation API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::envelope::Translation;
use crate::error::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_lang: Option<String>,
    pub target_lang: String,
}

#[async_trait]
pub trait TranslateInterface: Send + Sync {
    /// Translate `request.text` into `request.target_lang`.
    ///
    /// Language codes are normalized first. When `source_lang` is `None` the
    /// backend detects it.
    async fn translate(&self, request: TranslateRequest) -> Result<Translation, ServiceError>;
}
