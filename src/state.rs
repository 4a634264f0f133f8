use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::{ChatInterface, GeminiChat};
use crate::config::Config;
use crate::monitoring::PerformanceMonitor;
use crate::sentiment::{LexiconAnalyzer, SentimentInterface};
use crate::translate::{RapidApiTranslator, TranslateInterface};

/// Services behind `/analyze`. A `None` service reports itself unavailable
/// in its slot instead of failing the request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sentiment: Option<Arc<dyn SentimentInterface>>,
    pub translator: Option<Arc<dyn TranslateInterface>>,
    pub chat: Option<Arc<dyn ChatInterface>>,
    pub monitor: Arc<PerformanceMonitor>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sentiment: Arc<dyn SentimentInterface> = Arc::new(LexiconAnalyzer::new());
        info!("Sentiment analyzer module loaded");

        let translator = RapidApiTranslator::from_config(&config.services_config.translation)
            .map(|t| Arc::new(t) as Arc<dyn TranslateInterface>);
        match translator {
            Some(_) => info!("Translation module loaded"),
            None => warn!("RAPID_API_KEY not set, translation disabled"),
        }

        let chat = GeminiChat::from_config(&config.services_config.chat)
            .map(|c| Arc::new(c) as Arc<dyn ChatInterface>);
        match chat {
            Some(_) => info!("Chat engine module loaded"),
            None => warn!("GOOGLE_GEMINI_API_KEY not set, chat disabled"),
        }

        Self::with_services(config, Some(sentiment), translator, chat)
    }

    pub fn with_services(
        config: Config,
        sentiment: Option<Arc<dyn SentimentInterface>>,
        translator: Option<Arc<dyn TranslateInterface>>,
        chat: Option<Arc<dyn ChatInterface>>,
    ) -> Self {
        Self {
            config,
            sentiment,
            translator,
            chat,
            monitor: Arc::new(PerformanceMonitor::new()),
        }
    }

    pub fn generate_request_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
