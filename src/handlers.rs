use std::collections::BTreeMap;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::envelope::{AnalyzeEnvelope, ChatReply, Sentiment, SlotResult, Translation};
use crate::error::ServiceError;
use crate::monitoring::{CategoryMetrics, CHAT, SENTIMENT, TRANSLATION};
use crate::state::AppState;
use crate::translate::{languages, TranslateRequest};

const DEFAULT_SOURCE_LANG: &str = "en";
const DEFAULT_TARGET_LANG: &str = "hi";

#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub source_lang: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
}

type ApiError = (StatusCode, Json<Value>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<AnalyzeEnvelope>, ApiError> {
    let start = Instant::now();
    let request_id = state.generate_request_id();
    info!("[{}] Received /analyze request", request_id);

    let Json(body) = body.map_err(|e| {
        warn!("[{}] No JSON data in request: {}", request_id, e);
        bad_request("No data provided")
    })?;

    if body.text.trim().is_empty() {
        return Err(bad_request("No text provided"));
    }

    let text = body.text;
    let source_lang = body
        .source_lang
        .unwrap_or_else(|| DEFAULT_SOURCE_LANG.to_string());
    let target_lang = body
        .target_lang
        .unwrap_or_else(|| DEFAULT_TARGET_LANG.to_string());

    if !languages::is_supported(&target_lang) {
        warn!("[{}] Unsupported target language '{}'", request_id, target_lang);
    }

    info!(
        "[{}] Processing request: text='{}', source_lang='{}', target_lang='{}'",
        request_id, text, source_lang, target_lang
    );

    let (translation, sentiment, chat) = tokio::join!(
        state.monitor.track(
            TRANSLATION,
            run_translation(&state, &text, &source_lang, &target_lang)
        ),
        state.monitor.track(SENTIMENT, run_sentiment(&state, &text)),
        state.monitor.track(CHAT, run_chat(&state, &text)),
    );

    let elapsed = start.elapsed().as_secs_f64();
    let envelope = AnalyzeEnvelope {
        sentiment,
        translation,
        chat,
        performance: Some(json!({
            "total_time": format!("{:.2}s", elapsed),
            "metrics": state.monitor.snapshot(),
        })),
    };

    info!("[{}] Request processed successfully in {:.2}s", request_id, elapsed);
    debug!("[{}] Response data: {:?}", request_id, envelope);

    Ok(Json(envelope))
}

async fn run_translation(
    state: &AppState,
    text: &str,
    source_lang: &str,
    target_lang: &str,
) -> SlotResult<Translation> {
    let Some(translator) = &state.translator else {
        return SlotResult::failure(ServiceError::Unavailable("Translation").to_string());
    };
    let request = TranslateRequest {
        text: text.to_string(),
        source_lang: Some(source_lang.to_string()),
        target_lang: target_lang.to_string(),
    };
    translator
        .translate(request)
        .await
        .map_err(|e| {
            error!("Translation error: {}", e);
            e
        })
        .into()
}

async fn run_sentiment(state: &AppState, text: &str) -> SlotResult<Sentiment> {
    let Some(analyzer) = &state.sentiment else {
        return SlotResult::failure(ServiceError::Unavailable("Sentiment").to_string());
    };
    analyzer
        .analyze(text)
        .await
        .map_err(|e| {
            error!("Sentiment analysis error: {}", e);
            e
        })
        .into()
}

async fn run_chat(state: &AppState, text: &str) -> SlotResult<ChatReply> {
    let Some(chat) = &state.chat else {
        return SlotResult::failure(ServiceError::Unavailable("Chat").to_string());
    };
    chat.respond(text)
        .await
        .map_err(|e| {
            error!("Chat processing error: {}", e);
            e
        })
        .into()
}

pub async fn get_metrics(State(state): State<AppState>) -> Json<BTreeMap<String, CategoryMetrics>> {
    Json(state.monitor.snapshot())
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "services": {
            "translation": state.translator.is_some(),
            "sentiment": state.sentiment.is_some(),
            "chat": state.chat.is_some(),
        }
    }))
}
