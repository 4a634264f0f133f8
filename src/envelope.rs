//! Wire types shared by the `/analyze` endpoint and its clients.

use serde::de::{DeserializeOwned, Error as _};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// One slot of the envelope: either the service's value or its error message.
///
/// On the wire a failure is `{"error": "<message>"}`. Any object carrying a
/// string `error` decodes as a failure, whatever else it contains.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotResult<T> {
    Success(T),
    Failure(String),
}

impl<T> SlotResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, SlotResult::Success(_))
    }

    pub fn failure(message: impl Into<String>) -> Self {
        SlotResult::Failure(message.into())
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for SlotResult<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => SlotResult::Success(value),
            Err(e) => SlotResult::Failure(e.to_string()),
        }
    }
}

impl<T: Serialize> Serialize for SlotResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SlotResult::Success(value) => value.serialize(serializer),
            SlotResult::Failure(message) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", message)?;
                map.end()
            }
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for SlotResult<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Ok(SlotResult::Failure(message.to_string()));
        }
        T::deserialize(value).map(SlotResult::Success).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentDetails {
    pub polarity: f64,
    pub subjectivity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// `POSITIVE`, `NEGATIVE` or `NEUTRAL`.
    pub sentiment: String,
    /// Polarity mapped onto `0.0..=1.0`.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<SentimentDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Successful `/analyze` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeEnvelope {
    pub sentiment: SlotResult<Sentiment>,
    pub translation: SlotResult<Translation>,
    pub chat: SlotResult<ChatReply>,
    /// Diagnostic timings. Never rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<Value>,
}

/// A 2xx `/analyze` body: either the envelope or a whole-request rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeReply {
    Rejected(String),
    Analysis(AnalyzeEnvelope),
}

impl AnalyzeReply {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Ok(AnalyzeReply::Rejected(message.to_string()));
        }
        serde_json::from_value(value).map(AnalyzeReply::Analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_with_wire_field_names() {
        let request = AnalyzeRequest {
            text: "hello".into(),
            source_lang: "en".into(),
            target_lang: "hi".into(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"text": "hello", "source_lang": "en", "target_lang": "hi"})
        );
    }

    #[test]
    fn slot_with_error_field_is_failure_even_with_fallback_fields() {
        let slot: SlotResult<Sentiment> = serde_json::from_value(json!({
            "sentiment": "NEUTRAL",
            "score": 0.5,
            "error": "model offline"
        }))
        .unwrap();
        assert_eq!(slot, SlotResult::Failure("model offline".into()));
    }

    #[test]
    fn null_error_field_is_success() {
        let slot: SlotResult<ChatReply> =
            serde_json::from_value(json!({"response": "hi", "error": null})).unwrap();
        assert_eq!(slot, SlotResult::Success(ChatReply { response: "hi".into() }));
    }

    #[test]
    fn failure_serializes_to_bare_error_object() {
        let slot: SlotResult<Translation> = SlotResult::failure("quota exceeded");
        assert_eq!(
            serde_json::to_value(&slot).unwrap(),
            json!({"error": "quota exceeded"})
        );
    }

    #[test]
    fn top_level_error_is_rejection() {
        let reply = AnalyzeReply::from_slice(br#"{"error": "bad input"}"#).unwrap();
        assert_eq!(reply, AnalyzeReply::Rejected("bad input".into()));
    }

    #[test]
    fn envelope_missing_a_slot_fails_to_decode() {
        let result = AnalyzeReply::from_value(json!({
            "sentiment": {"sentiment": "POSITIVE", "score": 0.9},
            "chat": {"response": "ok"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn mixed_envelope_keeps_slots_independent() {
        let reply = AnalyzeReply::from_value(json!({
            "sentiment": {"error": "X"},
            "translation": {"text": "namaste"},
            "chat": {"response": "hello there"},
            "performance": {"total_time": "0.12s"}
        }))
        .unwrap();
        let AnalyzeReply::Analysis(envelope) = reply else {
            panic!("expected analysis");
        };
        assert_eq!(envelope.sentiment, SlotResult::Failure("X".into()));
        assert!(envelope.translation.is_success());
        assert!(envelope.chat.is_success());
        assert!(envelope.performance.is_some());
    }
}
