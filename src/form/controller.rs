use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::{ElementId, FormView, EMPTY_INPUT_MESSAGE, GENERIC_ERROR_MESSAGE};
use crate::client::{AnalyzeResponse, AnalyzeTransport};
use crate::envelope::{AnalyzeEnvelope, AnalyzeReply, AnalyzeRequest, SlotResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank text. Nothing was sent.
    Rejected,
    /// The banner shows `message` and results are hidden
    Failed { message: String },
    /// Results are shown. Individual slots may still carry errors.
    Rendered,
    /// Abandoned before a response arrived
    Cancelled,
}

/// Re-enables submit however the submission ends
struct SubmitGuard<'a> {
    view: &'a dyn FormView,
    in_flight: &'a AtomicUsize,
}

impl<'a> SubmitGuard<'a> {
    fn engage(view: &'a dyn FormView, in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        view.set_submit_enabled(false);
        Self { view, in_flight }
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.view.set_submit_enabled(true);
    }
}

/// Handles submissions of the analysis form.
///
/// Overlapping submissions are not prevented here; the disabled submit
/// control is the only guard, as on the page.
pub struct FormController {
    view: Arc<dyn FormView>,
    transport: Arc<dyn AnalyzeTransport>,
    in_flight: AtomicUsize,
}

impl FormController {
    pub fn new(view: Arc<dyn FormView>, transport: Arc<dyn AnalyzeTransport>) -> Self {
        Self {
            view,
            transport,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            Phase::Submitting
        } else {
            Phase::Idle
        }
    }

    /// Handle one submit event
    pub async fn submit(&self) -> SubmitOutcome {
        self.submit_until(std::future::pending::<()>()).await
    }

    /// Handle one submit event, abandoning the request if `cancel` resolves first
    pub async fn submit_until<C>(&self, cancel: C) -> SubmitOutcome
    where
        C: Future<Output = ()>,
    {
        let view = self.view.as_ref();

        let text = view.read_field(ElementId::Text);
        let text = text.trim();
        if text.is_empty() {
            self.show_error(EMPTY_INPUT_MESSAGE);
            view.set_submit_enabled(true);
            return SubmitOutcome::Rejected;
        }

        let payload = AnalyzeRequest {
            text: text.to_string(),
            source_lang: view.read_field(ElementId::SourceLang),
            target_lang: view.read_field(ElementId::TargetLang),
        };

        let _guard = SubmitGuard::engage(view, &self.in_flight);
        view.set_text(ElementId::ErrorMessage, "");
        view.set_visible(ElementId::Error, false);
        view.set_visible(ElementId::Results, false);

        info!(
            "Submitting analysis: {} chars, {} -> {}",
            payload.text.len(),
            payload.source_lang,
            payload.target_lang
        );

        let response = tokio::select! {
            biased;
            _ = cancel => {
                info!("Analysis request cancelled");
                return SubmitOutcome::Cancelled;
            }
            response = self.transport.post_analyze(&payload) => response,
        };

        match response {
            Ok(AnalyzeResponse::Reply(AnalyzeReply::Analysis(envelope))) => {
                self.render(&envelope);
                SubmitOutcome::Rendered
            }
            Ok(AnalyzeResponse::Reply(AnalyzeReply::Rejected(message))) => {
                warn!("Server rejected analysis: {}", message);
                self.fail(message)
            }
            Ok(AnalyzeResponse::Status(status)) => {
                error!("HTTP error! status: {}", status);
                self.fail(GENERIC_ERROR_MESSAGE.to_string())
            }
            Err(e) => {
                error!("Analysis request failed: {}", e);
                self.fail(GENERIC_ERROR_MESSAGE.to_string())
            }
        }
    }

    fn show_error(&self, message: &str) {
        self.view.set_text(ElementId::ErrorMessage, message);
        self.view.set_visible(ElementId::Error, true);
    }

    fn fail(&self, message: String) -> SubmitOutcome {
        self.show_error(&message);
        self.view.set_visible(ElementId::Results, false);
        SubmitOutcome::Failed { message }
    }

    fn render(&self, envelope: &AnalyzeEnvelope) {
        self.view.set_visible(ElementId::Error, false);
        self.view.set_visible(ElementId::Results, true);

        self.render_slot(ElementId::SentimentResult, &envelope.sentiment, |s| {
            format!("{} (score: {:.2})", s.sentiment, s.score)
        });
        self.render_slot(ElementId::TranslationResult, &envelope.translation, |t| {
            t.text.clone()
        });
        self.render_slot(ElementId::ChatResult, &envelope.chat, |c| c.response.clone());

        let failed = [
            envelope.sentiment.is_success(),
            envelope.translation.is_success(),
            envelope.chat.is_success(),
        ]
        .into_iter()
        .filter(|ok| !ok)
        .count();
        if failed > 0 {
            warn!("{} of 3 analysis slots reported errors", failed);
        }

        if let Some(performance) = &envelope.performance {
            debug!("Performance metrics: {}", performance);
        }
    }

    fn render_slot<T>(&self, id: ElementId, slot: &SlotResult<T>, show: impl Fn(&T) -> String) {
        match slot {
            SlotResult::Success(value) => {
                self.view.set_text(id, &show(value));
                self.view.set_error_style(id, false);
            }
            SlotResult::Failure(message) => {
                self.view.set_text(id, &format!("Error: {}", message));
                self.view.set_error_style(id, true);
            }
        }
    }
}
