//! Text analysis: the `/analyze` service (sentiment, translation, chat) and
//! the form controller that submits to it.

pub mod chat;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod form;
pub mod handlers;
pub mod monitoring;
pub mod routes;
pub mod sentiment;
pub mod state;
pub mod terminal;
pub mod translate;

pub use client::{AnalyzeTransport, HttpTransport};
pub use config::Config;
pub use envelope::{AnalyzeEnvelope, AnalyzeReply, AnalyzeRequest, SlotResult};
pub use form::{FormController, FormView, SubmitOutcome};
pub use state::AppState;

/// Install the fmt subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
