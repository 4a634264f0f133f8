//! Form Submission Controller and the view port it renders through.

pub mod controller;
pub mod memory;

pub use controller::{FormController, Phase, SubmitOutcome};
pub use memory::MemoryView;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to analyze.";
pub const GENERIC_ERROR_MESSAGE: &str =
    "An error occurred while processing your request. Please try again.";

/// Elements of the analysis form, by their fixed DOM ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    AnalyzeForm,
    Text,
    SourceLang,
    TargetLang,
    Results,
    SentimentResult,
    TranslationResult,
    ChatResult,
    Error,
    ErrorMessage,
    Submit,
}

impl ElementId {
    pub const ALL: [ElementId; 11] = [
        ElementId::AnalyzeForm,
        ElementId::Text,
        ElementId::SourceLang,
        ElementId::TargetLang,
        ElementId::Results,
        ElementId::SentimentResult,
        ElementId::TranslationResult,
        ElementId::ChatResult,
        ElementId::Error,
        ElementId::ErrorMessage,
        ElementId::Submit,
    ];

    pub fn dom_id(self) -> &'static str {
        match self {
            ElementId::AnalyzeForm => "analyzeForm",
            ElementId::Text => "text",
            ElementId::SourceLang => "sourceLang",
            ElementId::TargetLang => "targetLang",
            ElementId::Results => "results",
            ElementId::SentimentResult => "sentimentResult",
            ElementId::TranslationResult => "translationResult",
            ElementId::ChatResult => "chatResult",
            ElementId::Error => "error",
            ElementId::ErrorMessage => "errorMessage",
            ElementId::Submit => "submit",
        }
    }
}

/// Capabilities the controller needs from the page.
///
/// Methods take `&self`: a view is a handle onto elements owned elsewhere.
pub trait FormView: Send + Sync {
    /// Current value of an input or select
    fn read_field(&self, id: ElementId) -> String;

    fn set_text(&self, id: ElementId, text: &str);

    fn set_visible(&self, id: ElementId, visible: bool);

    /// Toggle error styling on a result slot
    fn set_error_style(&self, id: ElementId, error: bool);

    fn set_submit_enabled(&self, enabled: bool);
}
