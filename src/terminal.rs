use std::fmt::Write as _;

use crate::form::{ElementId, FormView, MemoryView};

const SLOTS: [(ElementId, &str); 3] = [
    (ElementId::SentimentResult, "Sentiment"),
    (ElementId::TranslationResult, "Translation"),
    (ElementId::ChatResult, "Chat"),
];

/// Form view for a terminal: keeps page state in memory and prints the
/// visible regions after each submission.
#[derive(Default)]
pub struct TerminalView {
    page: MemoryView,
}

impl TerminalView {
    pub fn new(source_lang: &str, target_lang: &str) -> Self {
        let view = Self::default();
        view.page.set_value(ElementId::SourceLang, source_lang);
        view.page.set_value(ElementId::TargetLang, target_lang);
        view
    }

    /// Type `text` into the text field
    pub fn enter_text(&self, text: &str) {
        self.page.set_value(ElementId::Text, text);
    }

    /// What the page currently shows
    pub fn report(&self) -> String {
        let mut out = String::new();
        if self.page.is_visible(ElementId::Error) {
            let _ = writeln!(out, "! {}", self.page.text(ElementId::ErrorMessage));
        }
        if self.page.is_visible(ElementId::Results) {
            for (id, label) in SLOTS {
                let marker = if self.page.has_error_style(id) { "!" } else { " " };
                let _ = writeln!(out, "{}{:<12} {}", marker, format!("{}:", label), self.page.text(id));
            }
        }
        out
    }
}

impl FormView for TerminalView {
    fn read_field(&self, id: ElementId) -> String {
        self.page.read_field(id)
    }

    fn set_text(&self, id: ElementId, text: &str) {
        self.page.set_text(id, text);
    }

    fn set_visible(&self, id: ElementId, visible: bool) {
        self.page.set_visible(id, visible);
    }

    fn set_error_style(&self, id: ElementId, error: bool) {
        self.page.set_error_style(id, error);
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.page.set_submit_enabled(enabled);
    }
}
