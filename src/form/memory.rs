use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dashmap::DashMap;

use super::{ElementId, FormView};

/// State of one element in a [`MemoryView`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementState {
    /// Input value, read by the controller
    pub value: String,
    /// Rendered text, written by the controller
    pub text: String,
    pub visible: bool,
    pub error_style: bool,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            value: String::new(),
            text: String::new(),
            visible: true,
            error_style: false,
        }
    }
}

/// In-memory page with the analysis form's elements.
///
/// Starts with the results and error regions hidden and submit enabled.
pub struct MemoryView {
    elements: DashMap<ElementId, ElementState>,
    submit_enabled: AtomicBool,
    disable_count: AtomicUsize,
}

impl MemoryView {
    pub fn new() -> Self {
        let elements = DashMap::new();
        for id in ElementId::ALL {
            let hidden = matches!(id, ElementId::Results | ElementId::Error);
            elements.insert(
                id,
                ElementState {
                    visible: !hidden,
                    ..ElementState::default()
                },
            );
        }
        Self {
            elements,
            submit_enabled: AtomicBool::new(true),
            disable_count: AtomicUsize::new(0),
        }
    }

    /// Fill the three inputs as a user would
    pub fn with_input(text: &str, source_lang: &str, target_lang: &str) -> Self {
        let view = Self::new();
        view.set_value(ElementId::Text, text);
        view.set_value(ElementId::SourceLang, source_lang);
        view.set_value(ElementId::TargetLang, target_lang);
        view
    }

    pub fn set_value(&self, id: ElementId, value: &str) {
        self.elements.entry(id).or_default().value = value.to_string();
    }

    pub fn element(&self, id: ElementId) -> ElementState {
        self.elements
            .get(&id)
            .map(|e| e.value().clone())
            .unwrap_or_default()
    }

    pub fn text(&self, id: ElementId) -> String {
        self.element(id).text
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.element(id).visible
    }

    pub fn has_error_style(&self, id: ElementId) -> bool {
        self.element(id).error_style
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.submit_enabled.load(Ordering::SeqCst)
    }

    /// How many times submit was disabled
    pub fn times_disabled(&self) -> usize {
        self.disable_count.load(Ordering::SeqCst)
    }
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl FormView for MemoryView {
    fn read_field(&self, id: ElementId) -> String {
        self.element(id).value
    }

    fn set_text(&self, id: ElementId, text: &str) {
        self.elements.entry(id).or_default().text = text.to_string();
    }

    fn set_visible(&self, id: ElementId, visible: bool) {
        self.elements.entry(id).or_default().visible = visible;
    }

    fn set_error_style(&self, id: ElementId, error: bool) {
        self.elements.entry(id).or_default().error_style = error;
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.submit_enabled.store(enabled, Ordering::SeqCst);
        if !enabled {
            self.disable_count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_results_and_error_hidden() {
        let view = MemoryView::new();
        assert!(!view.is_visible(ElementId::Results));
        assert!(!view.is_visible(ElementId::Error));
        assert!(view.is_visible(ElementId::Text));
        assert!(view.is_submit_enabled());
    }

    #[test]
    fn values_and_text_are_separate() {
        let view = MemoryView::with_input("hi", "en", "ta");
        view.set_text(ElementId::Text, "ignored");
        assert_eq!(view.read_field(ElementId::Text), "hi");
        assert_eq!(view.read_field(ElementId::TargetLang), "ta");
    }

    #[test]
    fn dom_ids_are_distinct() {
        let ids: std::collections::HashSet<_> = ElementId::ALL.iter().map(|id| id.dom_id()).collect();
        assert_eq!(ids.len(), ElementId::ALL.len());
    }
}
