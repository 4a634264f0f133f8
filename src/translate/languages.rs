/// Codes the translation backend is known to accept
pub const SUPPORTED: &[&str] = &["en", "hi", "bn", "gu", "kn", "ml", "mr", "ta", "te"];

pub const DEFAULT_LANGUAGE: &str = "en";

/// Normalize a language code. Empty maps to English, unknown codes pass
/// through lowercased.
pub fn normalize(lang: &str) -> String {
    let lang = lang.trim();
    if lang.is_empty() {
        return DEFAULT_LANGUAGE.to_string();
    }
    lang.to_lowercase()
}

pub fn is_supported(lang: &str) -> bool {
    SUPPORTED.contains(&normalize(lang).as_str())
}
