use std::collections::HashMap;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, error};

use super::interface::SentimentInterface;
use crate::envelope::{Sentiment, SentimentDetails};
use crate::error::ServiceError;

pub const POSITIVE: &str = "POSITIVE";
pub const NEGATIVE: &str = "NEGATIVE";
pub const NEUTRAL: &str = "NEUTRAL";

/// Polarity beyond which a text stops being neutral
const LABEL_THRESHOLD: f64 = 0.1;

/// Negated words keep half their strength with the sign flipped
const NEGATION_FACTOR: f64 = -0.5;

/// How many tokens back a negation still applies
const NEGATION_WINDOW: usize = 2;

// (word, polarity, subjectivity)
const LEXICON: &[(&str, f64, f64)] = &[
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("excellent", 1.0, 1.0),
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("like", 0.2, 0.4),
    ("happy", 0.8, 1.0),
    ("glad", 0.5, 1.0),
    ("pleased", 0.5, 1.0),
    ("wonderful", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("nice", 0.6, 1.0),
    ("beautiful", 0.85, 1.0),
    ("perfect", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("enjoy", 0.4, 0.5),
    ("helpful", 0.4, 0.5),
    ("fun", 0.3, 0.2),
    ("fine", 0.4, 0.5),
    ("bad", -0.7, 0.67),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("hate", -0.8, 0.9),
    ("hated", -0.9, 0.7),
    ("sad", -0.5, 1.0),
    ("angry", -0.5, 1.0),
    ("poor", -0.4, 0.6),
    ("boring", -1.0, 1.0),
    ("disappointing", -0.6, 0.7),
    ("disappointed", -0.75, 0.75),
    ("ugly", -0.7, 1.0),
    ("wrong", -0.5, 0.9),
    ("annoying", -0.8, 0.9),
    ("broken", -0.4, 0.4),
    ("slow", -0.3, 0.4),
    ("useless", -0.5, 0.0),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.2),
    ("too", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("quite", 1.1),
    ("slightly", 0.5),
    ("somewhat", 0.7),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "nor", "cannot", "without"];

fn lexicon() -> &'static HashMap<&'static str, (f64, f64)> {
    static LEXICON_MAP: OnceLock<HashMap<&'static str, (f64, f64)>> = OnceLock::new();
    LEXICON_MAP.get_or_init(|| LEXICON.iter().map(|&(w, p, s)| (w, (p, s))).collect())
}

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("static word pattern"))
}

fn intensity(token: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|&(_, factor)| factor)
}

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}

/// Document level polarity in `[-1, 1]` and subjectivity in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polarity {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Lexicon based sentiment analyzer.
///
/// Each known word carries a polarity and subjectivity. An intensifier right
/// before a word scales both, a negation up to two tokens back flips and
/// halves the polarity. The document scores are the means over known words.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconAnalyzer;

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn polarity(&self, text: &str) -> Polarity {
        let normalized = text.to_lowercase().replace('\u{2019}', "'");
        let tokens: Vec<&str> = word_pattern()
            .find_iter(&normalized)
            .map(|m| m.as_str())
            .collect();

        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut matched = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&(mut polarity, mut subjectivity)) = lexicon().get(*token) else {
                continue;
            };

            if let Some(factor) = i.checked_sub(1).and_then(|prev| intensity(tokens[prev])) {
                polarity = (polarity * factor).clamp(-1.0, 1.0);
                subjectivity = (subjectivity * factor).clamp(0.0, 1.0);
            }

            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|t| is_negation(t)) {
                polarity *= NEGATION_FACTOR;
            }

            polarity_sum += polarity;
            subjectivity_sum += subjectivity;
            matched += 1;
        }

        if matched == 0 {
            return Polarity {
                polarity: 0.0,
                subjectivity: 0.0,
            };
        }

        Polarity {
            polarity: polarity_sum / matched as f64,
            subjectivity: subjectivity_sum / matched as f64,
        }
    }

    /// Synchronous analysis
    pub fn analyze_text(&self, text: &str) -> Result<Sentiment, ServiceError> {
        if text.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Empty text provided".to_string()));
        }

        let Polarity {
            polarity,
            subjectivity,
        } = self.polarity(text);

        let label = if polarity > LABEL_THRESHOLD {
            POSITIVE
        } else if polarity < -LABEL_THRESHOLD {
            NEGATIVE
        } else {
            NEUTRAL
        };

        debug!(
            "Sentiment {} (polarity={:.3}, subjectivity={:.3})",
            label, polarity, subjectivity
        );

        Ok(Sentiment {
            sentiment: label.to_string(),
            score: (polarity + 1.0) / 2.0,
            confidence: Some(1.0 - subjectivity),
            details: Some(SentimentDetails {
                polarity,
                subjectivity,
            }),
        })
    }
}

#[async_trait]
impl SentimentInterface for LexiconAnalyzer {
    async fn analyze(&self, text: &str) -> Result<Sentiment, ServiceError> {
        let analyzer = *self;
        let text = text.to_string();
        tokio::task::spawn_blocking(move || analyzer.analyze_text(&text))
            .await
            .map_err(|e| {
                error!("Error in async sentiment analysis: {}", e);
                ServiceError::Task(e.to_string())
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str) -> String {
        LexiconAnalyzer::new().analyze_text(text).unwrap().sentiment
    }

    #[test]
    fn positive_text() {
        assert_eq!(label("I love this, it is great"), POSITIVE);
    }

    #[test]
    fn negative_text() {
        assert_eq!(label("What a terrible, boring film"), NEGATIVE);
    }

    #[test]
    fn unknown_words_are_neutral_with_midpoint_score() {
        let sentiment = LexiconAnalyzer::new()
            .analyze_text("The table is brown.")
            .unwrap();
        assert_eq!(sentiment.sentiment, NEUTRAL);
        assert_eq!(sentiment.score, 0.5);
        assert_eq!(sentiment.confidence, Some(1.0));
    }

    #[test]
    fn quotes_do_not_stick_to_words() {
        let analyzer = LexiconAnalyzer::new();
        assert_eq!(analyzer.polarity("'great'"), analyzer.polarity("great"));
        assert_eq!(label("it wasn't 'good'"), NEGATIVE);
    }

    #[test]
    fn negation_flips_polarity() {
        let analyzer = LexiconAnalyzer::new();
        let plain = analyzer.polarity("this is good").polarity;
        let negated = analyzer.polarity("this is not good").polarity;
        assert!(plain > 0.0);
        assert!((negated - plain * NEGATION_FACTOR).abs() < 1e-9);
        assert_eq!(label("this isn't good"), NEGATIVE);
    }

    #[test]
    fn intensifier_strengthens_but_stays_bounded() {
        let analyzer = LexiconAnalyzer::new();
        let plain = analyzer.polarity("good").polarity;
        let intense = analyzer.polarity("very good").polarity;
        assert!(intense > plain);
        assert_eq!(analyzer.polarity("extremely perfect").polarity, 1.0);
    }

    #[test]
    fn score_stays_in_unit_range() {
        let analyzer = LexiconAnalyzer::new();
        for text in ["worst awful horrible", "best perfect excellent", "meh"] {
            let score = analyzer.analyze_text(text).unwrap().score;
            assert!((0.0..=1.0).contains(&score), "{text}: {score}");
        }
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = LexiconAnalyzer::new().analyze_text("   ").unwrap_err();
        assert_eq!(err.to_string(), "Empty text provided");
    }

    #[tokio::test]
    async fn async_interface_matches_sync() {
        let analyzer = LexiconAnalyzer::new();
        let text = "The food was really nice";
        let sync = analyzer.analyze_text(text).unwrap();
        let via_trait = SentimentInterface::analyze(&analyzer, text).await.unwrap();
        assert_eq!(sync, via_trait);
    }
}
