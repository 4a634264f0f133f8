pub mod interface;
pub mod lexicon;

pub use interface::SentimentInterface;
pub use lexicon::LexiconAnalyzer;
