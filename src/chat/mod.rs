pub mod gemini;
pub mod interface;

pub use gemini::GeminiChat;
pub use interface::ChatInterface;
