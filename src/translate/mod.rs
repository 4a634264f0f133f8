pub mod interface;
pub mod languages;
pub mod rapid_api;

pub use interface::{TranslateInterface, TranslateRequest};
pub use rapid_api::RapidApiTranslator;
