pub mod catalog;
pub mod fairness;
pub mod gemini;
pub mod listings;
pub mod messaging;
pub mod offers;
pub mod profiles;
pub mod strategy;

mod lookup;

pub use gemini::{GeminiClient, GenerationConfig, TextGenerator};
