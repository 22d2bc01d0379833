//! Generative-text adapters.

mod gemini;

pub use gemini::GeminiTextGenerator;
