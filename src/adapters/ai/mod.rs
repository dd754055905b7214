//! Text Generation Adapters
//!
//! - `gemini`: Google Generative Language API client

pub mod gemini;

pub use gemini::GeminiClient;
