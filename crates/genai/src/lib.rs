//! Generative text client.
//!
//! [`GeminiClient`] implements [`civicspend_core::insight::TextGenerator`]
//! against the Gemini `generateContent` endpoint.

mod gemini;

pub use gemini::GeminiClient;
