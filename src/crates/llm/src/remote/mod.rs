//! Remote LLM provider implementations.
//!
//! # Providers
//!
//! - **Gemini** - Google's Gemini models via `generateContent`

pub mod gemini;

pub use gemini::GeminiClient;
