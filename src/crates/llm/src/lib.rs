//! Text generation for the local agent.
//!
//! The plan interpreter only needs one capability from a language model:
//! turn a prompt into text. That capability is the [`TextGenerator`] trait.
//! Implementations swallow their own transport failures and return an empty
//! string, which the interpreter then reports as "no plan could be extracted".
//!
//! # Remote Providers
//!
//! - **Gemini** - Google's `generateContent` API ([`remote::GeminiClient`])
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::GeminiClient;
//! use llm::{RemoteLlmConfig, TextGenerator};
//!
//! let config = RemoteLlmConfig::gemini_from_env("GEMINI_API_KEY")?;
//! let client = GeminiClient::new(config)?;
//! let text = client.generate("Respond with a JSON array of commands").await;
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod remote;

pub use config::RemoteLlmConfig;
pub use error::{LlmError, Result};
pub use generator::{StaticGenerator, TextGenerator};
