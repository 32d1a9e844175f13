//! The text generation seam used by the plan interpreter.

use async_trait::async_trait;
use std::sync::Arc;

/// Anything that can turn a prompt into generated text.
///
/// Implementations never fail outwardly: a provider error is logged and
/// surfaces as an empty string, and the caller decides what an empty answer
/// means.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`.
    async fn generate(&self, prompt: &str) -> String;

    /// Short provider/model label for logs.
    fn describe(&self) -> String {
        "text-generator".to_string()
    }
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, prompt: &str) -> String {
        (**self).generate(prompt).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Generator that always answers with the same text.
///
/// Used to replay a recorded model answer without network access.
#[derive(Debug, Clone)]
pub struct StaticGenerator {
    response: String,
}

impl StaticGenerator {
    /// Create a generator that replays `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    async fn generate(&self, _prompt: &str) -> String {
        self.response.clone()
    }

    fn describe(&self) -> String {
        format!("static ({} chars)", self.response.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_generator_replays_response() {
        let generator = StaticGenerator::new("[\"wait(100)\"]");
        assert_eq!(generator.generate("anything").await, "[\"wait(100)\"]");
        assert_eq!(generator.generate("something else").await, "[\"wait(100)\"]");
    }

    #[tokio::test]
    async fn test_arc_forwarding() {
        let generator: Arc<dyn TextGenerator> = Arc::new(StaticGenerator::new("ok"));
        assert_eq!(generator.generate("p").await, "ok");
        assert!(generator.describe().starts_with("static"));
    }
}
