//! Driven port for the text-generation model.
//!
//! The domain hands over a fully built prompt and receives plain text back.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the story model.
    pub enum StoryGeneratorError {
        /// No credentials were configured for the model.
        NotConfigured => "story generator is not configured",
        /// Network transport failed before receiving a response.
        Transport { message: String } => "story generator transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "story generator timed out: {message}",
        /// The model provider rate-limited the request.
        RateLimited { message: String } => "story generator rate limited request: {message}",
        /// The provider answered with a non-success status.
        Upstream { status: u16, message: String } =>
            "story generator returned status {status}: {message}",
        /// The response could not be decoded or held no text.
        Decode { message: String } => "story generator response decode failed: {message}",
    }
}

/// Port for turning a prompt into a story.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryGenerator: Send + Sync {
    /// Generate text for `prompt`. The returned text is already trimmed.
    async fn generate(&self, prompt: &str) -> Result<String, StoryGeneratorError>;
}

/// Generator used when no API key is configured; every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredStoryGenerator;

#[async_trait]
impl StoryGenerator for UnconfiguredStoryGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, StoryGeneratorError> {
        Err(StoryGeneratorError::not_configured())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn unconfigured_generator_always_fails() {
        let err = UnconfiguredStoryGenerator
            .generate("hello")
            .await
            .expect_err("no key configured");
        assert_eq!(err, StoryGeneratorError::NotConfigured);
    }
}
