//! Driving port for story generation.

use async_trait::async_trait;

use crate::domain::{ChatId, Error, StoryOutcome, UserId};

/// Use-case port behind `POST /generate-story`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryCommand: Send + Sync {
    /// Validate `input`, record it in a chat, and return the generated story.
    ///
    /// Starts a new chat when `chat_id` is `None`.
    async fn generate_story(
        &self,
        user_id: UserId,
        input: &str,
        chat_id: Option<ChatId>,
    ) -> Result<StoryOutcome, Error>;
}
