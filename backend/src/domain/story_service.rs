//! Story generation service.
//!
//! Implements [`StoryCommand`]: validates the input, records both sides of
//! the exchange in a chat, and calls the story model in between.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    ChatPersistenceError, ChatRepository, StoryCommand, StoryGenerator, StoryGeneratorError,
};
use crate::domain::{
    Chat, ChatId, ChatTitle, Error, Message, MessageRole, StoryInput, StoryOutcome, UserId,
    story_prompt,
};

/// Message returned when the model call fails.
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate story. Please try again.";

/// Message returned when a chat is missing or owned by someone else.
pub const CHAT_NOT_FOUND_MESSAGE: &str = "Chat not found";

/// Story service implementing the [`StoryCommand`] driving port.
#[derive(Clone)]
pub struct StoryService<R: ?Sized, G: ?Sized> {
    chats: Arc<R>,
    generator: Arc<G>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized, G: ?Sized> StoryService<R, G> {
    /// Create a service over the given adapters.
    pub fn new(chats: Arc<R>, generator: Arc<G>, clock: Arc<dyn Clock>) -> Self {
        Self {
            chats,
            generator,
            clock,
        }
    }
}

pub(crate) fn map_chat_error(error: ChatPersistenceError) -> Error {
    match error {
        ChatPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("chat repository unavailable: {message}"))
        }
        ChatPersistenceError::Query { message } => {
            Error::internal(format!("chat repository error: {message}"))
        }
        ChatPersistenceError::MissingChat { .. } => Error::not_found(CHAT_NOT_FOUND_MESSAGE),
    }
}

fn map_generator_error(error: &StoryGeneratorError) -> Error {
    warn!(error = %error, "story generation failed");
    Error::service_unavailable(GENERATION_FAILED_MESSAGE)
}

impl<R: ?Sized, G: ?Sized> StoryService<R, G>
where
    R: ChatRepository,
    G: StoryGenerator,
{
    async fn resolve_chat(
        &self,
        user_id: UserId,
        input: &StoryInput,
        chat_id: Option<ChatId>,
    ) -> Result<Chat, Error> {
        match chat_id {
            Some(id) => {
                let chat = self.chats.find_chat(id).await.map_err(map_chat_error)?;
                match chat {
                    Some(chat) if chat.is_owned_by(user_id) => Ok(chat),
                    _ => Err(Error::not_found(CHAT_NOT_FOUND_MESSAGE)),
                }
            }
            None => {
                let chat = Chat::start(user_id, ChatTitle::from_input(input), self.clock.utc());
                self.chats.create_chat(&chat).await.map_err(map_chat_error)?;
                info!(chat_id = %chat.id, user_id = %user_id, "chat started");
                Ok(chat)
            }
        }
    }
}

#[async_trait]
impl<R: ?Sized, G: ?Sized> StoryCommand for StoryService<R, G>
where
    R: ChatRepository,
    G: StoryGenerator,
{
    async fn generate_story(
        &self,
        user_id: UserId,
        input: &str,
        chat_id: Option<ChatId>,
    ) -> Result<StoryOutcome, Error> {
        let input = StoryInput::new(input).map_err(|err| Error::invalid_request(err.to_string()))?;
        let chat = self.resolve_chat(user_id, &input, chat_id).await?;

        let user_message = Message::new(chat.id, MessageRole::User, input.as_ref(), self.clock.utc());
        self.chats
            .append_message(&user_message)
            .await
            .map_err(map_chat_error)?;

        let story = self
            .generator
            .generate(&story_prompt(&input))
            .await
            .map_err(|err| map_generator_error(&err))?;

        let reply = Message::new(chat.id, MessageRole::Assistant, story.as_str(), self.clock.utc());
        self.chats
            .append_message(&reply)
            .await
            .map_err(map_chat_error)?;

        Ok(StoryOutcome {
            story,
            chat_id: chat.id,
        })
    }
}

#[cfg(test)]
mod tests;
