//! Driving port for chat history reads.

use async_trait::async_trait;

use crate::domain::{Chat, ChatId, Error, Message, UserId};

/// Use-case port behind the `/chats` endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatHistoryQuery: Send + Sync {
    /// Recent chats for the user, most recently updated first.
    async fn list_chats(&self, user_id: UserId) -> Result<Vec<Chat>, Error>;

    /// Messages of a chat owned by the user, oldest first.
    async fn list_messages(&self, user_id: UserId, chat_id: ChatId)
    -> Result<Vec<Message>, Error>;
}
