//! Driven port for chat and message persistence.
use async_trait::async_trait;

use crate::domain::{Chat, ChatId, Message, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by chat repository adapters.
    pub enum ChatPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "chat repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "chat repository query failed: {message}",
        /// A write referenced a chat that does not exist.
        MissingChat { chat_id: String } => "chat {chat_id} does not exist",
    }
}

/// Port for reading and writing chat transcripts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Persist a new chat.
    async fn create_chat(&self, chat: &Chat) -> Result<(), ChatPersistenceError>;

    /// Fetch a chat by identifier regardless of owner.
    async fn find_chat(&self, id: ChatId) -> Result<Option<Chat>, ChatPersistenceError>;

    /// Most recently updated chats for `user_id`, newest first.
    async fn list_recent_chats(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Chat>, ChatPersistenceError>;

    /// Append a message and move the chat's `updated_at` to the message time.
    async fn append_message(&self, message: &Message) -> Result<(), ChatPersistenceError>;

    /// Messages of a chat, oldest first.
    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, ChatPersistenceError>;
}
