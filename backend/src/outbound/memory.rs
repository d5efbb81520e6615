//! In-process repositories.
//!
//! Used when no `database_url` is configured and by the behaviour suites.
//! State lives for the life of the process.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::ports::{
    ChatPersistenceError, ChatRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{Chat, ChatId, GoogleProfile, GoogleSubject, Message, User, UserId};

/// In-memory [`UserRepository`].
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_google_subject(
        &self,
        subject: &GoogleSubject,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.google_subject() == subject)
            .cloned())
    }

    async fn upsert_google_user(
        &self,
        profile: &GoogleProfile,
        _now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError> {
        let mut users = self.users.write().await;

        let email_taken = users.values().any(|user| {
            user.email() == &profile.email && user.google_subject() != &profile.subject
        });
        if email_taken {
            return Err(UserPersistenceError::conflict("unique constraint violated"));
        }

        let existing = users
            .values_mut()
            .find(|user| user.google_subject() == &profile.subject);
        if let Some(user) = existing {
            user.refresh_profile(profile.clone());
            return Ok(user.clone());
        }

        let user = User::from_profile(UserId::random(), profile.clone());
        users.insert(user.id(), user.clone());
        Ok(user)
    }
}

#[derive(Debug, Default)]
struct ChatStore {
    chats: HashMap<ChatId, Chat>,
    messages: HashMap<ChatId, Vec<Message>>,
}

/// In-memory [`ChatRepository`].
#[derive(Debug, Default)]
pub struct MemoryChatRepository {
    store: RwLock<ChatStore>,
}

impl MemoryChatRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatRepository for MemoryChatRepository {
    async fn create_chat(&self, chat: &Chat) -> Result<(), ChatPersistenceError> {
        let mut store = self.store.write().await;
        store.chats.insert(chat.id, chat.clone());
        store.messages.entry(chat.id).or_default();
        Ok(())
    }

    async fn find_chat(&self, id: ChatId) -> Result<Option<Chat>, ChatPersistenceError> {
        Ok(self.store.read().await.chats.get(&id).cloned())
    }

    async fn list_recent_chats(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Chat>, ChatPersistenceError> {
        let store = self.store.read().await;
        let mut chats: Vec<Chat> = store
            .chats
            .values()
            .filter(|chat| chat.is_owned_by(user_id))
            .cloned()
            .collect();
        chats.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        chats.truncate(limit);
        Ok(chats)
    }

    async fn append_message(&self, message: &Message) -> Result<(), ChatPersistenceError> {
        let mut store = self.store.write().await;
        let Some(chat) = store.chats.get_mut(&message.chat_id) else {
            return Err(ChatPersistenceError::missing_chat(message.chat_id.to_string()));
        };
        chat.updated_at = message.created_at;
        store
            .messages
            .entry(message.chat_id)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, ChatPersistenceError> {
        Ok(self
            .store
            .read()
            .await
            .messages
            .get(&chat_id)
            .cloned()
            .unwrap_or_default())
    }
}
