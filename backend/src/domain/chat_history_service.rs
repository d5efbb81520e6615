//! Chat history read service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{ChatHistoryQuery, ChatRepository};
use crate::domain::story_service::{CHAT_NOT_FOUND_MESSAGE, map_chat_error};
use crate::domain::{Chat, ChatId, Error, Message, RECENT_CHATS_LIMIT, UserId};

/// Chat history service implementing [`ChatHistoryQuery`].
#[derive(Clone)]
pub struct ChatHistoryService<R: ?Sized> {
    chats: Arc<R>,
}

impl<R: ?Sized> ChatHistoryService<R> {
    /// Create a service over the given repository.
    pub fn new(chats: Arc<R>) -> Self {
        Self { chats }
    }
}

#[async_trait]
impl<R: ?Sized> ChatHistoryQuery for ChatHistoryService<R>
where
    R: ChatRepository,
{
    async fn list_chats(&self, user_id: UserId) -> Result<Vec<Chat>, Error> {
        self.chats
            .list_recent_chats(user_id, RECENT_CHATS_LIMIT)
            .await
            .map_err(map_chat_error)
    }

    async fn list_messages(
        &self,
        user_id: UserId,
        chat_id: ChatId,
    ) -> Result<Vec<Message>, Error> {
        let chat = self.chats.find_chat(chat_id).await.map_err(map_chat_error)?;
        if !chat.is_some_and(|chat| chat.is_owned_by(user_id)) {
            return Err(Error::not_found(CHAT_NOT_FOUND_MESSAGE));
        }
        self.chats
            .list_messages(chat_id)
            .await
            .map_err(map_chat_error)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockChatRepository;
    use crate::domain::{ChatTitle, ErrorCode, MessageRole};

    #[rstest]
    #[tokio::test]
    async fn list_chats_requests_recent_limit() {
        let user = UserId::random();
        let mut chats = MockChatRepository::new();
        chats
            .expect_list_recent_chats()
            .withf(move |id, limit| *id == user && *limit == RECENT_CHATS_LIMIT)
            .returning(move |id, _| {
                Ok(vec![Chat::start(id, ChatTitle::from_stored("A"), Utc::now())])
            });

        let listed = ChatHistoryService::new(Arc::new(chats))
            .list_chats(user)
            .await
            .expect("chats listed");

        assert_eq!(listed.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn list_messages_returns_owned_transcript() {
        let user = UserId::random();
        let chat = Chat::start(user, ChatTitle::from_stored("A"), Utc::now());
        let chat_id = chat.id;
        let mut chats = MockChatRepository::new();
        chats
            .expect_find_chat()
            .returning(move |_| Ok(Some(chat.clone())));
        chats.expect_list_messages().returning(move |id| {
            Ok(vec![Message::new(id, MessageRole::User, "hi", Utc::now())])
        });

        let messages = ChatHistoryService::new(Arc::new(chats))
            .list_messages(user, chat_id)
            .await
            .expect("messages listed");

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].chat_id, chat_id);
    }

    #[rstest]
    #[tokio::test]
    async fn list_messages_hides_foreign_chats() {
        let chat = Chat::start(UserId::random(), ChatTitle::from_stored("A"), Utc::now());
        let chat_id = chat.id;
        let mut chats = MockChatRepository::new();
        chats
            .expect_find_chat()
            .returning(move |_| Ok(Some(chat.clone())));
        chats.expect_list_messages().never();

        let err = ChatHistoryService::new(Arc::new(chats))
            .list_messages(UserId::random(), chat_id)
            .await
            .expect_err("foreign chat");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
