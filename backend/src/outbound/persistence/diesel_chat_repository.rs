//! PostgreSQL-backed `ChatRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{ChatPersistenceError, ChatRepository};
use crate::domain::{Chat, ChatId, ChatTitle, Message, MessageId, MessageRole, UserId};

use super::diesel_error_mapping::{ErrorConstructors, map_diesel_error};
use super::models::{ChatRow, MessageRow, NewChatRow, NewMessageRow};
use super::pool::{DbPool, PoolError};
use super::schema::{chats, messages};

fn query_error(message: &'static str) -> ChatPersistenceError {
    ChatPersistenceError::query(message)
}

fn connection_error(message: &'static str) -> ChatPersistenceError {
    ChatPersistenceError::connection(message)
}

// Chats have no unique columns besides the key, so a conflict is a query bug.
const ERRORS: ErrorConstructors<ChatPersistenceError> = ErrorConstructors {
    query: query_error,
    connection: connection_error,
    conflict: query_error,
};

/// Diesel-backed implementation of [`ChatRepository`].
#[derive(Clone)]
pub struct DieselChatRepository {
    pool: DbPool,
}

impl DieselChatRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ChatPersistenceError {
    ChatPersistenceError::connection(error.into_message())
}

fn map_error(error: diesel::result::Error) -> ChatPersistenceError {
    map_diesel_error(error, &ERRORS)
}

fn row_to_chat(row: ChatRow) -> Chat {
    Chat {
        id: ChatId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        title: row.title.map(ChatTitle::from_stored),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn row_to_message(row: MessageRow) -> Result<Message, ChatPersistenceError> {
    let role: MessageRole = row.role.parse().map_err(|err| {
        warn!(message_id = %row.id, "unrecognised message role in storage");
        ChatPersistenceError::query(format!("invalid stored message: {err}"))
    })?;
    Ok(Message {
        id: MessageId::from_uuid(row.id),
        chat_id: ChatId::from_uuid(row.chat_id),
        role,
        content: row.content,
        created_at: row.created_at,
    })
}

fn clamp_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl ChatRepository for DieselChatRepository {
    async fn create_chat(&self, chat: &Chat) -> Result<(), ChatPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewChatRow {
            id: *chat.id.as_uuid(),
            user_id: *chat.user_id.as_uuid(),
            title: chat.title.as_ref().map(AsRef::as_ref),
            created_at: chat.created_at,
            updated_at: chat.updated_at,
        };
        diesel::insert_into(chats::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_chat(&self, id: ChatId) -> Result<Option<Chat>, ChatPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = chats::table
            .find(id.as_uuid())
            .select(ChatRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        Ok(row.map(row_to_chat))
    }

    async fn list_recent_chats(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Chat>, ChatPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = chats::table
            .filter(chats::user_id.eq(user_id.as_uuid()))
            .order((chats::updated_at.desc(), chats::id.desc()))
            .limit(clamp_limit(limit))
            .select(ChatRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().map(row_to_chat).collect())
    }

    async fn append_message(&self, message: &Message) -> Result<(), ChatPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewMessageRow {
            id: *message.id.as_uuid(),
            chat_id: *message.chat_id.as_uuid(),
            role: message.role.as_str(),
            content: message.content.as_str(),
            created_at: message.created_at,
        };
        let chat_id = *message.chat_id.as_uuid();
        let touched_at = message.created_at;

        let chat_exists = conn
            .transaction(|conn| {
                async move {
                    let touched = diesel::update(chats::table.find(chat_id))
                        .set(chats::updated_at.eq(touched_at))
                        .execute(conn)
                        .await?;
                    if touched == 0 {
                        return Ok::<_, diesel::result::Error>(false);
                    }
                    diesel::insert_into(messages::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;

        if chat_exists {
            Ok(())
        } else {
            Err(ChatPersistenceError::missing_chat(message.chat_id.to_string()))
        }
    }

    async fn list_messages(&self, chat_id: ChatId) -> Result<Vec<Message>, ChatPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = messages::table
            .filter(messages::chat_id.eq(chat_id.as_uuid()))
            .order((messages::created_at.asc(), messages::seq.asc()))
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(row_to_message).collect()
    }
}
