//! Chat history handlers.
//!
//! ```text
//! GET /chats
//! GET /chats/{chat_id}/messages
//! ```

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::story_service::CHAT_NOT_FOUND_MESSAGE;
use crate::domain::{Chat, ChatId, Error, Message, MessageId, MessageRole};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// One entry of `GET /chats`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ChatSummary {
    #[schema(value_type = String, format = Uuid)]
    pub id: ChatId,
    #[schema(example = "I feel overwhelmed by exams")]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Chat> for ChatSummary {
    fn from(value: Chat) -> Self {
        Self {
            id: value.id,
            title: value.title.map(|title| title.as_ref().to_owned()),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// One entry of `GET /chats/{chat_id}/messages`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageView {
    #[schema(value_type = String, format = Uuid)]
    pub id: MessageId,
    #[schema(value_type = String, example = "assistant")]
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageView {
    fn from(value: Message) -> Self {
        Self {
            id: value.id,
            role: value.role,
            content: value.content,
            created_at: value.created_at,
        }
    }
}

/// List the caller's most recently updated chats.
#[utoipa::path(
    get,
    path = "/chats",
    responses(
        (status = 200, description = "Recent chats, newest first", body = [ChatSummary]),
        (status = 401, description = "Authentication required", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["chats"],
    operation_id = "listChats"
)]
#[get("/chats")]
pub async fn list_chats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<ChatSummary>>> {
    let user = session.require_user()?;
    let chats = state.chats.list_chats(user.id).await?;
    Ok(web::Json(chats.into_iter().map(ChatSummary::from).collect()))
}

/// List one chat's messages, oldest first.
#[utoipa::path(
    get,
    path = "/chats/{chat_id}/messages",
    params(("chat_id" = String, Path, description = "Chat identifier")),
    responses(
        (status = 200, description = "Chat transcript", body = [MessageView]),
        (status = 401, description = "Authentication required", body = ErrorSchema),
        (status = 404, description = "Chat not found", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["chats"],
    operation_id = "listChatMessages"
)]
#[get("/chats/{chat_id}/messages")]
pub async fn list_chat_messages(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MessageView>>> {
    let user = session.require_user()?;
    let chat_id = path
        .into_inner()
        .parse::<ChatId>()
        .map_err(|_| Error::not_found(CHAT_NOT_FOUND_MESSAGE))?;
    let messages = state.chats.list_messages(user.id, chat_id).await?;
    Ok(web::Json(messages.into_iter().map(MessageView::from).collect()))
}
