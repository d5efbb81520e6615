//! Story generation handler.
//!
//! ```text
//! POST /generate-story {"user_input":"I feel stuck","chat_id":null}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::story_service::CHAT_NOT_FOUND_MESSAGE;
use crate::domain::{ChatId, Error, StoryOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /generate-story`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GenerateStoryRequest {
    /// Emotion or story choice typed by the user.
    #[serde(default)]
    #[schema(example = "I feel overwhelmed by exams")]
    pub user_input: String,
    /// Chat to continue; omitted to start a new one.
    #[serde(default)]
    #[schema(example = "8d7f1c9e-2b1a-4c55-9b7e-3f9d2a6c1e04")]
    pub chat_id: Option<String>,
}

/// Response body for `POST /generate-story`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct GenerateStoryResponse {
    pub story: String,
    #[schema(value_type = String, format = Uuid)]
    pub chat_id: ChatId,
}

impl From<StoryOutcome> for GenerateStoryResponse {
    fn from(value: StoryOutcome) -> Self {
        Self {
            story: value.story,
            chat_id: value.chat_id,
        }
    }
}

/// Unknown or malformed chat ids are indistinguishable from chats owned by
/// someone else.
fn parse_chat_id(raw: Option<&str>) -> ApiResult<Option<ChatId>> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<ChatId>()
            .map(Some)
            .map_err(|_| Error::not_found(CHAT_NOT_FOUND_MESSAGE)),
    }
}

/// Generate the next story passage, starting a chat when none is given.
#[utoipa::path(
    post,
    path = "/generate-story",
    request_body = GenerateStoryRequest,
    responses(
        (status = 200, description = "Story generated", body = GenerateStoryResponse),
        (status = 400, description = "Missing or oversized input", body = ErrorSchema),
        (status = 401, description = "Authentication required", body = ErrorSchema),
        (status = 404, description = "Chat not found", body = ErrorSchema),
        (status = 503, description = "Story model or database unavailable", body = ErrorSchema)
    ),
    tags = ["stories"],
    operation_id = "generateStory"
)]
#[post("/generate-story")]
pub async fn generate_story(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<GenerateStoryRequest>,
) -> ApiResult<web::Json<GenerateStoryResponse>> {
    let user = session.require_user()?;
    let GenerateStoryRequest {
        user_input,
        chat_id,
    } = payload.into_inner();
    let chat_id = parse_chat_id(chat_id.as_deref())?;
    debug!(user_id = %user.id, continuing = chat_id.is_some(), "story requested");

    let outcome = state
        .story
        .generate_story(user.id, &user_input, chat_id)
        .await?;
    Ok(web::Json(outcome.into()))
}
