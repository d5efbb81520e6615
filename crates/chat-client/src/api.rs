//! Port for the story backend and its reqwest implementation.
//!
//! Response handling lives in [`classify_story_response`] and
//! [`classify_auth_status`] so it can be exercised without a server.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::model::{StoryReply, UserProfile};

/// Backend address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Body of `POST /generate-story`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateStoryRequest {
    /// Trimmed user text.
    pub user_input: String,
    /// Chat to continue; omitted when starting a new one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

/// How a story response should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryResponse {
    /// A story arrived.
    Story(StoryReply),
    /// The body carried an `error` message.
    ServerError(String),
    /// The backend answered with a non-success status.
    HttpStatus(u16),
    /// A success body with neither a story nor an error.
    Empty,
}

/// Failures talking to the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request to the story backend failed: {message}")]
    Transport {
        /// Underlying client error.
        message: String,
    },
    /// A success response could not be decoded.
    #[error("story backend returned an unreadable body: {message}")]
    Decode {
        /// Parser error.
        message: String,
    },
    /// The backend rejected the call.
    #[error("story backend returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
}

/// Failures building [`HttpStoryApi`].
#[derive(Debug, thiserror::Error)]
pub enum ApiBuildError {
    /// The base URL was blank.
    #[error("story backend base url must not be empty")]
    EmptyBaseUrl,
    /// reqwest could not build a client.
    #[error("failed to build story backend client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Calls the chat session makes against the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoryApi: Send + Sync {
    /// Backend root, without a trailing slash.
    fn base_url(&self) -> &str;

    /// Post user text and classify the reply.
    async fn generate_story(
        &self,
        request: &GenerateStoryRequest,
    ) -> Result<StoryResponse, ApiError>;

    /// Fetch the signed-in profile, `None` when signed out.
    async fn auth_status(&self) -> Result<Option<UserProfile>, ApiError>;

    /// Clear the backend session.
    async fn sign_out(&self) -> Result<(), ApiError>;
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// JavaScript truthiness, which the chat page used to branch on replies.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|field| is_truthy(field))
}

/// Classify a `POST /generate-story` response.
///
/// Non-success statuses win over the body. A success body is checked for a
/// truthy `error` first, then for a truthy `story`; `null`, `false`, `0` and
/// `""` count as absent.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when a success body is not JSON or its
/// `story` is not text.
///
/// # Examples
/// ```
/// use mindweaver_chat::{StoryResponse, classify_story_response};
///
/// let reply = classify_story_response(500, b"{}").expect("status only");
/// assert_eq!(reply, StoryResponse::HttpStatus(500));
/// ```
pub fn classify_story_response(status: u16, body: &[u8]) -> Result<StoryResponse, ApiError> {
    if !is_success(status) {
        return Ok(StoryResponse::HttpStatus(status));
    }
    let value: Value = serde_json::from_slice(body).map_err(|err| ApiError::Decode {
        message: err.to_string(),
    })?;
    if let Some(message) = truthy_field(&value, "error") {
        let message = match message {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        return Ok(StoryResponse::ServerError(message));
    }
    let story = match truthy_field(&value, "story") {
        None => return Ok(StoryResponse::Empty),
        Some(Value::String(text)) => text.clone(),
        Some(other) => {
            return Err(ApiError::Decode {
                message: format!("story is not text: {other}"),
            });
        }
    };
    let chat_id = value
        .get("chat_id")
        .and_then(Value::as_str)
        .map(str::to_owned);
    Ok(StoryResponse::Story(StoryReply { story, chat_id }))
}

#[derive(Deserialize)]
struct AuthStatusBody {
    #[serde(default)]
    authenticated: bool,
    user: Option<UserProfile>,
}

/// Classify a `GET /auth/status` response into an optional profile.
///
/// Anything other than a success status carrying `authenticated: true` and a
/// well-formed `user` counts as signed out.
#[must_use]
pub fn classify_auth_status(status: u16, body: &[u8]) -> Option<UserProfile> {
    if !is_success(status) {
        return None;
    }
    match serde_json::from_slice::<AuthStatusBody>(body) {
        Ok(AuthStatusBody {
            authenticated: true,
            user,
        }) => user,
        Ok(_) => None,
        Err(err) => {
            debug!(error = %err, "auth status body was not understood");
            None
        }
    }
}

/// [`StoryApi`] over HTTP with a cookie store, so every call carries the
/// backend session.
#[derive(Debug, Clone)]
pub struct HttpStoryApi {
    client: Client,
    base_url: String,
}

impl HttpStoryApi {
    /// Build a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Fails when `base_url` is blank or the HTTP client cannot be built.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ApiBuildError> {
        let trimmed = base_url.as_ref().trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ApiBuildError::EmptyBaseUrl);
        }
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: trimmed.to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn transport(err: &reqwest::Error) -> ApiError {
    ApiError::Transport {
        message: err.to_string(),
    }
}

async fn status_and_body(response: reqwest::Response) -> Result<(u16, Vec<u8>), ApiError> {
    let status = response.status().as_u16();
    let body = response.bytes().await.map_err(|err| transport(&err))?;
    Ok((status, body.to_vec()))
}

#[async_trait]
impl StoryApi for HttpStoryApi {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn generate_story(
        &self,
        request: &GenerateStoryRequest,
    ) -> Result<StoryResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/generate-story"))
            .json(request)
            .send()
            .await
            .map_err(|err| transport(&err))?;
        let (status, body) = status_and_body(response).await?;
        classify_story_response(status, &body)
    }

    async fn auth_status(&self) -> Result<Option<UserProfile>, ApiError> {
        let response = self
            .client
            .get(self.url("/auth/status"))
            .send()
            .await
            .map_err(|err| transport(&err))?;
        let (status, body) = status_and_body(response).await?;
        Ok(classify_auth_status(status, &body))
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/auth/logout"))
            .send()
            .await
            .map_err(|err| transport(&err))?;
        let status = response.status().as_u16();
        if is_success(status) {
            Ok(())
        } else {
            Err(ApiError::Status { status })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn body(value: &Value) -> Vec<u8> {
        serde_json::to_vec(value).expect("encode body")
    }

    #[rstest]
    #[case(400)]
    #[case(401)]
    #[case(503)]
    fn error_statuses_ignore_the_body(#[case] status: u16) {
        let payload = body(&json!({ "story": "ignored" }));
        assert_eq!(
            classify_story_response(status, &payload),
            Ok(StoryResponse::HttpStatus(status))
        );
    }

    #[rstest]
    fn error_field_is_reported_verbatim() {
        let payload = body(&json!({ "error": "Model <busy>", "story": "ignored" }));
        assert_eq!(
            classify_story_response(200, &payload),
            Ok(StoryResponse::ServerError("Model <busy>".to_owned()))
        );
    }

    #[rstest]
    fn story_carries_the_chat_id() {
        let payload = body(&json!({ "story": "Once upon a time", "chat_id": "c-1" }));
        assert_eq!(
            classify_story_response(200, &payload),
            Ok(StoryResponse::Story(StoryReply {
                story: "Once upon a time".to_owned(),
                chat_id: Some("c-1".to_owned()),
            }))
        );
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "story": "" }))]
    #[case(json!({ "error": null, "story": null }))]
    #[case(json!({ "story": 0 }))]
    #[case(json!({ "error": false, "story": false }))]
    fn missing_story_is_empty(#[case] value: Value) {
        assert_eq!(
            classify_story_response(200, &body(&value)),
            Ok(StoryResponse::Empty)
        );
    }

    #[rstest]
    #[case(json!(0))]
    #[case(json!(""))]
    #[case(json!(null))]
    fn falsy_error_falls_through_to_the_story(#[case] error: Value) {
        let payload = body(&json!({ "error": error, "story": "x" }));
        assert_eq!(
            classify_story_response(200, &payload),
            Ok(StoryResponse::Story(StoryReply {
                story: "x".to_owned(),
                chat_id: None,
            }))
        );
    }

    #[rstest]
    #[case(json!(123))]
    #[case(json!(["a"]))]
    #[case(json!({ "text": "a" }))]
    fn non_text_story_is_a_decode_error(#[case] story: Value) {
        let result = classify_story_response(200, &body(&json!({ "story": story })));
        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }

    #[rstest]
    fn unreadable_success_body_is_a_decode_error() {
        let result = classify_story_response(200, b"<html>");
        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }

    #[rstest]
    fn signed_in_status_yields_profile() {
        let payload = body(&json!({
            "authenticated": true,
            "user": {
                "id": "u-1",
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "picture": "https://example.com/ada.png"
            }
        }));
        let profile = classify_auth_status(200, &payload).expect("profile");
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.picture.as_deref(), Some("https://example.com/ada.png"));
    }

    #[rstest]
    #[case(401, json!({ "authenticated": false }))]
    #[case(200, json!({ "authenticated": false }))]
    #[case(200, json!({ "authenticated": true, "user": { "name": "no id" } }))]
    #[case(500, json!({ "authenticated": true }))]
    fn anything_else_is_signed_out(#[case] status: u16, #[case] value: Value) {
        assert!(classify_auth_status(status, &body(&value)).is_none());
    }

    #[rstest]
    fn request_omits_absent_chat_id() {
        let request = GenerateStoryRequest {
            user_input: "hello".to_owned(),
            chat_id: None,
        };
        assert_eq!(
            serde_json::to_value(&request).expect("encode"),
            json!({ "user_input": "hello" })
        );
    }

    #[rstest]
    #[case("", false)]
    #[case("   ", false)]
    #[case("http://127.0.0.1:5000/", true)]
    fn base_url_is_validated_and_trimmed(#[case] raw: &str, #[case] ok: bool) {
        let api = HttpStoryApi::new(raw);
        assert_eq!(api.is_ok(), ok);
        if let Ok(api) = api {
            assert_eq!(api.base_url(), DEFAULT_BASE_URL);
        }
    }
}
