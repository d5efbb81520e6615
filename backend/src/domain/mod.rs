//! Domain primitives, aggregates, ports, and services.
//!
//! Types here are transport agnostic. Validation happens at construction so
//! adapters can only hand well-formed values to services.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: failure payload shared by every adapter.
//! - [`User`], [`SessionUser`], [`GoogleProfile`]: identity types.
//! - [`Chat`], [`Message`]: persisted conversation history.
//! - [`StoryInput`] and [`story_prompt`]: story request validation and
//!   prompt construction.
//! - Services implementing the driving ports in [`ports`].

pub mod chat;
pub mod chat_history_service;
pub mod error;
pub mod ports;
pub mod sign_in_service;
pub mod story;
pub mod story_service;
pub mod trace_id;
pub mod user;

pub use self::chat::{
    Chat, ChatId, ChatTitle, Message, MessageId, MessageRole, RECENT_CHATS_LIMIT,
};
pub use self::chat_history_service::ChatHistoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::sign_in_service::GoogleSignInService;
pub use self::story::{StoryInput, StoryOutcome, StoryValidationError, story_prompt};
pub use self::story_service::StoryService;
pub use self::trace_id::TraceId;
pub use self::user::{
    DisplayName, EmailAddress, GoogleProfile, GoogleSubject, SessionUser, User, UserId,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use mindweaver::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
