//! Headless chat session for the MindWeaver Saga story backend.
//!
//! A browser shell owns the DOM; this crate owns everything the shell
//! delegates to it: input validation, the story request flow, outcome
//! branching, chat bubble markup, and the sign-in panel state.
//!
//! # Example
//!
//! ```no_run
//! use mindweaver_chat::{ChatSession, HttpStoryApi, SubmitOutcome};
//!
//! # async fn demo() -> Result<(), mindweaver_chat::ApiBuildError> {
//! let mut session = ChatSession::new(HttpStoryApi::new("http://127.0.0.1:5000")?);
//! session.check_auth_status().await;
//! session.set_input("I am nervous about my exam");
//! if let SubmitOutcome::Story = session.submit().await {
//!     let fragment = session.render();
//!     assert!(fragment.contains("message-slide-in"));
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod markup;
mod model;
mod session;

pub use api::{
    ApiBuildError, ApiError, DEFAULT_BASE_URL, GenerateStoryRequest, HttpStoryApi, StoryApi,
    StoryResponse, classify_auth_status, classify_story_response,
};
pub use markup::{escape_html, render_bubble, render_transcript};
pub use model::{AuthPanel, Bubble, StoryReply, UserInput, UserProfile};
pub use session::{ChatSession, EMPTY_INPUT_NOTIFICATION, NO_STORY_MESSAGE, SubmitOutcome};
