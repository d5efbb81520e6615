//! Chat session state machine driven by the browser shell.

use tracing::{info, warn};

use crate::api::{GenerateStoryRequest, StoryApi, StoryResponse};
use crate::markup::render_transcript;
use crate::model::{AuthPanel, Bubble, UserInput};

/// Notification shown when the user submits blank input.
pub const EMPTY_INPUT_NOTIFICATION: &str = "Please enter your emotions or story choice!";

/// Error shown when a success reply carries neither a story nor an error.
pub const NO_STORY_MESSAGE: &str = "No story received from the server";

/// Result of [`ChatSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent; the shell should show the notification.
    EmptyInput {
        /// Text for the notification toast.
        notification: &'static str,
    },
    /// A story bubble was appended and the input cleared.
    Story,
    /// An error bubble was appended and the input kept.
    Failed,
}

/// One user's chat page.
///
/// `submit` takes `&mut self`, so a session never has two story requests in
/// flight.
pub struct ChatSession<A> {
    api: A,
    input: String,
    transcript: Vec<Bubble>,
    loading: bool,
    auth: AuthPanel,
    chat_id: Option<String>,
}

impl<A: StoryApi> ChatSession<A> {
    /// Start a session showing the welcome bubble and the sign-in button.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            input: String::new(),
            transcript: vec![Bubble::Welcome],
            loading: false,
            auth: AuthPanel::SignIn,
            chat_id: None,
        }
    }

    /// Replace the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Current input buffer.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Transcript, oldest bubble first.
    #[must_use]
    pub fn transcript(&self) -> &[Bubble] {
        &self.transcript
    }

    /// Whether a story request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Header panel state.
    #[must_use]
    pub const fn auth_panel(&self) -> &AuthPanel {
        &self.auth
    }

    /// Chat the next submission continues, if any.
    #[must_use]
    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    fn push(&mut self, bubble: Bubble) {
        self.transcript.retain(|existing| *existing != Bubble::Welcome);
        self.transcript.push(bubble);
    }

    fn remove_loading(&mut self) {
        self.transcript.retain(|existing| *existing != Bubble::Loading);
    }

    fn connect_failure(&self) -> String {
        format!(
            "Failed to connect to the server. Please make sure the backend is running on {}",
            self.api.base_url()
        )
    }

    /// Send the trimmed input to the backend and append the outcome.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(input) = UserInput::parse(&self.input) else {
            return SubmitOutcome::EmptyInput {
                notification: EMPTY_INPUT_NOTIFICATION,
            };
        };

        self.push(Bubble::User(input.as_str().to_owned()));
        self.loading = true;
        self.push(Bubble::Loading);

        let request = GenerateStoryRequest {
            user_input: input.into_inner(),
            chat_id: self.chat_id.clone(),
        };
        let response = self.api.generate_story(&request).await;
        self.remove_loading();

        let outcome = match response {
            Ok(StoryResponse::Story(reply)) => {
                self.push(Bubble::Story(reply.story));
                if reply.chat_id.is_some() {
                    self.chat_id = reply.chat_id;
                }
                self.input.clear();
                SubmitOutcome::Story
            }
            Ok(StoryResponse::ServerError(message)) => {
                self.push(Bubble::Error(message));
                SubmitOutcome::Failed
            }
            Ok(StoryResponse::HttpStatus(status)) => {
                self.push(Bubble::Error(format!("HTTP error! status: {status}")));
                SubmitOutcome::Failed
            }
            Ok(StoryResponse::Empty) => {
                self.push(Bubble::Error(NO_STORY_MESSAGE.to_owned()));
                SubmitOutcome::Failed
            }
            Err(err) => {
                warn!(error = %err, "story request failed");
                let message = self.connect_failure();
                self.push(Bubble::Error(message));
                SubmitOutcome::Failed
            }
        };
        self.loading = false;
        outcome
    }

    /// Ask the backend who is signed in and update the panel.
    pub async fn check_auth_status(&mut self) -> &AuthPanel {
        self.auth = match self.api.auth_status().await {
            Ok(Some(profile)) => AuthPanel::Profile(profile),
            Ok(None) => AuthPanel::SignIn,
            Err(err) => {
                info!(error = %err, "auth status unavailable; treating as signed out");
                AuthPanel::SignIn
            }
        };
        &self.auth
    }

    /// Address the sign-in button navigates to.
    #[must_use]
    pub fn sign_in_url(&self) -> String {
        format!("{}/auth/google", self.api.base_url())
    }

    /// Clear the backend session, show the sign-in button, and start over.
    pub async fn sign_out(&mut self) {
        if let Err(err) = self.api.sign_out().await {
            warn!(error = %err, "sign-out request failed");
        }
        self.auth = AuthPanel::SignIn;
        self.start_new_chat();
    }

    /// Forget the current chat and reset the transcript.
    pub fn start_new_chat(&mut self) {
        self.chat_id = None;
        self.transcript = vec![Bubble::Welcome];
        self.input.clear();
    }

    /// Transcript as an HTML fragment.
    #[must_use]
    pub fn render(&self) -> String {
        render_transcript(&self.transcript)
    }
}
