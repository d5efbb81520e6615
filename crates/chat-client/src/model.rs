//! Values exchanged between the session, the API port, and the markup.

use serde::Deserialize;

/// Text typed by the user, trimmed before it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput(String);

impl UserInput {
    /// Trim `raw`, returning `None` when nothing is left.
    ///
    /// # Examples
    /// ```
    /// use mindweaver_chat::UserInput;
    ///
    /// assert!(UserInput::parse("   ").is_none());
    /// assert_eq!(UserInput::parse("  hi \n").map(|input| input.into_inner()), Some("hi".into()));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Borrow the trimmed text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the trimmed text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Successful `POST /generate-story` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoryReply {
    /// Generated story text.
    pub story: String,
    /// Chat the story was recorded in.
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// Signed-in profile reported by `GET /auth/status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    /// Backend user identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar URL, when Google supplied one.
    #[serde(default)]
    pub picture: Option<String>,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bubble {
    /// Greeting shown while the transcript is otherwise empty.
    Welcome,
    /// Text the user submitted.
    User(String),
    /// Placeholder shown while a request is outstanding.
    Loading,
    /// Story returned by the backend.
    Story(String),
    /// Failure shown in place of a story.
    Error(String),
}

/// Header panel state: exactly one of the two is ever visible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthPanel {
    /// The Google sign-in button.
    #[default]
    SignIn,
    /// The signed-in user's profile card.
    Profile(UserProfile),
}
