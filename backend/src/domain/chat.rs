//! Chat history model.
//!
//! A chat groups the messages exchanged in one story session. Chats belong
//! to exactly one user; lookups by another user behave as if the chat did
//! not exist.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::story::StoryInput;
use super::user::UserId;

/// Number of chats returned by the recent-chats listing.
pub const RECENT_CHATS_LIMIT: usize = 10;

/// Characters of the first input kept in a chat title.
pub const CHAT_TITLE_PREFIX: usize = 50;

/// Chat identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(Uuid);

impl ChatId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ChatId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Short title derived from the input that opened a chat.
///
/// # Examples
/// ```
/// use mindweaver::domain::{ChatTitle, StoryInput};
///
/// let input = StoryInput::new("I feel lost").expect("valid input");
/// assert_eq!(ChatTitle::from_input(&input).as_ref(), "I feel lost");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTitle(String);

impl ChatTitle {
    /// Derive a title from the first story input.
    ///
    /// Inputs longer than [`CHAT_TITLE_PREFIX`] characters are cut at that
    /// many characters and suffixed with `...`.
    pub fn from_input(input: &StoryInput) -> Self {
        let text = input.as_ref();
        if text.chars().count() > CHAT_TITLE_PREFIX {
            let prefix: String = text.chars().take(CHAT_TITLE_PREFIX).collect();
            Self(format!("{prefix}..."))
        } else {
            Self(text.to_owned())
        }
    }

    /// Rehydrate a stored title.
    pub fn from_stored(title: impl Into<String>) -> Self {
        Self(title.into())
    }
}

impl AsRef<str> for ChatTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// A story session owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    /// Chat identifier.
    pub id: ChatId,
    /// Owner.
    pub user_id: UserId,
    /// Title derived from the opening input.
    pub title: Option<ChatTitle>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the most recent message.
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Start a new chat at `now`.
    pub fn start(user_id: UserId, title: ChatTitle, now: DateTime<Utc>) -> Self {
        Self {
            id: ChatId::random(),
            user_id,
            title: Some(title),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user_id` owns this chat.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Text typed by the user.
    User,
    /// Story produced by the model.
    Assistant,
}

impl MessageRole {
    /// Stored and serialised representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Error returned when parsing an unknown [`MessageRole`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown message role: {0}")]
pub struct UnknownMessageRole(pub String);

impl FromStr for MessageRole {
    type Err = UnknownMessageRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(UnknownMessageRole(other.to_owned())),
        }
    }
}

/// One entry in a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message identifier.
    pub id: MessageId,
    /// Owning chat.
    pub chat_id: ChatId,
    /// Author.
    pub role: MessageRole,
    /// Message body.
    pub content: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message at `now`.
    pub fn new(
        chat_id: ChatId,
        role: MessageRole,
        content: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::random(),
            chat_id,
            role,
            content: content.into(),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn input(text: &str) -> StoryInput {
        StoryInput::new(text).expect("valid input")
    }

    #[rstest]
    fn short_input_becomes_whole_title() {
        let title = ChatTitle::from_input(&input("I feel anxious about tomorrow"));
        assert_eq!(title.as_ref(), "I feel anxious about tomorrow");
    }

    #[rstest]
    fn fifty_characters_are_not_truncated() {
        let text = "x".repeat(CHAT_TITLE_PREFIX);
        let title = ChatTitle::from_input(&input(&text));
        assert_eq!(title.as_ref(), text);
    }

    #[rstest]
    fn long_input_is_truncated_with_ellipsis() {
        let text = "y".repeat(CHAT_TITLE_PREFIX + 1);
        let title = ChatTitle::from_input(&input(&text));
        assert_eq!(title.as_ref(), format!("{}...", "y".repeat(CHAT_TITLE_PREFIX)));
    }

    #[rstest]
    fn truncation_respects_multibyte_characters() {
        let text = "é".repeat(CHAT_TITLE_PREFIX + 5);
        let title = ChatTitle::from_input(&input(&text));
        assert_eq!(title.as_ref().chars().count(), CHAT_TITLE_PREFIX + 3);
    }

    #[rstest]
    #[case("user", MessageRole::User)]
    #[case("assistant", MessageRole::Assistant)]
    fn message_role_parses(#[case] raw: &str, #[case] expected: MessageRole) {
        assert_eq!(raw.parse::<MessageRole>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn message_role_rejects_unknown() {
        assert!("system".parse::<MessageRole>().is_err());
    }

    #[rstest]
    fn ownership_is_checked_by_user_id() {
        let owner = UserId::random();
        let chat = Chat::start(owner, ChatTitle::from_stored("t"), Utc::now());
        assert!(chat.is_owned_by(owner));
        assert!(!chat.is_owned_by(UserId::random()));
    }
}
