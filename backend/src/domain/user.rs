//! User identity model.
//!
//! Users are created on first Google sign-in and keyed by Google's stable
//! subject identifier. The session cookie carries a [`SessionUser`] snapshot
//! so authenticated requests avoid a database round trip.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum allowed length for a display name, in characters.
pub const DISPLAY_NAME_MAX: usize = 255;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The user identifier was empty.
    EmptyId,
    /// The user identifier was not a UUID.
    InvalidId,
    /// The Google subject was blank.
    EmptySubject,
    /// The email address was blank.
    EmptyEmail,
    /// The email address had no `@`.
    InvalidEmail,
    /// The display name was blank.
    EmptyDisplayName,
    /// The display name exceeded [`DISPLAY_NAME_MAX`].
    DisplayNameTooLong {
        /// Maximum permitted characters.
        max: usize,
    },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptySubject => write!(f, "google subject must not be empty"),
            Self::EmptyEmail => write!(f, "email address must not be empty"),
            Self::InvalidEmail => write!(f, "email address must contain '@'"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, typically one read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Google's stable account identifier (`id` in the userinfo payload).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GoogleSubject(String);

impl GoogleSubject {
    /// Validate and construct a [`GoogleSubject`].
    pub fn new(subject: impl Into<String>) -> Result<Self, UserValidationError> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            return Err(UserValidationError::EmptySubject);
        }
        Ok(Self(subject))
    }
}

impl AsRef<str> for GoogleSubject {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Normalised email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim and validate an email address.
    ///
    /// Only the presence of `@` is checked; Google has already verified the
    /// address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let email = email.as_ref().trim();
        if email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Trim and validate a display name.
    pub fn new(display_name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let display_name = display_name.as_ref().trim();
        if display_name.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if display_name.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(display_name.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Profile returned by Google after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleProfile {
    /// Google account identifier.
    pub subject: GoogleSubject,
    /// Primary email address.
    pub email: EmailAddress,
    /// Full name as shown by Google.
    pub name: DisplayName,
    /// Avatar URL, when the account has one.
    pub picture_url: Option<String>,
}

/// Application user.
///
/// ## Invariants
/// - `google_subject` is unique across users.
/// - `email` is unique across users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    google_subject: GoogleSubject,
    email: EmailAddress,
    name: DisplayName,
    picture_url: Option<String>,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(
        id: UserId,
        google_subject: GoogleSubject,
        email: EmailAddress,
        name: DisplayName,
        picture_url: Option<String>,
    ) -> Self {
        Self {
            id,
            google_subject,
            email,
            name,
            picture_url,
        }
    }

    /// Create a fresh user from a Google profile.
    pub fn from_profile(id: UserId, profile: GoogleProfile) -> Self {
        let GoogleProfile {
            subject,
            email,
            name,
            picture_url,
        } = profile;
        Self::new(id, subject, email, name, picture_url)
    }

    /// Replace the mutable profile fields with the latest values from Google.
    pub fn refresh_profile(&mut self, profile: GoogleProfile) {
        self.email = profile.email;
        self.name = profile.name;
        self.picture_url = profile.picture_url;
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Google account identifier.
    pub fn google_subject(&self) -> &GoogleSubject {
        &self.google_subject
    }

    /// Email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Avatar URL.
    pub fn picture_url(&self) -> Option<&str> {
        self.picture_url.as_deref()
    }
}

/// Authenticated identity stored in the session cookie.
///
/// The field names form the `user` object returned by `GET /auth/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// User identifier.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    #[serde(default)]
    pub picture: Option<String>,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            email: user.email().to_string(),
            name: user.name().to_string(),
            picture: user.picture_url().map(str::to_owned),
        }
    }
}
