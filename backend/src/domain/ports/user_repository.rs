//! Driven port for user persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{GoogleProfile, GoogleSubject, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } => "user repository conflict: {message}",
    }
}

/// Port for storing users keyed by their Google account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by Google subject.
    async fn find_by_google_subject(
        &self,
        subject: &GoogleSubject,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Create the user for `profile`, or refresh the email, name, and
    /// picture of the existing one. Returns the stored user.
    async fn upsert_google_user(
        &self,
        profile: &GoogleProfile,
        now: DateTime<Utc>,
    ) -> Result<User, UserPersistenceError>;
}
