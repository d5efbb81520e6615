//! Driving port for Google sign-in.

use async_trait::async_trait;

use crate::domain::{Error, SessionUser};

/// Use-case port behind the `/auth/google` endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoogleSignIn: Send + Sync {
    /// Consent URL the browser is redirected to.
    fn authorization_url(&self, state: &str) -> Result<String, Error>;

    /// Complete the flow for `code` and return the session identity.
    async fn complete_sign_in(&self, code: &str) -> Result<SessionUser, Error>;
}
