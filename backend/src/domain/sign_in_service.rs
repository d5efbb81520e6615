//! Google sign-in service.
//!
//! Completes the authorization-code flow through [`GoogleIdentityProvider`]
//! and upserts the user so email, name, and picture track Google's latest
//! values.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    GoogleIdentityProvider, GoogleSignIn, IdentityProviderError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{Error, SessionUser};

/// Sign-in service implementing the [`GoogleSignIn`] driving port.
#[derive(Clone)]
pub struct GoogleSignInService<P: ?Sized, U: ?Sized> {
    provider: Arc<P>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<P: ?Sized, U: ?Sized> GoogleSignInService<P, U> {
    /// Create a service over the given adapters.
    pub fn new(provider: Arc<P>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            users,
            clock,
        }
    }
}

fn map_provider_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::NotConfigured => {
            Error::service_unavailable("Google sign-in is not configured")
        }
        IdentityProviderError::Rejected { message } => {
            warn!(%message, "google rejected authorization code");
            Error::unauthorized("Google sign-in failed")
        }
        other => {
            warn!(error = %other, "identity provider unavailable");
            Error::service_unavailable("Google sign-in is temporarily unavailable")
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Conflict { message } => {
            Error::conflict(format!("account already linked: {message}"))
        }
    }
}

#[async_trait]
impl<P: ?Sized, U: ?Sized> GoogleSignIn for GoogleSignInService<P, U>
where
    P: GoogleIdentityProvider,
    U: UserRepository,
{
    fn authorization_url(&self, state: &str) -> Result<String, Error> {
        self.provider
            .authorization_url(state)
            .map_err(map_provider_error)
    }

    async fn complete_sign_in(&self, code: &str) -> Result<SessionUser, Error> {
        if code.trim().is_empty() {
            return Err(Error::invalid_request("Missing authorization code"));
        }
        let profile = self
            .provider
            .exchange_code(code)
            .await
            .map_err(map_provider_error)?;
        let user = self
            .users
            .upsert_google_user(&profile, self.clock.utc())
            .await
            .map_err(map_user_error)?;
        info!(user_id = %user.id(), "user signed in");
        Ok(SessionUser::from(&user))
    }
}
