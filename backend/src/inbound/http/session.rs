//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting the signed-in profile or the
//! single-use OAuth `state` nonce.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, SessionUser};

pub(crate) const USER_KEY: &str = "user";
pub(crate) const OAUTH_STATE_KEY: &str = "oauth_state";

/// Message returned when a protected endpoint is called without a session.
pub const AUTHENTICATION_REQUIRED: &str = "Authentication required";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the signed-in profile in the session cookie.
    pub fn persist_user(&self, user: &SessionUser) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_KEY, user)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the signed-in profile, if present.
    ///
    /// A cookie that no longer decodes into a profile is treated as signed
    /// out rather than as a server failure.
    pub fn user(&self) -> Result<Option<SessionUser>, Error> {
        match self.0.get::<SessionUser>(USER_KEY) {
            Ok(user) => Ok(user),
            Err(error) => {
                tracing::warn!(%error, "discarding unreadable session profile");
                self.0.remove(USER_KEY);
                Ok(None)
            }
        }
    }

    /// Require a signed-in profile or return `401 Unauthorized`.
    pub fn require_user(&self) -> Result<SessionUser, Error> {
        self.user()?
            .ok_or_else(|| Error::unauthorized(AUTHENTICATION_REQUIRED))
    }

    /// Remember the OAuth `state` nonce issued with the consent redirect.
    pub fn persist_oauth_state(&self, state: &str) -> Result<(), Error> {
        self.0
            .insert(OAUTH_STATE_KEY, state)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Remove and return the pending OAuth `state` nonce.
    pub fn take_oauth_state(&self) -> Option<String> {
        match self.0.remove_as::<String>(OAUTH_STATE_KEY) {
            Some(Ok(state)) => Some(state),
            Some(Err(raw)) => {
                tracing::warn!(raw_len = raw.len(), "discarding malformed oauth state");
                None
            }
            None => None,
        }
    }

    /// Drop every value and instruct the client to delete the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
