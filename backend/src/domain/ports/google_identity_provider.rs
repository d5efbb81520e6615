//! Driven port for Google's OAuth authorization-code flow.

use async_trait::async_trait;

use crate::domain::GoogleProfile;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while talking to the identity provider.
    pub enum IdentityProviderError {
        /// Client id, secret, or redirect URI is missing.
        NotConfigured => "google oauth is not configured",
        /// Network transport failed before receiving a response.
        Transport { message: String } => "identity provider transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "identity provider timed out: {message}",
        /// Google rejected the code or token.
        Rejected { message: String } => "identity provider rejected request: {message}",
        /// The response could not be decoded into a profile.
        Decode { message: String } => "identity provider response decode failed: {message}",
    }
}

/// Port for building consent URLs and exchanging authorization codes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoogleIdentityProvider: Send + Sync {
    /// Consent-screen URL carrying the CSRF `state`.
    fn authorization_url(&self, state: &str) -> Result<String, IdentityProviderError>;

    /// Exchange an authorization code for the signed-in user's profile.
    async fn exchange_code(&self, code: &str) -> Result<GoogleProfile, IdentityProviderError>;
}

/// Provider used when OAuth credentials are absent; every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredIdentityProvider;

#[async_trait]
impl GoogleIdentityProvider for UnconfiguredIdentityProvider {
    fn authorization_url(&self, _state: &str) -> Result<String, IdentityProviderError> {
        Err(IdentityProviderError::not_configured())
    }

    async fn exchange_code(&self, _code: &str) -> Result<GoogleProfile, IdentityProviderError> {
        Err(IdentityProviderError::not_configured())
    }
}
