//! Reqwest-backed Google OAuth provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{TokenResponseDto, UserInfoDto};
use crate::domain::GoogleProfile;
use crate::domain::ports::{GoogleIdentityProvider, IdentityProviderError};
use crate::outbound::http_support::status_message;

/// Google consent screen.
pub const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/auth";
/// Authorization-code exchange endpoint.
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
/// Profile lookup endpoint.
pub const GOOGLE_USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
/// Scopes requested at consent.
pub const OAUTH_SCOPE: &str = "openid email profile";

/// Client credentials registered with Google.
pub struct GoogleOAuthSettings {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: Zeroizing<String>,
    /// Callback URL registered for the client.
    pub redirect_uri: String,
    /// Whole-request timeout for token and userinfo calls.
    pub timeout: Duration,
}

/// Endpoint overrides, mainly for pointing at a local stub.
#[derive(Debug, Clone)]
pub struct GoogleOAuthEndpoints {
    /// Consent screen URL.
    pub auth: String,
    /// Token exchange URL.
    pub token: String,
    /// Userinfo URL.
    pub userinfo: String,
}

impl Default for GoogleOAuthEndpoints {
    fn default() -> Self {
        Self {
            auth: GOOGLE_AUTH_ENDPOINT.to_owned(),
            token: GOOGLE_TOKEN_ENDPOINT.to_owned(),
            userinfo: GOOGLE_USERINFO_ENDPOINT.to_owned(),
        }
    }
}

/// Errors raised while building the provider.
#[derive(Debug, thiserror::Error)]
pub enum GoogleOAuthBuildError {
    /// One of the configured URLs failed to parse.
    #[error("invalid {field} url: {source}")]
    Url {
        /// Which setting was invalid.
        field: &'static str,
        /// Parser error.
        source: url::ParseError,
    },
    /// reqwest could not build a client.
    #[error("failed to build oauth http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Google adapter implementing [`GoogleIdentityProvider`].
pub struct GoogleOAuthProvider {
    client: Client,
    client_id: String,
    client_secret: Zeroizing<String>,
    redirect_uri: Url,
    auth_endpoint: Url,
    token_endpoint: Url,
    userinfo_endpoint: Url,
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, GoogleOAuthBuildError> {
    Url::parse(raw).map_err(|source| GoogleOAuthBuildError::Url { field, source })
}

impl GoogleOAuthProvider {
    /// Build a provider against Google's public endpoints.
    ///
    /// # Errors
    ///
    /// Fails when the redirect URI is malformed or the client cannot be built.
    pub fn new(settings: GoogleOAuthSettings) -> Result<Self, GoogleOAuthBuildError> {
        Self::with_endpoints(settings, GoogleOAuthEndpoints::default())
    }

    /// Build a provider against explicit endpoints.
    ///
    /// # Errors
    ///
    /// Fails when any URL is malformed or the client cannot be built.
    pub fn with_endpoints(
        settings: GoogleOAuthSettings,
        endpoints: GoogleOAuthEndpoints,
    ) -> Result<Self, GoogleOAuthBuildError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            client_id: settings.client_id,
            client_secret: settings.client_secret,
            redirect_uri: parse_url("redirect_uri", &settings.redirect_uri)?,
            auth_endpoint: parse_url("auth endpoint", &endpoints.auth)?,
            token_endpoint: parse_url("token endpoint", &endpoints.token)?,
            userinfo_endpoint: parse_url("userinfo endpoint", &endpoints.userinfo)?,
        })
    }

    fn consent_url(&self, state: &str) -> Url {
        let mut url = self.auth_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", self.redirect_uri.as_str())
            .append_pair("response_type", "code")
            .append_pair("scope", OAUTH_SCOPE)
            .append_pair("state", state);
        url
    }

    async fn fetch_access_token(
        &self,
        code: &str,
    ) -> Result<Zeroizing<String>, IdentityProviderError> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        let response = self
            .client
            .post(self.token_endpoint.clone())
            .form(&form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), "google token endpoint responded");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_token(body.as_ref())
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<GoogleProfile, IdentityProviderError> {
        let response = self
            .client
            .get(self.userinfo_endpoint.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_profile(body.as_ref())
    }
}

#[async_trait]
impl GoogleIdentityProvider for GoogleOAuthProvider {
    fn authorization_url(&self, state: &str) -> Result<String, IdentityProviderError> {
        Ok(self.consent_url(state).into())
    }

    async fn exchange_code(&self, code: &str) -> Result<GoogleProfile, IdentityProviderError> {
        let token = self.fetch_access_token(code).await?;
        self.fetch_profile(token.as_str()).await
    }
}

fn parse_token(body: &[u8]) -> Result<Zeroizing<String>, IdentityProviderError> {
    let decoded: TokenResponseDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid token payload: {error}"))
    })?;
    decoded
        .into_access_token()
        .map_err(IdentityProviderError::rejected)
}

fn parse_profile(body: &[u8]) -> Result<GoogleProfile, IdentityProviderError> {
    let decoded: UserInfoDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid userinfo payload: {error}"))
    })?;
    decoded
        .into_profile()
        .map_err(IdentityProviderError::decode)
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    if error.is_timeout() {
        IdentityProviderError::timeout(error.to_string())
    } else {
        IdentityProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let message = status_message(status, body);
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IdentityProviderError::timeout(message)
        }
        _ if status.is_client_error() => IdentityProviderError::rejected(message),
        _ => IdentityProviderError::transport(message),
    }
}
