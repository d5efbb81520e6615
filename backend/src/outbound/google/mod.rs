//! Google OAuth adapter.
//!
//! Implements the `GoogleIdentityProvider` port: consent URL construction,
//! the authorization-code exchange, and the userinfo lookup.

mod dto;
mod oauth_provider;

pub use oauth_provider::{
    GOOGLE_AUTH_ENDPOINT, GOOGLE_TOKEN_ENDPOINT, GOOGLE_USERINFO_ENDPOINT, GoogleOAuthBuildError,
    GoogleOAuthEndpoints, GoogleOAuthProvider, GoogleOAuthSettings, OAUTH_SCOPE,
};
