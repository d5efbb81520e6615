//! Wire types for the token and userinfo endpoints.

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::{DisplayName, EmailAddress, GoogleProfile, GoogleSubject};

#[derive(Deserialize)]
pub(super) struct TokenResponseDto {
    pub(super) access_token: Option<String>,
    pub(super) error: Option<String>,
    pub(super) error_description: Option<String>,
}

impl TokenResponseDto {
    pub(super) fn into_access_token(self) -> Result<Zeroizing<String>, String> {
        match self.access_token {
            Some(token) if !token.trim().is_empty() => Ok(Zeroizing::new(token)),
            _ => Err(self
                .error_description
                .or(self.error)
                .unwrap_or_else(|| "token response carried no access_token".to_owned())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UserInfoDto {
    pub(super) id: String,
    pub(super) email: String,
    pub(super) name: Option<String>,
    pub(super) picture: Option<String>,
}

impl UserInfoDto {
    /// Map into a domain profile. Accounts without a name fall back to the
    /// email address.
    pub(super) fn into_profile(self) -> Result<GoogleProfile, String> {
        let email = EmailAddress::new(&self.email).map_err(|err| err.to_string())?;
        let name = match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => email.to_string(),
        };
        Ok(GoogleProfile {
            subject: GoogleSubject::new(self.id).map_err(|err| err.to_string())?,
            email,
            name: DisplayName::new(name).map_err(|err| err.to_string())?,
            picture_url: self.picture.filter(|url| !url.trim().is_empty()),
        })
    }
}
