//! Hand-written port doubles shared by the integration suites.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use mindweaver::domain::ports::{
    GoogleIdentityProvider, IdentityProviderError, StoryGenerator, StoryGeneratorError,
};
use mindweaver::domain::{DisplayName, EmailAddress, GoogleProfile, GoogleSubject};

pub const STORY_TEXT: &str = "Once upon a time, a small fox found the courage to try.";
pub const CONSENT_URL: &str = "https://accounts.example.test/consent";

/// Story model double that records prompts and can be switched off.
#[derive(Default)]
pub struct RecordingGenerator {
    prompts: Mutex<Vec<String>>,
    unavailable: AtomicBool,
}

impl RecordingGenerator {
    pub fn set_unavailable(&self) {
        self.unavailable.store(true, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .expect("prompt log lock")
            .clone()
    }
}

#[async_trait]
impl StoryGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, StoryGeneratorError> {
        self.prompts
            .lock()
            .expect("prompt log lock")
            .push(prompt.to_owned());
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoryGeneratorError::timeout("model did not answer"));
        }
        Ok(STORY_TEXT.to_owned())
    }
}

/// Identity provider double that maps each code to a fixed profile.
pub struct StaticIdentityProvider {
    email: String,
}

impl StaticIdentityProvider {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

#[async_trait]
impl GoogleIdentityProvider for StaticIdentityProvider {
    fn authorization_url(&self, state: &str) -> Result<String, IdentityProviderError> {
        Ok(format!("{CONSENT_URL}?state={state}"))
    }

    async fn exchange_code(&self, code: &str) -> Result<GoogleProfile, IdentityProviderError> {
        // `valid-code` signs in the default account; `valid-code:<email>` another one.
        let email = match code.strip_prefix("valid-code") {
            Some("") => self.email.as_str(),
            Some(rest) => rest
                .strip_prefix(':')
                .ok_or_else(|| IdentityProviderError::rejected("invalid_grant"))?,
            None => return Err(IdentityProviderError::rejected("invalid_grant")),
        };
        let local = email.split('@').next().unwrap_or("user");
        Ok(GoogleProfile {
            subject: GoogleSubject::new(format!("google-{local}"))
                .map_err(|err| IdentityProviderError::decode(err.to_string()))?,
            email: EmailAddress::new(email)
                .map_err(|err| IdentityProviderError::decode(err.to_string()))?,
            name: DisplayName::new(local)
                .map_err(|err| IdentityProviderError::decode(err.to_string()))?,
            picture_url: None,
        })
    }
}
