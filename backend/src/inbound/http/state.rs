//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ChatHistoryQuery, GoogleSignIn, StoryCommand};

/// Parameter object bundling the driving ports used by HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub story: Arc<dyn StoryCommand>,
    pub chats: Arc<dyn ChatHistoryQuery>,
    pub sign_in: Arc<dyn GoogleSignIn>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub story: Arc<dyn StoryCommand>,
    pub chats: Arc<dyn ChatHistoryQuery>,
    pub sign_in: Arc<dyn GoogleSignIn>,
    /// Page the OAuth callback redirects to once sign-in completes.
    pub frontend_url: Arc<str>,
}

impl HttpState {
    /// Construct state from a ports bundle and the post-sign-in landing page.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mindweaver::domain::ports::{ChatHistoryQuery, GoogleSignIn, StoryCommand};
    /// use mindweaver::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// fn build(
    ///     story: Arc<dyn StoryCommand>,
    ///     chats: Arc<dyn ChatHistoryQuery>,
    ///     sign_in: Arc<dyn GoogleSignIn>,
    /// ) -> HttpState {
    ///     HttpState::new(
    ///         HttpStatePorts { story, chats, sign_in },
    ///         "http://127.0.0.1:5500/index.html",
    ///     )
    /// }
    /// ```
    pub fn new(ports: HttpStatePorts, frontend_url: impl Into<Arc<str>>) -> Self {
        let HttpStatePorts {
            story,
            chats,
            sign_in,
        } = ports;
        Self {
            story,
            chats,
            sign_in,
            frontend_url: frontend_url.into(),
        }
    }
}
