//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::SessionUser;
use crate::domain::UserId;
use crate::domain::ports::{MockChatHistoryQuery, MockGoogleSignIn, MockStoryCommand};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Landing page used by test state.
pub const TEST_FRONTEND_URL: &str = "http://127.0.0.1:5500/index.html";

/// Path of the helper route that signs in [`session_user`].
pub const SEED_SESSION_PATH: &str = "/test/sign-in";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}

/// Profile stored by [`seed_session`].
pub fn session_user() -> SessionUser {
    SessionUser {
        id: UserId::from_uuid(Uuid::from_u128(0x3fa8_5f64_5717_4562_b3fc_2c96_3f66_afa6)),
        email: "ada@example.com".to_owned(),
        name: "Ada Lovelace".to_owned(),
        picture: Some("https://example.com/ada.png".to_owned()),
    }
}

/// Handler mounted at [`SEED_SESSION_PATH`] that signs in [`session_user`].
pub async fn seed_session(session: SessionContext) -> ApiResult<HttpResponse> {
    session.persist_user(&session_user())?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mock driving ports; tests set expectations before building state.
#[derive(Default)]
pub struct MockPorts {
    pub story: MockStoryCommand,
    pub chats: MockChatHistoryQuery,
    pub sign_in: MockGoogleSignIn,
}

impl MockPorts {
    /// Wrap the mocks into handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            HttpStatePorts {
                story: Arc::new(self.story),
                chats: Arc::new(self.chats),
                sign_in: Arc::new(self.sign_in),
            },
            TEST_FRONTEND_URL,
        ))
    }
}
