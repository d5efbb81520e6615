//! Google sign-in handlers.
//!
//! ```text
//! GET  /auth/google
//! GET  /auth/google/callback?code=...&state=...
//! GET  /auth/status
//! POST /auth/logout
//! ```

use actix_web::{HttpResponse, get, http::header, post, web};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, SessionUser};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const STATE_BYTES: usize = 32;

/// Message returned when the callback `state` does not match the session.
pub const INVALID_STATE_MESSAGE: &str = "Invalid OAuth state";
/// Message returned when Google reports that the user declined consent.
pub const CONSENT_DENIED_MESSAGE: &str = "Google sign-in was cancelled";
/// Message returned by `POST /auth/logout`.
pub const LOGGED_OUT_MESSAGE: &str = "Logged out successfully";

/// Query parameters Google appends to the callback redirect.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackQuery {
    /// Authorisation code to exchange for tokens.
    pub code: Option<String>,
    /// Nonce issued by `GET /auth/google`.
    pub state: Option<String>,
    /// Set instead of `code` when the user declines consent.
    pub error: Option<String>,
}

/// Body of `GET /auth/status`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthStatus {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<crate::inbound::http::schemas::SessionUserSchema>)]
    pub user: Option<SessionUser>,
}

/// Body of `POST /auth/logout`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    #[schema(example = "Logged out successfully")]
    pub message: String,
}

fn new_oauth_state() -> String {
    let mut bytes = [0_u8; STATE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn redirect_to(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Start Google sign-in by redirecting to the consent screen.
#[utoipa::path(
    get,
    path = "/auth/google",
    responses(
        (status = 302, description = "Redirect to Google consent", headers(("Location" = String))),
        (status = 503, description = "Google sign-in is not configured", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "googleSignIn",
    security([])
)]
#[get("/auth/google")]
pub async fn google_sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let nonce = new_oauth_state();
    let url = state.sign_in.authorization_url(&nonce)?;
    session.persist_oauth_state(&nonce)?;
    Ok(redirect_to(&url))
}

/// Complete Google sign-in and return to the chat page.
#[utoipa::path(
    get,
    path = "/auth/google/callback",
    params(CallbackQuery),
    responses(
        (status = 302, description = "Signed in; redirect to the frontend", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing authorisation code", body = ErrorSchema),
        (status = 401, description = "State mismatch or Google rejected the code", body = ErrorSchema),
        (status = 409, description = "Email belongs to another account", body = ErrorSchema),
        (status = 503, description = "Google or the database is unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "googleCallback",
    security([])
)]
#[get("/auth/google/callback")]
pub async fn google_callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CallbackQuery>,
) -> ApiResult<HttpResponse> {
    let CallbackQuery {
        code,
        state: returned_state,
        error,
    } = query.into_inner();

    let expected_state = session.take_oauth_state();
    if let Some(reason) = error {
        warn!(%reason, "google returned an error to the callback");
        return Err(Error::unauthorized(CONSENT_DENIED_MESSAGE));
    }
    match (expected_state, returned_state) {
        (Some(expected), Some(returned)) if expected == returned => {}
        _ => {
            warn!("oauth callback state did not match the session");
            return Err(Error::unauthorized(INVALID_STATE_MESSAGE));
        }
    }

    let user = state
        .sign_in
        .complete_sign_in(code.as_deref().unwrap_or_default())
        .await?;
    session.persist_user(&user)?;
    info!(user_id = %user.id, "user signed in");
    Ok(redirect_to(&state.frontend_url))
}

/// Report whether the caller holds a signed-in session.
#[utoipa::path(
    get,
    path = "/auth/status",
    responses(
        (status = 200, description = "Signed in", body = AuthStatus),
        (status = 401, description = "Not signed in", body = AuthStatus)
    ),
    tags = ["auth"],
    operation_id = "authStatus"
)]
#[get("/auth/status")]
pub async fn auth_status(session: SessionContext) -> ApiResult<HttpResponse> {
    let response = match session.user()? {
        Some(user) => HttpResponse::Ok().json(AuthStatus {
            authenticated: true,
            user: Some(user),
        }),
        None => HttpResponse::Unauthorized().json(AuthStatus {
            authenticated: false,
            user: None,
        }),
    };
    Ok(response)
}

/// Clear the session.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Session cleared", body = LogoutResponse)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(LogoutResponse {
        message: LOGGED_OUT_MESSAGE.to_owned(),
    })
}
