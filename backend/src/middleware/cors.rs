//! Credentialed CORS for the chat frontend origin.
//!
//! The chat page is served from its own origin and calls the API with
//! cookies, so responses name that origin explicitly and allow credentials.
//! Preflight requests are answered by [`actix_cors::Cors`] without reaching
//! the handlers.

use actix_cors::Cors;
use actix_web::http::{Method, header};
use actix_web::middleware::DefaultHeaders;

const PREFLIGHT_MAX_AGE_SECS: usize = 3600;

/// CORS policy allowing `GET`/`POST` with cookies from `origin` only.
///
/// Requests carrying any other `Origin` are rejected before the handlers run.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use mindweaver::middleware::{frontend_cors, vary_by_origin};
///
/// let app = App::new()
///     .wrap(frontend_cors("http://127.0.0.1:5500"))
///     .wrap(vary_by_origin());
/// ```
pub fn frontend_cors(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin.trim_end_matches('/'))
        .supports_credentials()
        .allowed_methods([Method::GET, Method::POST])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(PREFLIGHT_MAX_AGE_SECS)
}

/// Mark every response as varying by `Origin`, including responses to
/// requests that carry no `Origin` header.
pub fn vary_by_origin() -> DefaultHeaders {
    DefaultHeaders::new().add((header::VARY, "Origin"))
}
