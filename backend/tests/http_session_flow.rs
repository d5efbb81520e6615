//! End-to-end HTTP tests for sign-in, story generation, and history.
//!
//! The app is assembled from the public handlers and middleware, backed by
//! the in-memory repositories and the doubles in `support/doubles.rs`.

#[allow(dead_code)]
#[path = "support/doubles.rs"]
mod doubles;

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key, SameSite, time::Duration};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use doubles::{CONSENT_URL, RecordingGenerator, STORY_TEXT, StaticIdentityProvider};
use mindweaver::domain::{ChatHistoryService, GoogleSignInService, StoryService, TRACE_ID_HEADER};
use mindweaver::inbound::http::auth::{auth_status, google_callback, google_sign_in, logout};
use mindweaver::inbound::http::chats::{list_chat_messages, list_chats};
use mindweaver::inbound::http::error::json_config;
use mindweaver::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use mindweaver::inbound::http::state::{HttpState, HttpStatePorts};
use mindweaver::inbound::http::stories::generate_story;
use mindweaver::middleware::{Trace, frontend_cors, vary_by_origin};
use mindweaver::outbound::memory::{MemoryChatRepository, MemoryUserRepository};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};

const FRONTEND_URL: &str = "http://127.0.0.1:5500/index.html";
const FRONTEND_ORIGIN: &str = "http://127.0.0.1:5500";

fn http_state() -> HttpState {
    let chats = Arc::new(MemoryChatRepository::new());
    let users = Arc::new(MemoryUserRepository::new());
    let story = StoryService::new(
        chats.clone(),
        Arc::new(RecordingGenerator::default()),
        Arc::new(DefaultClock),
    );
    let sign_in = GoogleSignInService::new(
        Arc::new(StaticIdentityProvider::new("ada@example.com")),
        users,
        Arc::new(DefaultClock),
    );
    HttpState::new(
        HttpStatePorts {
            story: Arc::new(story),
            chats: Arc::new(ChatHistoryService::new(chats)),
            sign_in: Arc::new(sign_in),
        },
        FRONTEND_URL,
    )
}

fn session_settings() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        ttl: Duration::hours(1),
    }
}

async fn mindweaver_app() -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl actix_web::body::MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(actix_web::web::Data::new(http_state()))
            .app_data(json_config())
            .wrap(session_settings().middleware())
            .wrap(frontend_cors(FRONTEND_ORIGIN))
            .wrap(vary_by_origin())
            .wrap(Trace)
            .service(google_sign_in)
            .service(google_callback)
            .service(auth_status)
            .service(logout)
            .service(generate_story)
            .service(list_chats)
            .service(list_chat_messages),
    )
    .await
}

fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

fn location<B>(response: &ServiceResponse<B>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
        .to_owned()
}

async fn signed_in_cookie<S, B>(app: &S, code: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let consent = test::call_service(app, test::TestRequest::get().uri("/auth/google").to_request()).await;
    assert_eq!(consent.status(), StatusCode::FOUND);
    let consent_url = url::Url::parse(&location(&consent)).expect("consent url");
    assert!(consent_url.as_str().starts_with(CONSENT_URL));
    let state = consent_url
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .expect("state parameter");
    let pending = session_cookie(&consent).expect("pending session cookie");

    let callback = test::call_service(
        app,
        test::TestRequest::get()
            .uri(&format!("/auth/google/callback?code={code}&state={state}"))
            .cookie(pending)
            .to_request(),
    )
    .await;
    assert_eq!(callback.status(), StatusCode::FOUND);
    assert_eq!(location(&callback), FRONTEND_URL);
    session_cookie(&callback).expect("signed-in session cookie")
}

#[rstest]
#[actix_web::test]
async fn sign_in_story_and_history_round_trip() {
    let app = mindweaver_app().await;
    let cookie = signed_in_cookie(&app, "valid-code").await;

    let status = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/auth/status")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(status.status(), StatusCode::OK);
    let body: Value = test::read_body_json(status).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user"]["email"], "ada@example.com");

    let story = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/generate-story")
            .cookie(cookie.clone())
            .set_json(json!({ "user_input": "I am nervous about my exam" }))
            .to_request(),
    )
    .await;
    assert_eq!(story.status(), StatusCode::OK);
    let body: Value = test::read_body_json(story).await;
    assert_eq!(body["story"], STORY_TEXT);
    let chat_id = body["chat_id"].as_str().expect("chat id").to_owned();

    let chats = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/chats")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(chats).await;
    let listed = body.as_array().expect("chat array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], chat_id.as_str());

    let messages = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/chats/{chat_id}/messages"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(messages).await;
    let roles: Vec<&str> = body
        .as_array()
        .expect("message array")
        .iter()
        .filter_map(|message| message["role"].as_str())
        .collect();
    assert_eq!(roles, ["user", "assistant"]);
}

#[rstest]
#[actix_web::test]
async fn logout_clears_the_session() {
    let app = mindweaver_app().await;
    let cookie = signed_in_cookie(&app, "valid-code").await;

    let logout_res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(logout_res.status(), StatusCode::OK);
    let removal = session_cookie(&logout_res).expect("removal cookie");
    assert_eq!(removal.value(), "");

    let status = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/auth/status")
            .cookie(removal)
            .to_request(),
    )
    .await;
    assert_eq!(status.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(status).await;
    assert_eq!(body["authenticated"], false);
}

#[rstest]
#[actix_web::test]
async fn protected_routes_require_a_session_and_carry_trace_ids() {
    let app = mindweaver_app().await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/generate-story")
            .set_json(json!({ "user_input": "hello" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .expect("trace id header")
        .to_owned();
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["error"], "Authentication required");
    assert_eq!(body["traceId"], trace_id.as_str());
}

#[rstest]
#[actix_web::test]
async fn forged_callback_state_is_rejected() {
    let app = mindweaver_app().await;

    let consent = test::call_service(&app, test::TestRequest::get().uri("/auth/google").to_request()).await;
    let pending = session_cookie(&consent).expect("pending session cookie");

    let callback = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/auth/google/callback?code=valid-code&state=forged")
            .cookie(pending)
            .to_request(),
    )
    .await;
    assert_eq!(callback.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn credentialed_cors_is_granted_to_the_frontend_origin() {
    let app = mindweaver_app().await;

    let response = test::call_service(
        &app,
        test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/generate-story")
            .insert_header((header::ORIGIN, FRONTEND_ORIGIN))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some(FRONTEND_ORIGIN)
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|value| value.to_str().ok()),
        Some("true")
    );
}

#[rstest]
#[actix_web::test]
async fn responses_without_an_origin_still_vary_by_origin() {
    let app = mindweaver_app().await;

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/auth/status").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let vary = response
        .headers()
        .get(header::VARY)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(vary.contains("Origin"), "vary header: {vary}");
}

#[rstest]
#[actix_web::test]
async fn oversized_input_is_rejected_before_any_chat_is_created() {
    let app = mindweaver_app().await;
    let cookie = signed_in_cookie(&app, "valid-code").await;

    let story = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/generate-story")
            .cookie(cookie.clone())
            .set_json(json!({ "user_input": "a".repeat(4001) }))
            .to_request(),
    )
    .await;
    assert_eq!(story.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(story).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["error"], "Input is too long");

    let chats = test::call_service(
        &app,
        test::TestRequest::get().uri("/chats").cookie(cookie).to_request(),
    )
    .await;
    let body: Value = test::read_body_json(chats).await;
    assert_eq!(body, json!([]));
}

#[rstest]
#[case::malformed("not-a-uuid")]
#[case::unknown("3fa85f64-5717-4562-b3fc-2c963f66afa6")]
#[actix_web::test]
async fn continuing_an_unknown_chat_is_not_found(#[case] chat_id: &str) {
    let app = mindweaver_app().await;
    let cookie = signed_in_cookie(&app, "valid-code").await;

    let story = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/generate-story")
            .cookie(cookie)
            .set_json(json!({ "user_input": "Tell me more", "chat_id": chat_id }))
            .to_request(),
    )
    .await;
    assert_eq!(story.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(story).await;
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["error"], "Chat not found");
}

#[rstest]
#[actix_web::test]
async fn another_users_chat_cannot_be_continued() {
    let app = mindweaver_app().await;
    let owner = signed_in_cookie(&app, "valid-code").await;
    let intruder = signed_in_cookie(&app, "valid-code:grace@example.com").await;

    let story = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/generate-story")
            .cookie(owner.clone())
            .set_json(json!({ "user_input": "I am nervous about my exam" }))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(story).await;
    let chat_id = body["chat_id"].as_str().expect("chat id").to_owned();

    let hijack = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/generate-story")
            .cookie(intruder)
            .set_json(json!({ "user_input": "Now tell me theirs", "chat_id": chat_id }))
            .to_request(),
    )
    .await;
    assert_eq!(hijack.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(hijack).await;
    assert_eq!(body["error"], "Chat not found");

    let messages = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/chats/{chat_id}/messages"))
            .cookie(owner)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(messages).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}
