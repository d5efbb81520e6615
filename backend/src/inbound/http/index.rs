//! API index listing the public endpoints.

use std::collections::BTreeMap;

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Name reported by `GET /`.
pub const API_NAME: &str = "MindWeaver Saga API";

const ENDPOINTS: [(&str, &str); 9] = [
    ("POST /generate-story", "Generate therapeutic fantasy stories"),
    ("GET /auth/google", "Google OAuth login"),
    ("GET /auth/google/callback", "Google OAuth redirect target"),
    ("GET /auth/status", "Check authentication status"),
    ("POST /auth/logout", "Logout user"),
    ("GET /chats", "Get user chats"),
    ("GET /chats/{chat_id}/messages", "Get chat messages"),
    ("GET /health", "Health check"),
    ("GET /health/ready", "Readiness probe"),
];

/// Body of `GET /`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ApiIndex {
    #[schema(example = "MindWeaver Saga API")]
    pub message: String,
    /// Endpoint signature mapped to a short description.
    pub endpoints: BTreeMap<String, String>,
}

/// Describe the API.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Endpoint directory", body = ApiIndex)),
    tags = ["health"],
    operation_id = "apiIndex",
    security([])
)]
#[get("/")]
pub async fn index() -> web::Json<ApiIndex> {
    web::Json(ApiIndex {
        message: API_NAME.to_owned(),
        endpoints: ENDPOINTS
            .iter()
            .map(|(route, description)| ((*route).to_owned(), (*description).to_owned()))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;

    #[rstest]
    #[actix_web::test]
    async fn index_lists_story_and_auth_endpoints() {
        let app = test::init_service(App::new().service(index)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: ApiIndex = test::read_body_json(res).await;
        assert_eq!(body.message, API_NAME);
        assert!(body.endpoints.contains_key("POST /generate-story"));
        assert!(body.endpoints.contains_key("GET /auth/status"));
        assert_eq!(body.endpoints.len(), ENDPOINTS.len());
    }
}
