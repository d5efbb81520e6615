//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer, the
//! schema wrappers for domain types, and the session cookie security scheme.
//! The document backs Swagger UI (debug builds) and the `openapi-dump`
//! binary.

use crate::inbound::http::auth::{AuthStatus, LogoutResponse};
use crate::inbound::http::chats::{ChatSummary, MessageView};
use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::index::ApiIndex;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, SessionUserSchema};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::stories::{GenerateStoryRequest, GenerateStoryResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Encrypted session cookie issued by GET /auth/google/callback.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "MindWeaver Saga API",
        description = "Therapeutic fantasy story generation with Google sign-in and chat history."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::index::index,
        crate::inbound::http::auth::google_sign_in,
        crate::inbound::http::auth::google_callback,
        crate::inbound::http::auth::auth_status,
        crate::inbound::http::auth::logout,
        crate::inbound::http::stories::generate_story,
        crate::inbound::http::chats::list_chats,
        crate::inbound::http::chats::list_chat_messages,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        SessionUserSchema,
        AuthStatus,
        LogoutResponse,
        GenerateStoryRequest,
        GenerateStoryResponse,
        ChatSummary,
        MessageView,
        HealthStatus,
        ApiIndex,
    )),
    tags(
        (name = "auth", description = "Google sign-in and session state"),
        (name = "stories", description = "Story generation"),
        (name = "chats", description = "Chat history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_uses_the_error_key() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "error");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    #[case("/generate-story")]
    #[case("/auth/google")]
    #[case("/auth/google/callback")]
    #[case("/auth/status")]
    #[case("/auth/logout")]
    #[case("/chats")]
    #[case("/chats/{chat_id}/messages")]
    #[case("/health")]
    #[case("/health/ready")]
    #[case("/health/live")]
    #[case("/")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    #[case("/generate-story", "post", "400")]
    #[case("/auth/google/callback", "get", "401")]
    #[case("/chats", "get", "401")]
    fn error_responses_reference_the_error_schema(
        #[case] path: &str,
        #[case] method: &str,
        #[case] status: &str,
    ) {
        let doc = ApiDoc::openapi();
        let item = serde_json::to_value(&doc.paths.paths[path]).expect("path item json");
        let schema_ref = &item[method]["responses"][status]["content"]["application/json"]
            ["schema"]["$ref"];
        assert_eq!(
            schema_ref.as_str(),
            Some(format!("#/components/schemas/{ERROR_SCHEMA_NAME}").as_str())
        );
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
