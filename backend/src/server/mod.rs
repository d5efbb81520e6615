//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use mindweaver::doc::ApiDoc;
use mindweaver::inbound::http::auth::{auth_status, google_callback, google_sign_in, logout};
use mindweaver::inbound::http::chats::{list_chat_messages, list_chats};
use mindweaver::inbound::http::error::json_config;
use mindweaver::inbound::http::health::{HealthState, health, live, ready};
use mindweaver::inbound::http::index::index;
use mindweaver::inbound::http::session_config::SessionSettings;
use mindweaver::inbound::http::state::HttpState;
use mindweaver::inbound::http::stories::generate_story;
use mindweaver::middleware::{Trace, frontend_cors, vary_by_origin};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
    cors_origin: String,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
        cors_origin,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(session.middleware())
        .wrap(frontend_cors(&cors_origin))
        .wrap(vary_by_origin())
        .wrap(Trace)
        .service(index)
        .service(google_sign_in)
        .service(google_callback)
        .service(auth_status)
        .service(logout)
        .service(generate_story)
        .service(list_chats)
        .service(list_chat_messages)
        .service(health)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is bound.
/// - `config`: pre-built [`ServerConfig`] with session, settings, and an
///   optional database pool.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let bind_addr = config.settings.bind_addr();
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        session: config.session.clone(),
        cors_origin: config.settings.cors_origin().to_owned(),
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
