//! Server settings loaded via OrthoConfig and the assembled server
//! configuration handed to [`super::create_server`].

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use mindweaver::inbound::http::session_config::SessionSettings;
use mindweaver::outbound::gemini::{DEFAULT_GEMINI_BASE_URL, GeminiSettings};
use mindweaver::outbound::google::GoogleOAuthSettings;
use mindweaver::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

pub(crate) const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub(crate) const DEFAULT_FRONTEND_URL: &str = "http://127.0.0.1:5500/index.html";
pub(crate) const DEFAULT_CORS_ORIGIN: &str = "http://127.0.0.1:5500";
pub(crate) const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:5000/auth/google/callback";
pub(crate) const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_OUTBOUND_TIMEOUT_SECS: u64 = 60;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Values read from CLI flags, `MINDWEAVER_*` environment variables, and
/// configuration files.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MINDWEAVER")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection URL; in-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Page the OAuth callback redirects to after sign-in.
    pub frontend_url: Option<String>,
    /// Origin allowed to call the API with credentials.
    pub cors_origin: Option<String>,
    /// Google OAuth client id.
    pub google_client_id: Option<String>,
    /// Google OAuth client secret.
    pub google_client_secret: Option<String>,
    /// Callback URL registered with Google.
    pub google_redirect_uri: Option<String>,
    /// Gemini API key.
    pub gemini_api_key: Option<String>,
    /// Gemini model name.
    pub gemini_model: Option<String>,
    /// Gemini API root.
    pub gemini_base_url: Option<String>,
    /// Timeout for Gemini and Google calls, in seconds.
    pub outbound_timeout_secs: Option<u64>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

impl ServerSettings {
    /// Socket address, defaulting to `127.0.0.1:5000`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 5000)))
    }

    /// Database URL when persistence is configured.
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_ref())
    }

    /// Maximum pool size.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Post-sign-in landing page.
    pub fn frontend_url(&self) -> &str {
        non_blank(self.frontend_url.as_ref()).unwrap_or(DEFAULT_FRONTEND_URL)
    }

    /// Allowed CORS origin.
    pub fn cors_origin(&self) -> &str {
        non_blank(self.cors_origin.as_ref()).unwrap_or(DEFAULT_CORS_ORIGIN)
    }

    /// Timeout applied to outbound HTTP calls.
    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(
            self.outbound_timeout_secs
                .unwrap_or(DEFAULT_OUTBOUND_TIMEOUT_SECS),
        )
    }

    /// Gemini adapter settings, when an API key is configured.
    pub fn gemini(&self) -> Option<GeminiSettings> {
        let api_key = non_blank(self.gemini_api_key.as_ref())?;
        Some(GeminiSettings {
            base_url: non_blank(self.gemini_base_url.as_ref())
                .unwrap_or(DEFAULT_GEMINI_BASE_URL)
                .to_owned(),
            model: non_blank(self.gemini_model.as_ref())
                .unwrap_or(DEFAULT_GEMINI_MODEL)
                .to_owned(),
            api_key: Zeroizing::new(api_key.to_owned()),
            timeout: self.outbound_timeout(),
        })
    }

    /// Google OAuth settings, when both client credentials are configured.
    pub fn google_oauth(&self) -> Option<GoogleOAuthSettings> {
        let client_id = non_blank(self.google_client_id.as_ref())?;
        let client_secret = non_blank(self.google_client_secret.as_ref())?;
        Some(GoogleOAuthSettings {
            client_id: client_id.to_owned(),
            client_secret: Zeroizing::new(client_secret.to_owned()),
            redirect_uri: non_blank(self.google_redirect_uri.as_ref())
                .unwrap_or(DEFAULT_REDIRECT_URI)
                .to_owned(),
            timeout: self.outbound_timeout(),
        })
    }

    /// Environment variables whose absence disables part of the API.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let checks = [
            ("MINDWEAVER_GEMINI_API_KEY", self.gemini_api_key.as_ref()),
            ("MINDWEAVER_GOOGLE_CLIENT_ID", self.google_client_id.as_ref()),
            (
                "MINDWEAVER_GOOGLE_CLIENT_SECRET",
                self.google_client_secret.as_ref(),
            ),
            ("MINDWEAVER_DATABASE_URL", self.database_url.as_ref()),
        ];
        checks
            .into_iter()
            .filter(|(_, value)| non_blank(*value).is_none())
            .map(|(name, _)| name)
            .collect()
    }
}

impl fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redacted(value: Option<&String>) -> &'static str {
            if value.is_some() { "<set>" } else { "<unset>" }
        }
        f.debug_struct("ServerSettings")
            .field("bind_addr", &self.bind_addr())
            .field("database_url", &redacted(self.database_url.as_ref()))
            .field("frontend_url", &self.frontend_url())
            .field("cors_origin", &self.cors_origin())
            .field("google_client_id", &self.google_client_id)
            .field(
                "google_client_secret",
                &redacted(self.google_client_secret.as_ref()),
            )
            .field("gemini_api_key", &redacted(self.gemini_api_key.as_ref()))
            .field("gemini_model", &self.gemini_model)
            .finish_non_exhaustive()
    }
}

/// Everything [`super::create_server`] needs.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) settings: ServerSettings,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Combine validated session settings with loaded server settings.
    #[must_use]
    pub fn new(session: SessionSettings, settings: ServerSettings) -> Self {
        Self {
            session,
            settings,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
