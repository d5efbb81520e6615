//! Builders that pick concrete adapters for each driving port.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{error, warn};

use mindweaver::domain::ports::{
    ChatRepository, GoogleIdentityProvider, StoryGenerator, UnconfiguredIdentityProvider,
    UnconfiguredStoryGenerator, UserRepository,
};
use mindweaver::domain::{ChatHistoryService, GoogleSignInService, StoryService};
use mindweaver::inbound::http::state::{HttpState, HttpStatePorts};
use mindweaver::outbound::gemini::GeminiHttpGenerator;
use mindweaver::outbound::google::GoogleOAuthProvider;
use mindweaver::outbound::memory::{MemoryChatRepository, MemoryUserRepository};
use mindweaver::outbound::persistence::{DbPool, DieselChatRepository, DieselUserRepository};

use super::ServerConfig;
use super::config::ServerSettings;

struct Repositories {
    users: Arc<dyn UserRepository>,
    chats: Arc<dyn ChatRepository>,
}

fn build_repositories(pool: Option<&DbPool>) -> Repositories {
    match pool {
        Some(pool) => Repositories {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            chats: Arc::new(DieselChatRepository::new(pool.clone())),
        },
        None => {
            warn!("no database configured; users and chats are kept in memory");
            Repositories {
                users: Arc::new(MemoryUserRepository::new()),
                chats: Arc::new(MemoryChatRepository::new()),
            }
        }
    }
}

fn build_story_generator(settings: &ServerSettings) -> Arc<dyn StoryGenerator> {
    let Some(gemini) = settings.gemini() else {
        warn!("gemini api key missing; story generation is disabled");
        return Arc::new(UnconfiguredStoryGenerator);
    };
    match GeminiHttpGenerator::new(gemini) {
        Ok(generator) => Arc::new(generator),
        Err(err) => {
            error!(error = %err, "gemini adapter could not be built; story generation is disabled");
            Arc::new(UnconfiguredStoryGenerator)
        }
    }
}

fn build_identity_provider(settings: &ServerSettings) -> Arc<dyn GoogleIdentityProvider> {
    let Some(google) = settings.google_oauth() else {
        warn!("google oauth credentials missing; sign-in is disabled");
        return Arc::new(UnconfiguredIdentityProvider);
    };
    match GoogleOAuthProvider::new(google) {
        Ok(provider) => Arc::new(provider),
        Err(err) => {
            error!(error = %err, "google oauth adapter could not be built; sign-in is disabled");
            Arc::new(UnconfiguredIdentityProvider)
        }
    }
}

/// Build the shared HTTP state from configured adapters and fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let Repositories { users, chats } = build_repositories(config.db_pool.as_ref());
    let generator = build_story_generator(&config.settings);
    let provider = build_identity_provider(&config.settings);

    let story = StoryService::new(chats.clone(), generator, Arc::new(DefaultClock));
    let history = ChatHistoryService::new(chats);
    let sign_in = GoogleSignInService::new(provider, users, Arc::new(DefaultClock));

    web::Data::new(HttpState::new(
        HttpStatePorts {
            story: Arc::new(story),
            chats: Arc::new(history),
            sign_in: Arc::new(sign_in),
        },
        config.settings.frontend_url(),
    ))
}
