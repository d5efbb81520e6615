//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`StoryGenerator`], [`GoogleIdentityProvider`])
//! are implemented by outbound adapters. Driving ports ([`StoryCommand`],
//! [`ChatHistoryQuery`], [`GoogleSignIn`]) are implemented by domain services
//! and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod chat_history_query;
mod chat_repository;
mod google_identity_provider;
mod google_sign_in;
mod story_command;
mod story_generator;
mod user_repository;

#[cfg(test)]
pub use chat_history_query::MockChatHistoryQuery;
pub use chat_history_query::ChatHistoryQuery;
#[cfg(test)]
pub use chat_repository::MockChatRepository;
pub use chat_repository::{ChatPersistenceError, ChatRepository};
#[cfg(test)]
pub use google_identity_provider::MockGoogleIdentityProvider;
pub use google_identity_provider::{
    GoogleIdentityProvider, IdentityProviderError, UnconfiguredIdentityProvider,
};
#[cfg(test)]
pub use google_sign_in::MockGoogleSignIn;
pub use google_sign_in::GoogleSignIn;
#[cfg(test)]
pub use story_command::MockStoryCommand;
pub use story_command::StoryCommand;
#[cfg(test)]
pub use story_generator::MockStoryGenerator;
pub use story_generator::{StoryGenerator, StoryGeneratorError, UnconfiguredStoryGenerator};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
