//! HTTP inbound adapter exposing the story, chat history, and sign-in
//! endpoints.

pub mod auth;
pub mod chats;
pub mod error;
pub mod health;
pub mod index;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod stories;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
