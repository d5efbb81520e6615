//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: in-process repositories for runs without a database.
//! - **gemini**: story generation through the Gemini `generateContent` API.
//! - **google**: Google OAuth authorization-code flow.
//!
//! Adapters translate between domain types and wire or row formats. They
//! contain no business rules.

pub mod gemini;
pub mod google;
mod http_support;
pub mod memory;
pub mod persistence;
