//! MindWeaver Saga backend library modules.
//!
//! The crate follows a hexagonal layout: [`domain`] owns types, ports, and
//! services; [`inbound`] adapts HTTP requests onto driving ports; and
//! [`outbound`] implements driven ports against PostgreSQL, Gemini, and
//! Google OAuth.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
