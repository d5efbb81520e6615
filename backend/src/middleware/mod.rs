//! Request middleware.
//!
//! Purpose: cross-cutting request lifecycle concerns such as tracing and CORS.

pub mod cors;
pub mod trace;

pub use cors::{frontend_cors, vary_by_origin};
pub use trace::Trace;
