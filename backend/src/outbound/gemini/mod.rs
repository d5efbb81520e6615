//! Gemini story generator adapter.
//!
//! Thin reqwest implementation of the `StoryGenerator` port over the
//! `models/{model}:generateContent` endpoint.

mod dto;
mod http_generator;

pub use http_generator::{
    DEFAULT_GEMINI_BASE_URL, GeminiBuildError, GeminiHttpGenerator, GeminiSettings,
};
