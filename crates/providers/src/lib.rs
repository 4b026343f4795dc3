//! Completion backend implementations for fugubot.
//!
//! All backends implement the `fugubot_core::CompletionBackend` trait, so
//! the pipeline never sees a concrete provider type and tests can swap in
//! a scripted one.

pub mod openrouter;

pub use openrouter::OpenRouterBackend;
