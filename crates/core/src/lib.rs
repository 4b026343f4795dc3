//! # Fugubot Core
//!
//! Domain types, traits, and error definitions for the Fugu Protocol chat
//! backend. This crate has **zero framework dependencies**: it defines the
//! model the other crates implement against.
//!
//! ## Design Philosophy
//!
//! The pipeline is a pure composition over these types: raw UI messages are
//! normalized into [`ChatMessage`]s, the filter produces a [`FilterVerdict`],
//! and the relay hands back a [`ChatOutcome`] whose streaming variant is a
//! cancelable delta channel. The only trait seam is [`CompletionBackend`],
//! so tests swap the upstream API for a scripted one.

pub mod backend;
pub mod document;
pub mod error;
pub mod message;
pub mod outcome;
pub mod request;
pub mod verdict;

// Re-export key types at crate root for ergonomics
pub use backend::{CompletionBackend, CompletionRequest, DeltaStream};
pub use document::Document;
pub use error::{Error, ProviderError, Result};
pub use message::{ChatMessage, ContentSource, IncomingMessage, MessagePart, Role, normalize_messages};
pub use outcome::ChatOutcome;
pub use request::{ChatRequest, UserContext, UserPreferences};
pub use verdict::{Category, FilterVerdict};
