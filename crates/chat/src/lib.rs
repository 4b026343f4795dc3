//! Conversation handling for the Fugu Protocol support chatbot.
//!
//! Three stages, in the order a request flows through them:
//!
//! 1. [`filter`]: decide whether the question is in scope at all, and
//!    classify it into a coarse category.
//! 2. [`prompt`]: assemble the system prompt from the category, the
//!    caller's account snapshot, and knowledge-base excerpts.
//! 3. [`pipeline`]: tie normalization, filtering, retrieval, and the
//!    upstream completion call together behind one entry point.
//!
//! Nothing in this crate talks HTTP. The gateway owns the wire; this
//! crate owns what the conversation means.

pub mod filter;
pub mod pipeline;
pub mod prompt;

pub use filter::{rejection_message, TopicFilter};
pub use pipeline::ChatPipeline;
pub use prompt::build_system_prompt;
