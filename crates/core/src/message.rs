//! Chat message types and payload normalization.
//!
//! The web UI has shipped several payload shapes over time: the message body
//! may arrive as `content`, under a `text` alias, or inside a `parts` array.
//! Everything past the transport boundary works with [`ChatMessage`], which
//! is produced from the raw shapes by [`normalize_messages`].

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
///
/// Only end-user and assistant turns are accepted from the client. System
/// instructions are assembled server-side and never taken from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
}

/// A normalized message: a known role and trimmed, non-empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One element of the `parts` array some UI builds send.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// A message as it arrives from the UI, before normalization.
///
/// The role is kept as a raw string so that unknown roles drop the single
/// message instead of failing deserialization of the whole request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub role: String,

    /// Canonical body field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Older UI builds put the body under `text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Structured variant: the body lives in `parts[0].text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<MessagePart>>,
}

/// Which of the accepted payload shapes supplied a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource<'a> {
    /// The `content` field.
    Inline(&'a str),
    /// The `text` alias.
    TextAlias(&'a str),
    /// `parts[0].text`.
    FirstPart(&'a str),
}

impl<'a> ContentSource<'a> {
    /// The raw (untrimmed) body text.
    pub fn text(self) -> &'a str {
        match self {
            Self::Inline(s) | Self::TextAlias(s) | Self::FirstPart(s) => s,
        }
    }
}

impl IncomingMessage {
    /// Resolve the message body across the accepted shapes.
    ///
    /// Precedence: `content`, then `text`, then `parts[0].text`. A present
    /// `content` wins the slot even when empty (the message then drops
    /// during normalization); an empty `text` alias falls through to
    /// `parts`, matching how the UI composes these payloads.
    pub fn body(&self) -> Option<ContentSource<'_>> {
        if let Some(s) = self.content.as_deref() {
            return Some(ContentSource::Inline(s));
        }
        if let Some(s) = self.text.as_deref().filter(|s| !s.is_empty()) {
            return Some(ContentSource::TextAlias(s));
        }
        self.parts
            .as_deref()
            .and_then(|parts| parts.first())
            .and_then(|part| part.text.as_deref())
            .map(ContentSource::FirstPart)
    }
}

/// Normalize raw UI messages into the internal conversation shape.
///
/// Keeps only `user` and `assistant` roles, resolves the body through
/// [`IncomingMessage::body`], trims it, and drops messages that end up
/// empty. Callers must treat an empty result as a failed request, not an
/// empty conversation.
pub fn normalize_messages(raw: &[IncomingMessage]) -> Vec<ChatMessage> {
    raw.iter()
        .filter_map(|msg| {
            let role = match msg.role.as_str() {
                "user" => Role::User,
                "assistant" => Role::Assistant,
                _ => return None,
            };
            let content = msg.body().map(|b| b.text().trim()).unwrap_or("");
            if content.is_empty() {
                return None;
            }
            Some(ChatMessage {
                role,
                content: content.to_owned(),
            })
        })
        .collect()
}
