//! The inbound request shape accepted by the chat endpoint.

use serde::{Deserialize, Serialize};

use crate::message::IncomingMessage;

/// The raw request body posted by the chat widget.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Conversation history, newest last. Normalized before use.
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,

    /// Wallet and preference data for the signed-in user, if any.
    #[serde(default)]
    pub user_context: Option<UserContext>,

    /// Client send time in epoch milliseconds. Accepted but unused.
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// Per-user context attached by the front end.
///
/// Read-only for the whole pipeline; it is only ever rendered into the
/// system prompt. Defaults for absent fields are applied at render time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    #[serde(default)]
    pub wallet_address: Option<String>,

    /// USDC balance. Treated as 0 when absent.
    #[serde(default)]
    pub balance: Option<f64>,

    /// The user's open positions. Only the count is rendered; the elements
    /// are passed through untouched.
    #[serde(default)]
    pub active_predictions: Option<Vec<serde_json::Value>>,

    #[serde(default)]
    pub user_preferences: Option<UserPreferences>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Preferred response language, `en` when absent.
    #[serde(default)]
    pub language: Option<String>,

    /// Risk appetite label, `medium` when absent.
    #[serde(default)]
    pub risk_level: Option<String>,
}
