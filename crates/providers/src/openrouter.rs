//! OpenRouter completion backend.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint in streaming
//! SSE mode. The base URL defaults to OpenRouter, which fronts the model the
//! product ships with; a self-hosted vLLM or OpenAI endpoint works by
//! pointing `base_url` at it.

use async_trait::async_trait;
use futures::StreamExt;
use fugubot_config::AppConfig;
use fugubot_core::error::ProviderError;
use fugubot_core::message::Role;
use fugubot_core::{CompletionBackend, CompletionRequest, DeltaStream};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// A streaming client for an OpenAI-compatible completion API.
pub struct OpenRouterBackend {
    base_url: String,
    api_key: String,
    referer: String,
    app_title: String,
    client: reqwest::Client,
}

impl OpenRouterBackend {
    /// Create a backend against the given endpoint.
    ///
    /// `referer` and `app_title` become OpenRouter's `HTTP-Referer` and
    /// `X-Title` attribution headers; other endpoints ignore them.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        referer: impl Into<String>,
        app_title: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            referer: referer.into(),
            app_title: app_title.into(),
            client,
        }
    }

    /// Build the backend from application config.
    ///
    /// Returns `None` when no API key is configured; the caller decides how
    /// loudly to complain.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        config.api_key.as_ref().map(|key| {
            Self::new(
                key.clone(),
                config.base_url.clone(),
                config.referer.clone(),
                config.app_title.clone(),
            )
        })
    }

    /// Convert a completion request to the wire message list: the assembled
    /// system prompt first, then the conversation in order.
    fn to_api_messages(request: &CompletionRequest) -> Vec<ApiMessage> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ApiMessage {
            role: "system".into(),
            content: request.system_prompt.clone(),
        });
        for m in &request.messages {
            messages.push(ApiMessage {
                role: match m.role {
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                },
                content: m.content.clone(),
            });
        }
        messages
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterBackend {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn stream_chat(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<DeltaStream, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request),
            "temperature": request.temperature,
            "stream": true,
        });

        debug!(model = %request.model, "Opening streaming completion");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.app_title)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider streaming error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let (tx, rx) = tokio::sync::mpsc::channel(64);

        // Drain the SSE byte stream into content deltas. The task ends when
        // upstream finishes or the receiver is dropped; dropping `response`
        // on return releases the upstream connection.
        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx
                            .send(Err(ProviderError::StreamInterrupted(e.to_string())))
                            .await;
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&bytes));

                // Process complete lines
                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim_end_matches('\r').to_string();
                    buffer = buffer[line_end + 1..].to_string();

                    // Skip empty lines and SSE comments
                    if line.is_empty() || line.starts_with(':') {
                        continue;
                    }

                    let Some(data) = line.strip_prefix("data: ") else {
                        continue;
                    };
                    let data = data.trim();

                    // "[DONE]" signals end of stream; no marker is forwarded
                    if data == "[DONE]" {
                        return;
                    }

                    match serde_json::from_str::<StreamResponse>(data) {
                        Ok(stream_resp) => {
                            let Some(choice) = stream_resp.choices.first() else {
                                continue;
                            };

                            if let Some(reason) = &choice.finish_reason {
                                debug!(reason = %reason, "Upstream stream finished");
                            }

                            // Control-only chunks carry no text; skip them
                            let has_content =
                                choice.delta.content.as_ref().is_some_and(|c| !c.is_empty());
                            if !has_content {
                                continue;
                            }

                            let delta = choice.delta.content.clone().unwrap_or_default();
                            if tx.send(Ok(delta)).await.is_err() {
                                return; // receiver dropped, client is gone
                            }
                        }
                        Err(e) => {
                            trace!(data = %data, error = %e, "Ignoring unparseable SSE chunk");
                        }
                    }
                }
            }
        });

        Ok(rx)
    }
}

// ── OpenAI-compatible wire types ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

/// A single SSE `data: {...}` chunk from a streaming response.
#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fugubot_core::ChatMessage;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "deepseek/deepseek-chat".into(),
            system_prompt: "You are a helpful assistant".into(),
            messages: vec![
                ChatMessage::user("how do I deposit?"),
                ChatMessage::assistant("Via Transak or Banxa."),
                ChatMessage::user("and withdraw?"),
            ],
            temperature: 0.7,
        }
    }

    #[test]
    fn backend_constructor_normalizes_base_url() {
        let backend = OpenRouterBackend::new(
            "sk-test",
            "https://openrouter.ai/api/v1/",
            "https://fugu-protocol.com",
            "Fugu Prediction Chatbot",
        );
        assert_eq!(backend.name(), "openrouter");
        assert_eq!(backend.base_url, "https://openrouter.ai/api/v1");
    }

    #[test]
    fn from_config_requires_api_key() {
        let mut config = AppConfig::default();
        assert!(OpenRouterBackend::from_config(&config).is_none());

        config.api_key = Some("sk-test".into());
        let backend = OpenRouterBackend::from_config(&config).unwrap();
        assert_eq!(backend.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(backend.app_title, "Fugu Prediction Chatbot");
    }

    #[test]
    fn system_prompt_leads_the_message_list() {
        let api_messages = OpenRouterBackend::to_api_messages(&request());
        assert_eq!(api_messages.len(), 4);
        assert_eq!(api_messages[0].role, "system");
        assert_eq!(api_messages[0].content, "You are a helpful assistant");
        assert_eq!(api_messages[1].role, "user");
        assert_eq!(api_messages[2].role, "assistant");
        assert_eq!(api_messages[3].content, "and withdraw?");
    }

    // ── SSE parsing tests ──

    #[test]
    fn parse_stream_content_delta() {
        let data = r#"{"choices":[{"delta":{"content":"Hello"},"finish_reason":null}]}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].delta.content.as_deref(), Some("Hello"));
        assert!(parsed.choices[0].finish_reason.is_none());
    }

    #[test]
    fn parse_stream_finish_chunk() {
        let data = r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.choices[0].finish_reason.as_deref(), Some("stop"));
        assert!(parsed.choices[0].delta.content.is_none());
    }

    #[test]
    fn parse_empty_delta() {
        let data = r#"{"choices":[{"delta":{"content":""},"finish_reason":null}]}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        let content = parsed.choices[0].delta.content.as_deref();
        assert_eq!(content, Some(""));
        assert!(!content.is_some_and(|c| !c.is_empty()));
    }

    #[test]
    fn parse_chunk_without_choices() {
        // OpenRouter sends keep-alive processing chunks with no choices
        let data = r#"{"id":"gen-1","choices":[]}"#;
        let parsed: StreamResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn api_message_serializes_flat() {
        let msg = ApiMessage {
            role: "user".into(),
            content: "hi".into(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
