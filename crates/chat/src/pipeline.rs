//! The end-to-end chat pipeline.
//!
//! One entry point, [`ChatPipeline::process`], runs a request through
//! normalization, the topic filter, knowledge retrieval, and the upstream
//! relay. The pipeline holds no per-request state; a single instance is
//! shared across all connections.

use std::sync::Arc;

use fugubot_core::{
    ChatOutcome, ChatRequest, CompletionBackend, CompletionRequest, Document, Error,
    FilterVerdict, ProviderError, Result, normalize_messages,
};
use fugubot_knowledge::{EXCERPT_BUDGET, excerpt, search};
use tracing::{debug, info, warn};

use crate::filter::{TopicFilter, rejection_message};
use crate::prompt::build_system_prompt;

pub struct ChatPipeline {
    backend: Option<Arc<dyn CompletionBackend>>,
    corpus: Arc<Vec<Document>>,
    filter: TopicFilter,
    model: String,
    temperature: f32,
}

impl ChatPipeline {
    /// Build a pipeline over a fixed corpus and filter.
    ///
    /// `backend` may be `None` when no API key is configured; the pipeline
    /// still filters and rejects, and fails fast only when a question
    /// would actually need the upstream model.
    pub fn new(
        backend: Option<Arc<dyn CompletionBackend>>,
        corpus: Arc<Vec<Document>>,
        filter: TopicFilter,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            backend,
            corpus,
            filter,
            model: model.into(),
            temperature,
        }
    }

    /// Whether an upstream backend is wired in.
    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Run one request through the full pipeline.
    ///
    /// Returns [`ChatOutcome::Rejected`] for out-of-scope questions and
    /// [`ChatOutcome::Streaming`] once the upstream call is in flight.
    /// Errors cover the empty conversation and upstream failures; turning
    /// them into wire responses is the gateway's job.
    pub async fn process(&self, request: ChatRequest) -> Result<ChatOutcome> {
        let messages = normalize_messages(&request.messages);
        info!(
            received = request.messages.len(),
            normalized = messages.len(),
            "Processing chat request"
        );

        let Some(last) = messages.last() else {
            warn!("Every message was dropped during normalization");
            return Err(Error::NoValidMessages);
        };
        // The filter only ever sees the newest message; history is context
        // for the model, not for scoping.
        let question = last.content.clone();

        let verdict = self.filter.check(&question);
        match &verdict {
            FilterVerdict::Rejected { reason } => {
                info!(%reason, "Question rejected by topic filter");
                return Ok(ChatOutcome::Rejected {
                    message: rejection_message(reason),
                });
            }
            FilterVerdict::Accepted {
                advisory: Some(note),
                ..
            } => debug!(%note, "Question accepted with advisory"),
            FilterVerdict::Accepted { .. } => {}
        }
        let category = verdict.category().unwrap_or_default();

        let relevant = search(&question, &self.corpus);
        debug!(documents = relevant.len(), "Knowledge base searched");
        let excerpts: Vec<String> = relevant
            .iter()
            .map(|doc| excerpt(doc, EXCERPT_BUDGET))
            .collect();

        let system_prompt =
            build_system_prompt(category, request.user_context.as_ref(), &excerpts);

        let Some(backend) = &self.backend else {
            return Err(ProviderError::NotConfigured("missing API key".into()).into());
        };

        info!(
            backend = backend.name(),
            model = %self.model,
            history = messages.len(),
            "Relaying conversation upstream"
        );
        let deltas = backend
            .stream_chat(CompletionRequest {
                model: self.model.clone(),
                system_prompt,
                messages,
                temperature: self.temperature,
            })
            .await?;

        Ok(ChatOutcome::Streaming { deltas })
    }
}
