//! Knowledge corpus for grounding assistant answers.
//!
//! Documents are read from disk exactly once at startup and shared
//! read-only for the life of the process. A source that cannot be read is
//! logged and skipped; an empty corpus is a degraded state, not an error.

use std::path::Path;

use fugubot_config::KnowledgeConfig;
use fugubot_core::Document;
use tracing::{info, warn};

/// Character budget applied to each document when it is rendered into the
/// prompt.
pub const EXCERPT_BUDGET: usize = 5000;

/// Load every configured source into an in-memory corpus.
///
/// Call once at startup and share the result behind an `Arc`.
pub fn load_corpus(config: &KnowledgeConfig) -> Vec<Document> {
    let mut corpus = Vec::with_capacity(config.files.len());

    for source in &config.files {
        if let Some(doc) = load_document(&source.path, &source.title, &source.category) {
            corpus.push(doc);
        }
    }

    info!(documents = corpus.len(), "Knowledge corpus loaded");
    corpus
}

fn load_document(path: &Path, title: &str, category: &str) -> Option<Document> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            info!(path = %path.display(), title, "Loaded knowledge document");
            Some(Document::new(title, content, category))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Skipping unreadable knowledge document");
            None
        }
    }
}

/// Find the documents relevant to a query.
///
/// Current policy: the whole corpus is relevant, the query is ignored. The
/// corpus is a single guide document today, so relevance scoring buys
/// nothing. The signature keeps the query so scoring can be added without
/// touching call sites.
pub fn search<'a>(_query: &str, corpus: &'a [Document]) -> Vec<&'a Document> {
    corpus.iter().collect()
}

/// Render a document excerpt bounded to `max_len` characters.
///
/// The excerpt opens with a markdown header naming the document, then
/// appends source lines whole, stopping before any line that would push
/// the running character count past the budget. Lines are never split: a
/// single over-long line ends the excerpt rather than being clipped.
pub fn excerpt(doc: &Document, max_len: usize) -> String {
    let mut result = format!("## {}\n\n", doc.title);
    let mut current_len = result.chars().count();

    for line in doc.content.split('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > max_len {
            break;
        }
        result.push_str(line);
        result.push('\n');
        current_len += line_len + 1;
    }

    result
}
