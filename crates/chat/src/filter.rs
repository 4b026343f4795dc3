//! Topic filter for incoming questions.
//!
//! Every question passes through here before any tokens are spent on it.
//! The filter is data-driven: the keyword tables live in
//! [`FilterConfig`] so deployments can retune scope without a rebuild.
//! Matching is substring-based on the lowercased question, which keeps
//! the filter cheap and predictable for mixed English/Vietnamese input.

use fugubot_config::FilterConfig;
use fugubot_core::{Category, FilterVerdict};

/// Scope and category decisions for a single question.
///
/// Checks run in a fixed order:
///
/// 1. Length gate. Questions shorter than the configured minimum are
///    rejected unless they open with a greeting.
/// 2. Banned scan. A banned keyword rejects the question outright, unless
///    an exception keyword from the same group also matches.
/// 3. Relevance. Questions that match no known topic and are not a
///    greeting are still accepted as `general`, but carry an advisory
///    note.
/// 4. Categorization. On-topic questions take the first matching rule;
///    `general` otherwise.
pub struct TopicFilter {
    config: FilterConfig,
}

impl TopicFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Decide whether `question` is in scope and classify it.
    pub fn check(&self, question: &str) -> FilterVerdict {
        let lowered = question.to_lowercase();
        let trimmed = lowered.trim();
        let greeting = self.is_greeting(trimmed);

        if trimmed.chars().count() < self.config.min_question_len && !greeting {
            return FilterVerdict::reject("Question is too short. Please be more specific.");
        }

        // Exceptions excuse a banned hit within the same group only.
        for banned in &self.config.banned_topics {
            let hit = banned.keywords.iter().any(|k| lowered.contains(k.as_str()));
            if !hit {
                continue;
            }
            let excused = banned
                .exceptions
                .iter()
                .any(|e| lowered.contains(e.as_str()));
            if excused {
                continue;
            }
            let primary = banned.keywords.first().map(String::as_str).unwrap_or("");
            return FilterVerdict::reject(format!(
                "Sorry, I can only answer questions related to Fugu Protocol. \
                 Your question about \"{primary}\" is outside the scope of support."
            ));
        }

        let on_topic = self
            .config
            .valid_topics
            .iter()
            .any(|topic| lowered.contains(topic.as_str()));

        // Off-topic questions are answered best-effort and stay `general`;
        // category rules apply to on-topic questions only.
        if !on_topic && !greeting {
            return FilterVerdict::accept_with_advisory(
                Category::General,
                "The question may not be directly related to the system. I will try to answer.",
            );
        }
        FilterVerdict::accept(self.detect_category(&lowered))
    }

    fn is_greeting(&self, trimmed: &str) -> bool {
        self.config
            .greetings
            .iter()
            .any(|g| trimmed.starts_with(g.as_str()))
    }

    fn detect_category(&self, lowered: &str) -> Category {
        self.config
            .category_rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k.as_str())))
            .map(|rule| rule.category)
            .unwrap_or_default()
    }
}

/// Render a rejection verdict into the reply the user actually sees.
///
/// The capability list is part of the product voice and is kept stable so
/// the UI can rely on its shape.
pub fn rejection_message(reason: &str) -> String {
    format!(
        "{reason}\n\n\
         I can help you with:\n\
         - 💰 Deposits/Withdrawals, Balance Management\n\
         - 🎯 Participating in Predictions, Buying Shares\n\
         - 📊 Viewing Statistics, Market Analysis\n\
         - 📚 Platform Usage Guides\n\
         - ⛓️ Information about Sui Blockchain\n\n\
         What would you like to ask?"
    )
}
