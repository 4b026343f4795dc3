//! Reference documents that ground assistant answers.

use serde::{Deserialize, Serialize};

/// A single knowledge document.
///
/// The corpus is populated once at startup and never mutated afterwards,
/// which is what makes sharing it across request handlers safe without
/// locking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub content: String,
    pub category: String,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
        }
    }
}
