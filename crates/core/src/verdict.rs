//! Topic-filter verdicts and question categories.

use serde::{Deserialize, Serialize};

/// Coarse question category, echoed into the response guidelines so the
/// model knows what kind of help is being asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Payment,
    Prediction,
    Blockchain,
    Tutorial,
    Market,
    #[default]
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Prediction => "prediction",
            Self::Blockchain => "blockchain",
            Self::Tutorial => "tutorial",
            Self::Market => "market",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The topic filter's decision for one question.
///
/// A rejected verdict always carries a reason. An accepted verdict always
/// carries a category; `advisory` holds the soft note attached when the
/// question matched no known topic keyword but is answered anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterVerdict {
    Rejected { reason: String },
    Accepted {
        category: Category,
        advisory: Option<String>,
    },
}

impl FilterVerdict {
    /// Accept with a category and no advisory note.
    pub fn accept(category: Category) -> Self {
        Self::Accepted {
            category,
            advisory: None,
        }
    }

    /// Accept with a category and an advisory note for the caller.
    pub fn accept_with_advisory(category: Category, advisory: impl Into<String>) -> Self {
        Self::Accepted {
            category,
            advisory: Some(advisory.into()),
        }
    }

    /// Reject with a reason.
    pub fn reject(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// The rejection reason, or the advisory note on an accepted verdict.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Rejected { reason } => Some(reason),
            Self::Accepted { advisory, .. } => advisory.as_deref(),
        }
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            Self::Rejected { .. } => None,
            Self::Accepted { category, .. } => Some(*category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_always_has_reason_and_no_category() {
        let v = FilterVerdict::reject("off topic");
        assert!(!v.is_valid());
        assert_eq!(v.reason(), Some("off topic"));
        assert_eq!(v.category(), None);
    }

    #[test]
    fn accepted_always_has_category() {
        let v = FilterVerdict::accept(Category::Payment);
        assert!(v.is_valid());
        assert_eq!(v.category(), Some(Category::Payment));
        assert_eq!(v.reason(), None);
    }

    #[test]
    fn accepted_can_carry_advisory_note() {
        let v = FilterVerdict::accept_with_advisory(Category::General, "may be off topic");
        assert!(v.is_valid());
        assert_eq!(v.reason(), Some("may be off topic"));
    }

    #[test]
    fn category_names_are_lowercase() {
        assert_eq!(Category::General.to_string(), "general");
        assert_eq!(Category::Payment.as_str(), "payment");
        assert_eq!(Category::default(), Category::General);
    }
}
