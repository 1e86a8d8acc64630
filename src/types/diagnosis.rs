//! The structured result of one diagnosis.

use serde::Serialize;

use super::score::Scored;

/// Result of one successful analysis.
///
/// Only the response parser constructs these, after range validation, so a
/// `Diagnosis` in hand always satisfies the score invariants. Fields are
/// read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    polarity: f64,
    intensity: f64,
    comment: String,
    source_text: String,
}

impl Diagnosis {
    /// Callers must have validated both scores and the comment.
    pub(crate) fn new(
        polarity: f64,
        intensity: f64,
        comment: impl Into<String>,
        source_text: impl Into<String>,
    ) -> Self {
        Self {
            polarity,
            intensity,
            comment: comment.into(),
            source_text: source_text.into(),
        }
    }

    /// Signed lean in [−1.0, 1.0].
    pub fn polarity(&self) -> f64 {
        self.polarity
    }

    /// How assertively the opinion is expressed, in [0.0, 1.0].
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// The model's rationale.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// The text the user submitted.
    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

impl Scored for Diagnosis {
    fn polarity(&self) -> f64 {
        self.polarity
    }

    fn intensity(&self) -> f64 {
        self.intensity
    }
}
