//! Output contracts a provider can be asked to reply in.

use serde::{Deserialize, Serialize};

/// Label strings for the labeled-line contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSet {
    pub polarity: String,
    pub intensity: String,
    pub comment: String,
}

impl LabelSet {
    /// `傾向スコア` / `強さスコア` / `コメント`.
    pub fn japanese() -> Self {
        Self::new("傾向スコア", "強さスコア", "コメント")
    }

    /// `Bias score` / `Strength score` / `Comment`.
    pub fn english() -> Self {
        Self::new("Bias score", "Strength score", "Comment")
    }

    pub fn new(
        polarity: impl Into<String>,
        intensity: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            polarity: polarity.into(),
            intensity: intensity.into(),
            comment: comment.into(),
        }
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::japanese()
    }
}

/// The reply shape requested from the provider and expected by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractKind {
    /// A single JSON object with `bias_score`, `strength_score` and `comment`.
    #[default]
    Structured,
    /// Free text with labeled score and comment lines.
    LabeledLine(LabelSet),
}

impl ContractKind {
    /// Labeled-line contract with the default Japanese labels.
    pub fn labeled() -> Self {
        ContractKind::LabeledLine(LabelSet::default())
    }
}
