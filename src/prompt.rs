//! Prompt construction for diagnosis requests.
//!
//! [`DiagnosisRequestBuilder`] is pure: the same text, genre and contract
//! always produce byte-identical prompts, and nothing here talks to a
//! provider.

use std::fmt::Write as _;

use crate::types::{ContractKind, Genre, LabelSet};
use crate::{MimirError, Result};

/// Advisory comment length requested from the model, in characters.
pub const COMMENT_TARGET_CHARS: usize = 200;

/// A model-ready instruction block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
}

impl Prompt {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Builds prompts for one output contract.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisRequestBuilder {
    contract: ContractKind,
}

impl DiagnosisRequestBuilder {
    pub fn new(contract: ContractKind) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> &ContractKind {
        &self.contract
    }

    /// Build the prompt for `user_text`.
    ///
    /// Only emptiness is checked here; length limits are the caller's job.
    pub fn build(&self, user_text: &str, genre: Option<Genre>) -> Result<Prompt> {
        if user_text.trim().is_empty() {
            return Err(MimirError::InvalidInput("text is empty".to_string()));
        }

        let mut text = String::new();
        match &self.contract {
            ContractKind::Structured => write_structured(&mut text),
            ContractKind::LabeledLine(labels) => write_labeled(&mut text, labels),
        }
        if let Some(genre) = genre {
            let _ = writeln!(text, "テーマ: {}", genre.label());
        }
        let _ = write!(text, "\n投稿内容: {user_text}\n");

        Ok(Prompt { text })
    }
}

fn write_structured(out: &mut String) {
    let _ = writeln!(out, "以下のSNS投稿について、JSON形式で診断してください。");
    let _ = writeln!(out, "出力は以下のキーを持つJSONとします:");
    let _ = writeln!(
        out,
        "\"bias_score\": -1.0から1.0の間の数値（-1.0=保守、+1.0=リベラル）,"
    );
    let _ = writeln!(
        out,
        "\"strength_score\": 0.0から1.0の間の数値（0.0=穏やか、1.0=強い）,"
    );
    let _ = writeln!(
        out,
        "\"comment\": 約{COMMENT_TARGET_CHARS}文字で中立的かつ根拠を説明"
    );
    let _ = writeln!(
        out,
        "JSONオブジェクトのみを出力し、前後に説明文を付けないでください。"
    );
}

fn write_labeled(out: &mut String, labels: &LabelSet) {
    let _ = writeln!(out, "以下のSNS投稿について、政治的な傾向を診断してください。");
    let _ = writeln!(out, "必ず次の形式で出力してください:");
    let _ = writeln!(
        out,
        "{}: -1.0から1.0の間の数値（-1.0=保守、+1.0=リベラル）",
        labels.polarity
    );
    let _ = writeln!(
        out,
        "{}: 0.0から1.0の間の数値（0.0=穏やか、1.0=強い）",
        labels.intensity
    );
    let _ = writeln!(
        out,
        "{}: 約{COMMENT_TARGET_CHARS}文字で中立的かつ根拠を説明",
        labels.comment
    );
}
