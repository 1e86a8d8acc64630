//! Mimir error types

use std::time::Duration;

/// Failures reported by a [`DiagnosisProvider`](crate::DiagnosisProvider).
///
/// Kept separate from parse failures: a provider error means no reply was
/// produced at all.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("empty response from model")]
    EmptyResponse,

    #[error("configuration error: {0}")]
    Configuration(String),

    // Wrapped llm crate error
    #[error("LLM error: {0}")]
    Llm(String),
}

impl ProviderError {
    /// Whether re-submitting later might succeed.
    ///
    /// Nothing retries automatically; this only shapes the message shown to
    /// the user.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http(_) | ProviderError::RateLimited { .. } => true,
            ProviderError::EmptyResponse => true,
            ProviderError::Api { status, .. } => *status >= 500,
            ProviderError::Llm(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("timeout")
                    || msg.contains("timed out")
                    || msg.contains("connection")
            }
            ProviderError::AuthenticationFailed
            | ProviderError::ModelNotFound(_)
            | ProviderError::Configuration(_) => false,
        }
    }
}

impl From<llm::error::LLMError> for ProviderError {
    fn from(err: llm::error::LLMError) -> Self {
        // llm does not expose structured status codes, so classify by message
        let msg = err.to_string();
        let lower = msg.to_lowercase();
        if lower.contains("rate limit") || msg.contains("429") {
            ProviderError::RateLimited { retry_after: None }
        } else if lower.contains("authentication")
            || msg.contains("401")
            || lower.contains("invalid api key")
        {
            ProviderError::AuthenticationFailed
        } else if lower.contains("not found") || msg.contains("404") {
            ProviderError::ModelNotFound(msg)
        } else {
            ProviderError::Llm(msg)
        }
    }
}

/// Mimir error types
#[derive(Debug, thiserror::Error)]
pub enum MimirError {
    /// Empty or oversized user text. No quota is consumed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The session has used up its attempts.
    #[error("usage limit of {limit} attempts reached")]
    QuotaExceeded { limit: u32 },

    /// The external provider failed. The attempt still counts against quota.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider replied, but not in the requested shape.
    #[error("could not parse diagnosis: {reason}")]
    Parse { reason: String, raw: String },

    #[error("reference corpus is empty")]
    EmptyCorpus,

    /// Another attempt on the same shared session is still running.
    #[error("a diagnosis is already in progress for this session")]
    AttemptInProgress,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("export error: {0}")]
    Export(String),
}

impl MimirError {
    pub(crate) fn parse(reason: impl Into<String>, raw: &str) -> Self {
        MimirError::Parse {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }

    /// Raw provider reply attached to a parse failure, for debugging output.
    pub fn raw_reply(&self) -> Option<&str> {
        match self {
            MimirError::Parse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Short label used for the `outcome` metric label and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            MimirError::InvalidInput(_) => "invalid_input",
            MimirError::QuotaExceeded { .. } => "quota_exceeded",
            MimirError::Provider(_) => "provider_error",
            MimirError::Parse { .. } => "parse_error",
            MimirError::EmptyCorpus => "empty_corpus",
            MimirError::AttemptInProgress => "in_progress",
            MimirError::Configuration(_) => "configuration",
            MimirError::Export(_) => "export",
        }
    }

    /// Message suitable for showing to the person who submitted the text.
    pub fn user_message(&self) -> String {
        match self {
            MimirError::InvalidInput(detail) => format!("入力内容を確認してください: {detail}"),
            MimirError::QuotaExceeded { limit } => {
                format!("診断回数の上限（{limit}回）に達しました。")
            }
            MimirError::Provider(err) if err.is_transient() => {
                format!("診断サービスに一時的に接続できませんでした。再度お試しください: {err}")
            }
            MimirError::Provider(err) => format!("診断サービスの呼び出しに失敗しました: {err}"),
            MimirError::Parse { reason, .. } => {
                format!("診断結果の解析に失敗しました: {reason}")
            }
            MimirError::EmptyCorpus => "比較用の投稿データが設定されていません。".to_string(),
            MimirError::AttemptInProgress => "診断中です。完了までお待ちください。".to_string(),
            MimirError::Configuration(detail) => format!("設定エラー: {detail}"),
            MimirError::Export(detail) => format!("履歴の書き出しに失敗しました: {detail}"),
        }
    }
}

impl From<csv::Error> for MimirError {
    fn from(err: csv::Error) -> Self {
        MimirError::Export(err.to_string())
    }
}

/// Result type alias for Mimir operations
pub type Result<T> = std::result::Result<T, MimirError>;
