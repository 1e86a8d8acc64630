//! The diagnosis attempt pipeline.
//!
//! One attempt runs, in order: input validation, prompt construction, quota
//! check, provider call, reply parsing, corpus comparison, and finally the
//! ledger append. Each step can end the attempt with a typed error; only a
//! fully successful attempt touches the history.
//!
//! Quota is charged at the quota check, before the provider is called, and
//! is not refunded if the provider or the parser fails afterwards. Invalid
//! input never reaches the quota check.

mod builder;

pub use builder::DiagnoserBuilder;

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::corpus::ReferenceCorpus;
use crate::parse::ResponseParser;
use crate::prompt::{DiagnosisRequestBuilder, Prompt};
use crate::provider::DiagnosisProvider;
use crate::session::{Session, SessionLedger};
use crate::types::{ContractKind, Diagnosis, Genre, ReferenceEntry};
use crate::{MimirError, Result, similarity, telemetry};

/// Maximum accepted submission length, in characters.
pub const MAX_INPUT_CHARS: usize = 200;

/// Everything the presentation layer needs after a successful attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisReport {
    pub diagnosis: Diagnosis,
    pub genre: Option<Genre>,
    pub nearest: ReferenceEntry,
    pub farthest: ReferenceEntry,
    /// Attempts left in the session after this one.
    pub remaining: u32,
}

/// Runs diagnosis attempts against one provider, model and contract.
///
/// Holds no session state; the ledger is passed into every call.
pub struct Diagnoser {
    provider: Arc<dyn DiagnosisProvider>,
    model: String,
    requests: DiagnosisRequestBuilder,
    parser: ResponseParser,
    corpus: ReferenceCorpus,
}

impl Diagnoser {
    pub fn builder() -> DiagnoserBuilder {
        DiagnoserBuilder::new()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn contract(&self) -> &ContractKind {
        self.parser.contract()
    }

    pub fn corpus(&self) -> &ReferenceCorpus {
        &self.corpus
    }

    /// Run one attempt for `text` against `ledger`.
    #[instrument(
        name = "mimir.diagnose",
        skip(self, ledger, text),
        fields(provider = %self.provider.name(), model = %self.model, genre = ?genre)
    )]
    pub async fn diagnose(
        &self,
        ledger: &mut SessionLedger,
        text: &str,
        genre: Option<Genre>,
    ) -> Result<DiagnosisReport> {
        let result = self.attempt(ledger, text, genre).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::counter!(telemetry::ATTEMPTS_TOTAL, "outcome" => outcome).increment(1);
        result
    }

    /// Like [`diagnose`](Self::diagnose), for a session shared between
    /// tasks. Fails with `AttemptInProgress` if the session is busy.
    pub async fn diagnose_shared(
        &self,
        session: &Session,
        text: &str,
        genre: Option<Genre>,
    ) -> Result<DiagnosisReport> {
        let mut ledger = session.begin()?;
        self.diagnose(&mut ledger, text, genre).await
    }

    async fn attempt(
        &self,
        ledger: &mut SessionLedger,
        text: &str,
        genre: Option<Genre>,
    ) -> Result<DiagnosisReport> {
        validate_input(text)?;
        let prompt = self.requests.build(text, genre)?;

        if !ledger.record_attempt() {
            metrics::counter!(telemetry::QUOTA_REJECTIONS_TOTAL).increment(1);
            warn!(
                limit = ledger.max_usage(),
                used = ledger.usage_count(),
                "usage limit reached"
            );
            return Err(MimirError::QuotaExceeded {
                limit: ledger.max_usage(),
            });
        }

        let raw = self.call_provider(&prompt).await?;

        let diagnosis = self.parser.parse(&raw, text).inspect_err(|e| {
            warn!(error = %e, "provider reply rejected");
            debug!(raw = %raw, "rejected reply");
        })?;

        let comparison = similarity::compare(&diagnosis, self.corpus.entries())?;
        let nearest = comparison.nearest.clone();
        let farthest = comparison.farthest.clone();

        info!(
            polarity = diagnosis.polarity(),
            intensity = diagnosis.intensity(),
            nearest = %nearest.content,
            "diagnosis recorded"
        );
        ledger.append(diagnosis.clone(), genre);

        Ok(DiagnosisReport {
            diagnosis,
            genre,
            nearest,
            farthest,
            remaining: ledger.remaining(),
        })
    }

    async fn call_provider(&self, prompt: &Prompt) -> Result<String> {
        let start = Instant::now();
        let result = self.provider.complete(prompt.as_str(), &self.model).await;
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::histogram!(telemetry::PROVIDER_DURATION_SECONDS,
            "provider" => self.provider.name().to_owned(),
            "status" => status,
        )
        .record(start.elapsed().as_secs_f64());

        result.map_err(|e| {
            warn!(error = %e, transient = e.is_transient(), "provider call failed");
            MimirError::Provider(e)
        })
    }
}

/// Reject empty or oversized submissions before any quota is charged.
pub fn validate_input(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(MimirError::InvalidInput("text is empty".to_string()));
    }
    let chars = text.chars().count();
    if chars > MAX_INPUT_CHARS {
        return Err(MimirError::InvalidInput(format!(
            "text is {chars} characters, limit is {MAX_INPUT_CHARS}"
        )));
    }
    Ok(())
}
