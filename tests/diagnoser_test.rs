//! End-to-end attempt pipeline tests with mock providers.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use mimir::{
    ContractKind, Diagnoser, DiagnosisProvider, Genre, MimirError, ProviderError, ReferenceCorpus,
    ReferenceEntry, Session, SessionLedger,
};

// ============================================================================
// Mock providers
// ============================================================================

/// Replies with a fixed text and records every prompt it receives.
struct FixedReply {
    reply: String,
    calls: AtomicU32,
    prompts: Mutex<Vec<(String, String)>>,
}

impl FixedReply {
    fn new(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.into(),
            calls: AtomicU32::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }

    fn last_prompt(&self) -> Option<(String, String)> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DiagnosisProvider for FixedReply {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn complete(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), model.to_string()));
        Ok(self.reply.clone())
    }
}

/// Always fails with the given error.
struct Failing {
    fail_with: fn() -> ProviderError,
    calls: AtomicU32,
}

#[async_trait]
impl DiagnosisProvider for Failing {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _prompt: &str, _model: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Err((self.fail_with)())
    }
}

const GOOD_REPLY: &str =
    r#"{"bias_score": -0.6, "strength_score": 0.7, "comment": "憲法改正に前向きな保守的意見です。"}"#;

fn diagnoser(provider: Arc<dyn DiagnosisProvider>) -> Diagnoser {
    Diagnoser::builder().provider(provider).build().unwrap()
}

// ============================================================================
// Success path
// ============================================================================

#[tokio::test]
async fn successful_attempt_records_history() {
    let provider = FixedReply::new(GOOD_REPLY);
    let diagnoser = diagnoser(provider.clone());
    let mut ledger = SessionLedger::default();

    let report = diagnoser
        .diagnose(&mut ledger, "憲法改正は必要だと思う", Some(Genre::Politics))
        .await
        .unwrap();

    assert_eq!(report.diagnosis.polarity(), -0.6);
    assert_eq!(report.diagnosis.intensity(), 0.7);
    assert_eq!(report.diagnosis.source_text(), "憲法改正は必要だと思う");
    assert_eq!(report.genre, Some(Genre::Politics));
    assert_eq!(report.nearest.content, "憲法改正は必要だと思う");
    assert_eq!(report.farthest.content, "同性婚は法的に認めるべき");
    assert_eq!(report.remaining, 4);

    assert_eq!(provider.call_count(), 1);
    assert_eq!(ledger.usage_count(), 1);
    assert_eq!(ledger.history().len(), 1);
    assert_eq!(ledger.history()[0].diagnosis, report.diagnosis);
}

#[tokio::test]
async fn prompt_and_model_reach_provider() {
    let provider = FixedReply::new(GOOD_REPLY);
    let diagnoser = Diagnoser::builder()
        .provider(provider.clone())
        .model("gpt-4o-mini")
        .build()
        .unwrap();
    let mut ledger = SessionLedger::default();

    diagnoser
        .diagnose(&mut ledger, "防衛費はもっと増やすべきだ", None)
        .await
        .unwrap();

    let (prompt, model) = provider.last_prompt().unwrap();
    assert_eq!(model, "gpt-4o-mini");
    assert!(prompt.contains("防衛費はもっと増やすべきだ"));
    assert!(prompt.contains("bias_score"));
}

#[tokio::test]
async fn labeled_contract_end_to_end() {
    let provider = FixedReply::new("傾向スコア: 0.8\n強さスコア: 0.7\nコメント: リベラルな意見です。");
    let diagnoser = Diagnoser::builder()
        .provider(provider.clone())
        .contract(ContractKind::labeled())
        .build()
        .unwrap();
    let mut ledger = SessionLedger::default();

    let report = diagnoser
        .diagnose(&mut ledger, "同性婚は法的に認めるべき", Some(Genre::Gender))
        .await
        .unwrap();

    assert_eq!(report.diagnosis.polarity(), 0.8);
    assert_eq!(report.nearest.content, "同性婚は法的に認めるべき");
    let (prompt, _) = provider.last_prompt().unwrap();
    assert!(prompt.contains("傾向スコア"));
}

#[tokio::test]
async fn round_trip_is_independent_of_prompt_text() {
    let provider = FixedReply::new(r#"{"bias_score":-0.6,"strength_score":0.7,"comment":"..."}"#);
    let diagnoser = diagnoser(provider);
    let mut ledger = SessionLedger::default();

    let report = diagnoser
        .diagnose(&mut ledger, "憲法改正は必要だと思う", None)
        .await
        .unwrap();

    assert_eq!(report.diagnosis.polarity(), -0.6);
    assert_eq!(report.diagnosis.intensity(), 0.7);
    assert_eq!(report.diagnosis.comment(), "...");
}

#[tokio::test]
async fn custom_corpus_is_used() {
    let corpus = ReferenceCorpus::new(vec![
        ReferenceEntry::new("near", -0.5, 0.7),
        ReferenceEntry::new("far", 1.0, 0.0),
    ])
    .unwrap();
    let diagnoser = Diagnoser::builder()
        .provider(FixedReply::new(GOOD_REPLY))
        .corpus(corpus)
        .build()
        .unwrap();
    let mut ledger = SessionLedger::default();

    let report = diagnoser.diagnose(&mut ledger, "text", None).await.unwrap();
    assert_eq!(report.nearest.content, "near");
    assert_eq!(report.farthest.content, "far");
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test]
async fn invalid_input_consumes_no_quota() {
    let provider = FixedReply::new(GOOD_REPLY);
    let diagnoser = diagnoser(provider.clone());
    let mut ledger = SessionLedger::default();

    let empty = diagnoser.diagnose(&mut ledger, "  ", None).await;
    assert!(matches!(empty, Err(MimirError::InvalidInput(_))));

    let long = "あ".repeat(201);
    let oversized = diagnoser.diagnose(&mut ledger, &long, None).await;
    assert!(matches!(oversized, Err(MimirError::InvalidInput(_))));

    assert_eq!(ledger.usage_count(), 0);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn provider_failure_consumes_quota_without_history() {
    let provider = Arc::new(Failing {
        fail_with: || ProviderError::Http("connection reset".into()),
        calls: AtomicU32::new(0),
    });
    let diagnoser = diagnoser(provider.clone());
    let mut ledger = SessionLedger::default();

    let result = diagnoser.diagnose(&mut ledger, "text", None).await;
    let err = result.unwrap_err();
    assert!(matches!(err, MimirError::Provider(ProviderError::Http(_))));
    assert!(err.raw_reply().is_none());
    assert_eq!(ledger.usage_count(), 1);
    assert!(ledger.history().is_empty());
    assert_eq!(provider.calls.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn malformed_reply_consumes_quota_without_history() {
    let provider = FixedReply::new("I think this is fairly conservative.");
    let diagnoser = diagnoser(provider);
    let mut ledger = SessionLedger::default();

    let err = diagnoser
        .diagnose(&mut ledger, "text", None)
        .await
        .unwrap_err();
    assert!(matches!(err, MimirError::Parse { .. }));
    assert_eq!(err.raw_reply(), Some("I think this is fairly conservative."));
    assert_eq!(ledger.usage_count(), 1);
    assert!(ledger.history().is_empty());
}

#[tokio::test]
async fn out_of_range_reply_is_not_recorded() {
    let provider = FixedReply::new(r#"{"bias_score": -3, "strength_score": 0.7, "comment": "c"}"#);
    let diagnoser = diagnoser(provider);
    let mut ledger = SessionLedger::default();

    let result = diagnoser.diagnose(&mut ledger, "text", None).await;
    assert!(matches!(result, Err(MimirError::Parse { .. })));
    assert!(ledger.history().is_empty());
}

#[tokio::test]
async fn quota_exhaustion_stops_provider_calls() {
    let provider = FixedReply::new(GOOD_REPLY);
    let diagnoser = diagnoser(provider.clone());
    let mut ledger = SessionLedger::new(2);

    assert!(diagnoser.diagnose(&mut ledger, "one", None).await.is_ok());
    assert!(diagnoser.diagnose(&mut ledger, "two", None).await.is_ok());
    let third = diagnoser.diagnose(&mut ledger, "three", None).await;

    assert!(matches!(third, Err(MimirError::QuotaExceeded { limit: 2 })));
    assert_eq!(provider.call_count(), 2);
    assert_eq!(ledger.history().len(), 2);
    assert_eq!(ledger.usage_count(), 3);
}

#[tokio::test]
async fn failed_attempts_count_toward_quota() {
    let provider = Arc::new(Failing {
        fail_with: || ProviderError::RateLimited { retry_after: None },
        calls: AtomicU32::new(0),
    });
    let diagnoser = diagnoser(provider.clone());
    let mut ledger = SessionLedger::default();

    for _ in 0..5 {
        let result = diagnoser.diagnose(&mut ledger, "text", None).await;
        assert!(matches!(result, Err(MimirError::Provider(_))));
    }
    let result = diagnoser.diagnose(&mut ledger, "text", None).await;
    assert!(matches!(result, Err(MimirError::QuotaExceeded { .. })));
    assert_eq!(provider.calls.load(Ordering::Relaxed), 5);
}

// ============================================================================
// Shared sessions
// ============================================================================

#[tokio::test]
async fn shared_session_runs_attempt() {
    let diagnoser = diagnoser(FixedReply::new(GOOD_REPLY));
    let session = Session::default();

    let report = diagnoser
        .diagnose_shared(&session, "text", None)
        .await
        .unwrap();
    assert_eq!(report.remaining, 4);
    assert_eq!(session.snapshot().await.history().len(), 1);
}

#[tokio::test]
async fn shared_session_refuses_overlap() {
    let diagnoser = diagnoser(FixedReply::new(GOOD_REPLY));
    let session = Session::default();

    let _held = session.begin().unwrap();
    let result = diagnoser.diagnose_shared(&session, "text", None).await;
    assert!(matches!(result, Err(MimirError::AttemptInProgress)));
}
