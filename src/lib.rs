//! Mimir - political bias diagnosis of short opinions
//!
//! A submitted opinion is sent to an external text-generation provider with
//! a fixed output contract. The untrusted reply is parsed into a validated
//! [`Diagnosis`] (polarity, intensity, comment), compared against a small
//! reference corpus, and recorded in a per-session [`SessionLedger`] that
//! also enforces a usage quota.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use mimir::provider::{LlmDiagnosisProvider, ProviderBackend};
//! use mimir::{Diagnoser, Genre, SessionLedger};
//!
//! #[tokio::main]
//! async fn main() -> mimir::Result<()> {
//!     let provider = LlmDiagnosisProvider::new(ProviderBackend::OpenAI, Some("sk-your-key"));
//!     let diagnoser = Diagnoser::builder()
//!         .provider(Arc::new(provider))
//!         .model("gpt-4o")
//!         .build()?;
//!
//!     let mut ledger = SessionLedger::default();
//!     let report = diagnoser
//!         .diagnose(&mut ledger, "憲法改正は必要だと思う", Some(Genre::Politics))
//!         .await?;
//!
//!     println!("{} / {}", report.diagnosis.polarity(), report.diagnosis.intensity());
//!     println!("{}", ledger.export()?);
//!     Ok(())
//! }
//! ```

pub mod corpus;
pub mod diagnoser;
pub mod error;
pub mod export;
pub mod parse;
pub mod prompt;
pub mod provider;
pub mod session;
pub mod similarity;
pub mod telemetry;
pub mod types;

#[cfg(feature = "cli")]
pub mod config;

// Re-export main types at crate root
pub use corpus::ReferenceCorpus;
pub use diagnoser::{Diagnoser, DiagnoserBuilder, DiagnosisReport, MAX_INPUT_CHARS};
pub use error::{MimirError, ProviderError, Result};
pub use parse::ResponseParser;
pub use prompt::{DiagnosisRequestBuilder, Prompt};
pub use provider::DiagnosisProvider;
pub use session::{DEFAULT_MAX_USAGE, HistoryEntry, Session, SessionLedger};
pub use similarity::Comparison;

pub use types::{ContractKind, Diagnosis, Genre, LabelSet, ReferenceEntry, Scored};

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
