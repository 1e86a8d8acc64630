//! Builder for configuring diagnoser instances

use std::sync::Arc;

use super::Diagnoser;
use crate::corpus::ReferenceCorpus;
use crate::parse::ResponseParser;
use crate::prompt::DiagnosisRequestBuilder;
use crate::provider::{DEFAULT_MODEL, DiagnosisProvider};
use crate::types::ContractKind;
use crate::{MimirError, Result};

/// Builder for [`Diagnoser`].
pub struct DiagnoserBuilder {
    provider: Option<Arc<dyn DiagnosisProvider>>,
    model: String,
    contract: ContractKind,
    corpus: ReferenceCorpus,
}

impl DiagnoserBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            model: DEFAULT_MODEL.to_string(),
            contract: ContractKind::default(),
            corpus: ReferenceCorpus::default(),
        }
    }

    /// Provider that answers prompts. Required.
    pub fn provider(mut self, provider: Arc<dyn DiagnosisProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Model identifier passed to the provider (default: `gpt-4o`).
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Output contract requested in prompts and expected from replies.
    pub fn contract(mut self, contract: ContractKind) -> Self {
        self.contract = contract;
        self
    }

    /// Replace the built-in reference corpus.
    pub fn corpus(mut self, corpus: ReferenceCorpus) -> Self {
        self.corpus = corpus;
        self
    }

    pub fn build(self) -> Result<Diagnoser> {
        let provider = self
            .provider
            .ok_or_else(|| MimirError::Configuration("no provider configured".to_string()))?;
        if self.model.trim().is_empty() {
            return Err(MimirError::Configuration("model is empty".to_string()));
        }
        let parser = ResponseParser::new(self.contract.clone())?;
        Ok(Diagnoser {
            provider,
            model: self.model,
            requests: DiagnosisRequestBuilder::new(self.contract),
            parser,
            corpus: self.corpus,
        })
    }
}

impl Default for DiagnoserBuilder {
    fn default() -> Self {
        Self::new()
    }
}
