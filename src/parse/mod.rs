//! Parsing untrusted provider replies into [`Diagnosis`] records.
//!
//! The provider is a free-text generator, so nothing in its reply is trusted:
//! every field is located, type-checked and range-checked before a
//! `Diagnosis` is built. Failures never panic; they come back as
//! [`MimirError::Parse`] carrying the raw reply so callers can show it.
//!
//! Out-of-range scores are rejected, never clamped.

mod labeled;
mod structured;

use crate::types::{ContractKind, Diagnosis, ScoreField};
use crate::{MimirError, Result};

use labeled::LabeledPatterns;

/// Parser bound to one output contract.
///
/// Label patterns for the labeled-line contract are compiled once here and
/// reused for every reply.
#[derive(Debug, Clone)]
pub struct ResponseParser {
    contract: ContractKind,
    labeled: Option<LabeledPatterns>,
}

impl ResponseParser {
    pub fn new(contract: ContractKind) -> Result<Self> {
        let labeled = match &contract {
            ContractKind::Structured => None,
            ContractKind::LabeledLine(labels) => Some(LabeledPatterns::compile(labels)?),
        };
        Ok(Self { contract, labeled })
    }

    pub fn contract(&self) -> &ContractKind {
        &self.contract
    }

    /// Parse `raw` into a diagnosis of `source_text`.
    pub fn parse(&self, raw: &str, source_text: &str) -> Result<Diagnosis> {
        let fields = match &self.labeled {
            None => structured::extract(raw)?,
            Some(patterns) => patterns.extract(raw)?,
        };
        fields.validate(raw, source_text)
    }
}

/// One-shot parse without keeping the compiled parser around.
pub fn parse(raw: &str, contract: &ContractKind, source_text: &str) -> Result<Diagnosis> {
    ResponseParser::new(contract.clone())?.parse(raw, source_text)
}

/// Fields pulled out of a reply, before range validation.
///
/// Both contracts funnel through [`RawFields::validate`] so the range and
/// emptiness rules cannot drift apart.
#[derive(Debug)]
struct RawFields {
    polarity: f64,
    intensity: f64,
    comment: String,
}

impl RawFields {
    fn validate(self, raw: &str, source_text: &str) -> Result<Diagnosis> {
        let polarity = ScoreField::Polarity
            .check(self.polarity)
            .map_err(|reason| MimirError::parse(reason, raw))?;
        let intensity = ScoreField::Intensity
            .check(self.intensity)
            .map_err(|reason| MimirError::parse(reason, raw))?;
        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err(MimirError::parse("comment is empty", raw));
        }
        Ok(Diagnosis::new(polarity, intensity, comment, source_text))
    }
}
