//! Reference corpus of pre-labeled sample opinions.

use crate::types::{ReferenceEntry, ScoreField};
use crate::{MimirError, Result};

/// A fixed set of labeled sample opinions, loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCorpus {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceCorpus {
    /// Build a corpus from explicit entries.
    ///
    /// Rejects an empty list and any entry whose scores are out of range.
    pub fn new(entries: Vec<ReferenceEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(MimirError::EmptyCorpus);
        }
        for entry in &entries {
            ScoreField::Polarity
                .check(entry.polarity)
                .and_then(|_| ScoreField::Intensity.check(entry.intensity))
                .map_err(|e| {
                    MimirError::Configuration(format!("reference entry '{}': {e}", entry.content))
                })?;
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ReferenceCorpus {
    /// The four built-in sample opinions.
    fn default() -> Self {
        Self {
            entries: vec![
                ReferenceEntry::new("憲法改正は必要だと思う", -0.6, 0.7),
                ReferenceEntry::new("夫婦別姓制度は導入されるべきだ", 0.5, 0.6),
                ReferenceEntry::new("防衛費はもっと増やすべきだ", -0.8, 0.9),
                ReferenceEntry::new("同性婚は法的に認めるべき", 0.8, 0.7),
            ],
        }
    }
}

impl AsRef<[ReferenceEntry]> for ReferenceCorpus {
    fn as_ref(&self) -> &[ReferenceEntry] {
        &self.entries
    }
}
