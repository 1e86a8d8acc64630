//! Pre-labeled sample opinions.

use serde::{Deserialize, Serialize};

use super::score::Scored;

/// A labeled sample opinion from the reference corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub content: String,
    pub polarity: f64,
    pub intensity: f64,
}

impl ReferenceEntry {
    pub fn new(content: impl Into<String>, polarity: f64, intensity: f64) -> Self {
        Self {
            content: content.into(),
            polarity,
            intensity,
        }
    }
}

impl Scored for ReferenceEntry {
    fn polarity(&self) -> f64 {
        self.polarity
    }

    fn intensity(&self) -> f64 {
        self.intensity
    }
}
