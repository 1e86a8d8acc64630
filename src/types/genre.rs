//! Theme selection for a diagnosis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::MimirError;

/// The theme a submission is diagnosed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Politics,
    Economy,
    Gender,
    Other,
}

impl Genre {
    /// Every genre, in menu order.
    pub const ALL: [Genre; 4] = [Genre::Politics, Genre::Economy, Genre::Gender, Genre::Other];

    /// Stable identifier, used in exports and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Politics => "politics",
            Genre::Economy => "economy",
            Genre::Gender => "gender",
            Genre::Other => "other",
        }
    }

    /// Display label, also used inside prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Politics => "政治",
            Genre::Economy => "経済",
            Genre::Gender => "ジェンダー",
            Genre::Other => "その他",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = MimirError;

    /// Accepts either the identifier (case-insensitive) or the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Genre::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s) || g.label() == s)
            .ok_or_else(|| MimirError::InvalidInput(format!("unknown genre '{s}'")))
    }
}
