//! Nearest/farthest lookup in (polarity, intensity) space.
//!
//! Ties go to the earliest entry in corpus order, so results are
//! reproducible for a given corpus.

use serde::Serialize;

use crate::types::{ReferenceEntry, Scored};
use crate::{MimirError, Result};

/// The closest and most distant reference opinions for one probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison<'a> {
    pub nearest: &'a ReferenceEntry,
    pub farthest: &'a ReferenceEntry,
}

/// Reference entry with the smallest distance to `probe`.
pub fn nearest<'a>(probe: &dyn Scored, corpus: &'a [ReferenceEntry]) -> Result<&'a ReferenceEntry> {
    select(probe, corpus, |candidate, best| candidate < best)
}

/// Reference entry with the largest distance to `probe`.
pub fn farthest<'a>(
    probe: &dyn Scored,
    corpus: &'a [ReferenceEntry],
) -> Result<&'a ReferenceEntry> {
    select(probe, corpus, |candidate, best| candidate > best)
}

/// Both lookups at once.
pub fn compare<'a>(probe: &dyn Scored, corpus: &'a [ReferenceEntry]) -> Result<Comparison<'a>> {
    Ok(Comparison {
        nearest: nearest(probe, corpus)?,
        farthest: farthest(probe, corpus)?,
    })
}

/// Linear scan keeping the first entry for which no later entry is strictly
/// better.
fn select<'a>(
    probe: &dyn Scored,
    corpus: &'a [ReferenceEntry],
    better: impl Fn(f64, f64) -> bool,
) -> Result<&'a ReferenceEntry> {
    let mut entries = corpus.iter();
    let first = entries.next().ok_or(MimirError::EmptyCorpus)?;
    let mut best = (first, probe.distance_to(first));
    for entry in entries {
        let distance = probe.distance_to(entry);
        if better(distance, best.1) {
            best = (entry, distance);
        }
    }
    Ok(best.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_entry_is_both_nearest_and_farthest() {
        let corpus = vec![ReferenceEntry::new("only", 0.0, 0.5)];
        let probe = ReferenceEntry::new("probe", 1.0, 1.0);
        assert_eq!(nearest(&probe, &corpus).unwrap().content, "only");
        assert_eq!(farthest(&probe, &corpus).unwrap().content, "only");
    }

    #[test]
    fn ties_resolve_to_first_entry() {
        let corpus = vec![
            ReferenceEntry::new("left", -0.5, 0.5),
            ReferenceEntry::new("right", 0.5, 0.5),
        ];
        let probe = ReferenceEntry::new("probe", 0.0, 0.5);
        assert_eq!(nearest(&probe, &corpus).unwrap().content, "left");
        assert_eq!(farthest(&probe, &corpus).unwrap().content, "left");
    }

    #[test]
    fn empty_corpus_fails() {
        let probe = ReferenceEntry::new("probe", 0.0, 0.0);
        assert!(matches!(nearest(&probe, &[]), Err(MimirError::EmptyCorpus)));
        assert!(matches!(farthest(&probe, &[]), Err(MimirError::EmptyCorpus)));
        assert!(matches!(compare(&probe, &[]), Err(MimirError::EmptyCorpus)));
    }
}
