//! Labeled-line contract: `傾向スコア: …`, `強さスコア: …`, `コメント: …`.
//!
//! Fields are found by pattern search rather than by splitting lines, so
//! field order, surrounding prose and Markdown emphasis around a label are
//! all tolerated. Both the ASCII `:` and the full-width `：` separator are
//! accepted.
//!
//! A label may occur more than once when the model echoes the requested
//! format before answering. Each score is taken from the first occurrence
//! whose value is a complete number, so `-1.0から1.0の間の数値` never counts
//! as a score.

use regex::{Match, Regex};

use super::RawFields;
use crate::types::LabelSet;
use crate::{MimirError, Result};

/// A score directly after a label, ending at whitespace, end of text or
/// punctuation. Full-width digits and minus signs are accepted.
const NUMBER: &str = concat!(
    r"^\s*(?:\*\*)?\s*",
    r"([-+\x{2212}\x{FF0B}\x{FF0D}]?(?:[0-9０-９]+(?:[.．][0-9０-９]*)?|[.．][0-9０-９]+))",
    r"(?:\s|$|\.(?:\s|$)|[*/,，、。(（)）])",
);

/// `label`, optional `**`, then `:` or `：`, optional `**`.
fn label_pattern(label: &str) -> String {
    format!(
        r"(?i){}\s*(?:\*\*)?\s*[:：]\s*(?:\*\*)?",
        regex::escape(label)
    )
}

fn compile(pattern: String) -> Result<Regex> {
    Regex::new(&pattern)
        .map_err(|e| MimirError::Configuration(format!("invalid label pattern: {e}")))
}

/// Map full-width digits and signs to ASCII so `str::parse` accepts them.
fn fold_number(digits: &str) -> String {
    digits
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from_digit(c as u32 - '０' as u32, 10).unwrap_or(c),
            '．' => '.',
            '\u{2212}' | '－' => '-',
            '＋' => '+',
            _ => c,
        })
        .collect()
}

#[derive(Debug, Clone)]
struct LabelPattern {
    label: String,
    pattern: Regex,
    /// Longer labels of the same set that contain this one, e.g. `Bias score`
    /// for `Score`. A match starting inside one of them is not this label.
    enclosing: Vec<Regex>,
}

impl LabelPattern {
    fn compile(label: &str, set: [&str; 3]) -> Result<Self> {
        let lower = label.to_lowercase();
        let enclosing = set
            .iter()
            .filter(|other| other.len() > label.len() && other.to_lowercase().contains(&lower))
            .map(|other| compile(format!("(?i){}", regex::escape(other))))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            label: label.to_string(),
            pattern: compile(label_pattern(label))?,
            enclosing,
        })
    }

    /// Matches of this label, in text order, that are not part of a longer label.
    fn occurrences<'h>(&self, raw: &'h str) -> Vec<Match<'h>> {
        self.pattern
            .find_iter(raw)
            .filter(|found| {
                !self.enclosing.iter().any(|outer| {
                    outer
                        .find_iter(raw)
                        .any(|o| o.start() <= found.start() && found.start() < o.end())
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub(super) struct LabeledPatterns {
    polarity: LabelPattern,
    intensity: LabelPattern,
    comment: LabelPattern,
    /// Start of a line holding one of the score labels; ends a comment that
    /// was written before the scores.
    score_line: Regex,
    number: Regex,
}

impl LabeledPatterns {
    pub(super) fn compile(labels: &LabelSet) -> Result<Self> {
        let set = [
            labels.polarity.as_str(),
            labels.intensity.as_str(),
            labels.comment.as_str(),
        ];
        let score_line = format!(
            r"(?mi)^\s*(?:\*\*)?\s*(?:{}|{})\s*(?:\*\*)?\s*[:：]",
            regex::escape(&labels.polarity),
            regex::escape(&labels.intensity)
        );
        Ok(Self {
            polarity: LabelPattern::compile(&labels.polarity, set)?,
            intensity: LabelPattern::compile(&labels.intensity, set)?,
            comment: LabelPattern::compile(&labels.comment, set)?,
            score_line: compile(score_line)?,
            number: compile(NUMBER.to_string())?,
        })
    }

    pub(super) fn extract(&self, raw: &str) -> Result<RawFields> {
        let (polarity, polarity_at) = self.score(raw, &self.polarity)?;
        let (intensity, intensity_at) = self.score(raw, &self.intensity)?;
        let comment = self.comment_text(raw, polarity_at.min(intensity_at))?;
        Ok(RawFields {
            polarity,
            intensity,
            comment: comment.to_string(),
        })
    }

    /// First occurrence of `field` followed by a complete number, with the
    /// offset of its label.
    fn score(&self, raw: &str, field: &LabelPattern) -> Result<(f64, usize)> {
        let occurrences = field.occurrences(raw);
        for found in &occurrences {
            let Some(digits) = self
                .number
                .captures(&raw[found.end()..])
                .and_then(|caps| caps.get(1))
            else {
                continue;
            };
            let value = fold_number(digits.as_str()).parse::<f64>().map_err(|e| {
                MimirError::parse(format!("'{}' is not a number: {e}", field.label), raw)
            })?;
            return Ok((value, found.start()));
        }
        let reason = if occurrences.is_empty() {
            format!("missing '{}' field", field.label)
        } else {
            format!("'{}' is not a number", field.label)
        };
        Err(MimirError::parse(reason, raw))
    }

    /// Comment belonging to the score block starting at `block_start`: the
    /// first comment label at or after it, else the last one before it.
    ///
    /// The text runs from the label to the end of the reply, or to the next
    /// score line if the model put the comment first.
    fn comment_text<'a>(&self, raw: &'a str, block_start: usize) -> Result<&'a str> {
        let occurrences = self.comment.occurrences(raw);
        let found = occurrences
            .iter()
            .find(|m| m.start() >= block_start)
            .or(occurrences.last())
            .ok_or_else(|| {
                MimirError::parse(format!("missing '{}' field", self.comment.label), raw)
            })?;
        let rest = &raw[found.end()..];
        let end = self
            .score_line
            .find(rest)
            .map(|m| m.start())
            .unwrap_or(rest.len());
        Ok(rest[..end].trim())
    }
}
