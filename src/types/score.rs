//! Score ranges and the two-dimensional score space.

use std::ops::RangeInclusive;

/// Valid polarity range: −1.0 (conservative) to +1.0 (liberal).
pub const POLARITY_RANGE: RangeInclusive<f64> = -1.0..=1.0;

/// Valid intensity range: 0.0 (mild) to 1.0 (strong).
pub const INTENSITY_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// A point in (polarity, intensity) space.
///
/// Implemented by both [`Diagnosis`](super::Diagnosis) and
/// [`ReferenceEntry`](super::ReferenceEntry) so either can be compared
/// against the reference corpus.
pub trait Scored {
    fn polarity(&self) -> f64;
    fn intensity(&self) -> f64;

    /// Euclidean distance to another point.
    fn distance_to(&self, other: &dyn Scored) -> f64 {
        let dp = self.polarity() - other.polarity();
        let di = self.intensity() - other.intensity();
        (dp * dp + di * di).sqrt()
    }
}

/// Which score a range check refers to, for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScoreField {
    Polarity,
    Intensity,
}

impl ScoreField {
    fn range(self) -> RangeInclusive<f64> {
        match self {
            ScoreField::Polarity => POLARITY_RANGE,
            ScoreField::Intensity => INTENSITY_RANGE,
        }
    }

    fn name(self) -> &'static str {
        match self {
            ScoreField::Polarity => "polarity",
            ScoreField::Intensity => "intensity",
        }
    }

    /// Reject values outside the field's range. NaN is always rejected.
    pub(crate) fn check(self, value: f64) -> Result<f64, String> {
        let range = self.range();
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(format!(
                "{} {value} outside [{}, {}]",
                self.name(),
                range.start(),
                range.end()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point(f64, f64);

    impl Scored for Point {
        fn polarity(&self) -> f64 {
            self.0
        }
        fn intensity(&self) -> f64 {
            self.1
        }
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point(0.0, 0.0);
        let b = Point(0.6, 0.8);
        assert!((a.distance_to(&b) - 1.0).abs() < 1e-12);
        assert!((b.distance_to(&a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert_eq!(ScoreField::Polarity.check(-1.0), Ok(-1.0));
        assert_eq!(ScoreField::Polarity.check(1.0), Ok(1.0));
        assert_eq!(ScoreField::Intensity.check(0.0), Ok(0.0));
        assert!(ScoreField::Intensity.check(-0.01).is_err());
        assert!(ScoreField::Polarity.check(1.5).is_err());
    }

    #[test]
    fn nan_is_rejected() {
        assert!(ScoreField::Polarity.check(f64::NAN).is_err());
        assert!(ScoreField::Intensity.check(f64::NAN).is_err());
    }
}
