//! World-coordinate ranges.

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    /// Expand the range to include a value. Non-finite values are ignored.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Clamp a value into the range.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Add a margin of `frac` times the span on both ends.
    pub fn padded(&self, frac: f64) -> Self {
        let padding = self.span().abs() * frac;
        Self {
            min: self.min - padding,
            max: self.max + padding,
        }
    }

    /// Add a margin of `frac` times the span in log10 space.
    ///
    /// Both bounds must be positive.
    pub fn padded_log10(&self, frac: f64) -> Self {
        let lo = self.min.log10();
        let hi = self.max.log10();
        let padding = (hi - lo).abs() * frac;
        Self {
            min: 10_f64.powf(lo - padding),
            max: 10_f64.powf(hi + padding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_swaps_reversed_bounds() {
        let range = Range::new(3.0, -1.0);
        assert_eq!(range.min, -1.0);
        assert_eq!(range.max, 3.0);
        assert_eq!(range.span(), 4.0);
    }

    #[test]
    fn expand_ignores_infinite_values() {
        let mut range = Range::new(0.0, 1.0);
        range.expand_to_include(f64::INFINITY);
        range.expand_to_include(f64::NAN);
        range.expand_to_include(-2.0);
        assert_eq!(range, Range::new(-2.0, 1.0));
    }

    #[test]
    fn clamp_limits_to_bounds() {
        let range = Range::new(-1.0, 1.0);
        assert_eq!(range.clamp(5.0), 1.0);
        assert_eq!(range.clamp(-5.0), -1.0);
        assert_eq!(range.clamp(0.25), 0.25);
    }

    #[test]
    fn padding_adds_five_percent() {
        let padded = Range::new(0.0, 10.0).padded(0.05);
        assert!((padded.min + 0.5).abs() < 1e-12);
        assert!((padded.max - 10.5).abs() < 1e-12);
    }

    #[test]
    fn log_padding_is_symmetric_in_decades() {
        let padded = Range::new(1.0, 100.0).padded_log10(0.05);
        assert!((padded.min.log10() + 0.1).abs() < 1e-12);
        assert!((padded.max.log10() - 2.1).abs() < 1e-12);
    }
}
