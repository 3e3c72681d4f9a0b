//! Axis scaling: autoscale range finalisation, tick placement and labels.

use crate::axis::{Axis, AxisId, AxisScale};
use crate::config::PlotConfig;
use crate::error::{PlotError, PlotResult};
use crate::range::Range;

/// Mantissas of "nice" tick steps.
const NICE_STEPS: [f64; 3] = [1.0, 2.0, 5.0];

/// Upper bound for significant digits in tick labels.
const MAX_DIGITS: usize = 15;

/// Measures rendered text extents.
pub trait TextMeasurer {
    /// Width and height of `text` at font size `size`.
    fn measure(&self, text: &str, size: f32) -> (f32, f32);
}

/// Text measurer that assumes a fixed advance per character.
///
/// Useful for headless rendering and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMetrics {
    /// Advance per character as a fraction of the font size.
    pub advance: f32,
    /// Line height as a fraction of the font size.
    pub line_height: f32,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl TextMeasurer for FixedMetrics {
    fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        let chars = text.chars().count() as f32;
        (chars * size * self.advance, size * self.line_height)
    }
}

/// A labelled tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// World value.
    pub value: f64,
    /// Label text.
    pub label: String,
}

/// Ticks of one axis with their largest label extent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisLayout {
    /// Ticks inside the axis range, ascending.
    pub ticks: Vec<Tick>,
    /// Largest label width and height.
    pub max_label_size: (f32, f32),
}

impl AxisLayout {
    /// Compute ticks and labels for an axis drawn over `pixel_len` pixels.
    pub fn compute(
        axis: &Axis,
        pixel_len: f32,
        config: &PlotConfig,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let range = axis.range();
        let max_ticks = tick_budget(pixel_len, config);
        let ticks = match axis.scale() {
            AxisScale::Linear => {
                // Steps are chosen in the display unit so that e.g. degrees
                // get 50° rather than 1 rad increments.
                let (shown, multiplier) = match axis.unit {
                    Some(unit) => (
                        Range::new(unit.from_base(range.min), unit.from_base(range.max)),
                        unit.multiplier,
                    ),
                    None => (range, 1.0),
                };
                let (values, step) = linear_ticks(shown, max_ticks);
                let digits = label_digits(&values, step, axis.precision);
                values
                    .into_iter()
                    .map(|value| Tick {
                        value: value * multiplier,
                        label: format_general(value, digits),
                    })
                    .collect::<Vec<_>>()
            }
            AxisScale::Log10 => log_ticks(range, max_ticks)
                .into_iter()
                .map(|value| Tick {
                    value,
                    label: format_decade(value),
                })
                .collect(),
        };

        let mut max_label_size = (0.0_f32, 0.0_f32);
        for tick in &ticks {
            let (w, h) = measurer.measure(&tick.label, config.label_size);
            max_label_size.0 = max_label_size.0.max(w);
            max_label_size.1 = max_label_size.1.max(h);
        }
        Self {
            ticks,
            max_label_size,
        }
    }
}

fn tick_budget(pixel_len: f32, config: &PlotConfig) -> usize {
    let by_space = if config.min_tick_spacing > 0.0 {
        (pixel_len.max(0.0) / config.min_tick_spacing).floor() as usize + 1
    } else {
        usize::MAX
    };
    config.max_ticks.min(by_space).max(2)
}

/// Ticks on a linear range at a `{1,2,5}×10^n` step, at most `max_ticks`.
///
/// Returns the tick values and the chosen step. When no step leaves two
/// ticks inside the range the range ends are used.
pub fn linear_ticks(range: Range, max_ticks: usize) -> (Vec<f64>, f64) {
    let max_ticks = max_ticks.max(2);
    if !range.is_valid() {
        return (Vec::new(), 0.0);
    }
    let span = range.span();
    let mut exponent = (span / max_ticks as f64).log10().floor() as i32 - 1;
    let mut step = span;
    'search: for _ in 0..8 {
        let decade = pow10(exponent);
        for mantissa in NICE_STEPS {
            let candidate = mantissa * decade;
            let (first, last) = tick_index_bounds(range, candidate);
            if last - first + 1 <= max_ticks as i64 {
                step = candidate;
                break 'search;
            }
        }
        exponent += 1;
    }

    let (first, last) = tick_index_bounds(range, step);
    if last - first + 1 < 2 {
        return (vec![range.min, range.max], span);
    }
    let values = (first..=last)
        .map(|i| {
            let value = i as f64 * step;
            if value.abs() < step * 1e-9 { 0.0 } else { value }
        })
        .collect();
    (values, step)
}

fn tick_index_bounds(range: Range, step: f64) -> (i64, i64) {
    let first = (range.min / step - 1e-9).ceil() as i64;
    let last = (range.max / step + 1e-9).floor() as i64;
    (first, last)
}

/// Exact powers of ten for negative exponents too (`pow10(-6) == 1e-6`).
fn pow10(exponent: i32) -> f64 {
    if exponent >= 0 {
        10_f64.powi(exponent)
    } else {
        1.0 / 10_f64.powi(-exponent)
    }
}

/// Ticks on a logarithmic range.
///
/// Decade boundaries are used when at least two fall inside the range
/// (thinned to every k-th decade to respect `max_ticks`); otherwise
/// `{1,2,5}×10^n` ticks, and linear ticks as a last resort.
pub fn log_ticks(range: Range, max_ticks: usize) -> Vec<f64> {
    let max_ticks = max_ticks.max(2);
    if !range.is_valid() || range.min <= 0.0 {
        return Vec::new();
    }
    let lo = range.min.log10();
    let hi = range.max.log10();
    let first = (lo - 1e-9).ceil() as i32;
    let last = (hi + 1e-9).floor() as i32;

    if last - first + 1 >= 2 {
        let decades = (last - first + 1) as usize;
        let stride = decades.div_ceil(max_ticks) as i32;
        return (first..=last)
            .filter(|decade| (decade - first) % stride == 0)
            .map(pow10)
            .collect();
    }

    let mut values = Vec::new();
    for exponent in (lo.floor() as i32)..=(hi.ceil() as i32) {
        for mantissa in NICE_STEPS {
            let value = mantissa * pow10(exponent);
            if value >= range.min * (1.0 - 1e-9) && value <= range.max * (1.0 + 1e-9) {
                values.push(value);
            }
        }
    }
    if values.len() > max_ticks {
        let stride = values.len().div_ceil(max_ticks);
        values = values.into_iter().step_by(stride).collect();
    }
    if values.len() >= 2 {
        values
    } else {
        linear_ticks(range, max_ticks).0
    }
}

/// Significant digits needed so that neighbouring linear ticks differ.
fn label_digits(values: &[f64], step: f64, precision: usize) -> usize {
    let largest = values.iter().map(|value| value.abs()).fold(0.0_f64, f64::max);
    if largest <= 0.0 || step <= 0.0 {
        return precision.clamp(1, MAX_DIGITS);
    }
    let needed = largest.log10().floor() - step.log10().floor() + 1.0;
    let needed = if needed.is_finite() && needed > 0.0 {
        needed as usize
    } else {
        1
    };
    precision.max(needed).clamp(1, MAX_DIGITS)
}

/// Format with `digits` significant digits in the manner of C's `%G`:
/// fixed notation for moderate exponents, scientific otherwise, trailing
/// zeros trimmed.
pub fn format_general(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let digits = digits.clamp(1, MAX_DIGITS);
    let exponent = scientific_exponent(value, digits);
    if exponent < -4 || exponent >= digits as i32 {
        scientific(value, digits)
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_zeros(format!("{value:.decimals$}"))
    }
}

/// Format a log-axis tick (`0.01`, `1`, `1000`, `1e6`).
pub fn format_decade(value: f64) -> String {
    if value > 0.0 && (1e-3..1e5).contains(&value) {
        format_general(value, 6)
    } else {
        scientific(value, 3)
    }
}

fn scientific_exponent(value: f64, digits: usize) -> i32 {
    // The exponent after rounding to `digits`, e.g. 9.99 at 2 digits is 1e1.
    let formatted = format!("{:.*e}", digits - 1, value);
    formatted
        .split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0)
}

fn scientific(value: f64, digits: usize) -> String {
    let formatted = format!("{:.*e}", digits.max(1) - 1, value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => format!("{}e{exponent}", trim_zeros(mantissa.to_string())),
        None => formatted,
    }
}

fn trim_zeros(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Turn the observed data extent into the final autoscaled range.
///
/// `None` means no finite sample was seen; a fallback range is returned.
pub(crate) fn autoscale_range(
    extent: Option<Range>,
    scale: AxisScale,
    margin: f64,
    id: AxisId,
) -> PlotResult<Range> {
    let Some(extent) = extent else {
        tracing::debug!(axis = %id, "no finite samples, using fallback range");
        return Ok(match scale {
            AxisScale::Linear => Range::new(-1.0, 1.0),
            AxisScale::Log10 => Range::new(0.1, 10.0),
        });
    };
    if extent.span() <= 0.0 {
        return Err(PlotError::DegenerateRange {
            axis: id,
            start: extent.min,
            stop: extent.max,
        });
    }
    let padded = match scale {
        AxisScale::Linear => extent.padded(margin),
        AxisScale::Log10 => extent.padded_log10(margin),
    };
    // A margin past the largest float is dropped on that side.
    let limits = Range::new(-f64::MAX, f64::MAX);
    let range = Range::new(limits.clamp(padded.min), limits.clamp(padded.max));
    if !range.span().is_finite() {
        return Err(PlotError::NonFiniteBound {
            axis: id,
            start: range.min,
            stop: range.max,
        });
    }
    Ok(range)
}

/// Store an autoscaled range on an axis, keeping its orientation.
pub(crate) fn apply_range(axis: &mut Axis, range: Range) {
    if axis.start > axis.stop {
        axis.start = range.max;
        axis.stop = range.min;
    } else {
        axis.start = range.min;
        axis.stop = range.max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::FREQUENCY_UNITS;

    #[test]
    fn linear_ticks_use_nice_steps() {
        let (values, step) = linear_ticks(Range::new(0.0, 10_000.0), 10);
        assert_eq!(step, 2000.0);
        assert_eq!(values, vec![0.0, 2000.0, 4000.0, 6000.0, 8000.0, 10_000.0]);

        let (values, step) = linear_ticks(Range::new(-0.93, 0.47), 10);
        assert!((step - 0.2).abs() < 1e-12);
        assert_eq!(values.len(), 7);
        assert!(values.iter().any(|value| *value == 0.0));
    }

    #[test]
    fn linear_ticks_respect_budget() {
        for max in 2..=12 {
            let (values, _) = linear_ticks(Range::new(-3.7, 123.4), max);
            assert!(values.len() <= max, "{} ticks for budget {max}", values.len());
            assert!(values.len() >= 2);
        }
    }

    #[test]
    fn log_ticks_prefer_decades() {
        let values = log_ticks(Range::new(1.0, 1000.0), 10);
        assert_eq!(values, vec![1.0, 10.0, 100.0, 1000.0]);

        let values = log_ticks(Range::new(1e-6, 1e12), 5);
        assert!(values.len() <= 5);
        assert_eq!(values[0], 1e-6);
    }

    #[test]
    fn narrow_log_range_uses_mantissas() {
        let values = log_ticks(Range::new(15.0, 300.0), 10);
        assert_eq!(values, vec![20.0, 50.0, 100.0, 200.0]);
    }

    #[test]
    fn general_format_matches_percent_g() {
        assert_eq!(format_general(0.5, 4), "0.5");
        assert_eq!(format_general(1234.5678, 4), "1235");
        assert_eq!(format_general(12346.0, 4), "1.235e4");
        assert_eq!(format_general(-0.000012, 3), "-1.2e-5");
        assert_eq!(format_general(0.0001, 3), "0.0001");
        assert_eq!(format_general(0.0, 3), "0");
        assert_eq!(format_general(9.999, 2), "10");
    }

    #[test]
    fn decade_labels() {
        assert_eq!(format_decade(0.01), "0.01");
        assert_eq!(format_decade(1.0), "1");
        assert_eq!(format_decade(1000.0), "1000");
        assert_eq!(format_decade(1e6), "1e6");
        assert_eq!(format_decade(1e-6), "1e-6");
    }

    #[test]
    fn labels_use_unit_multiplier() {
        let axis = Axis::new("f", 0.0, 10_000.0).with_unit(FREQUENCY_UNITS[1]);
        let layout = AxisLayout::compute(&axis, 400.0, &PlotConfig::default(), &FixedMetrics::default());
        let labels: Vec<&str> = layout.ticks.iter().map(|tick| tick.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "2", "4", "6", "8", "10"]);
        assert_eq!(layout.ticks[1].value, 2000.0);
        assert!(layout.max_label_size.0 > 0.0);
    }

    #[test]
    fn degree_axis_steps_in_degrees() {
        let axis = Axis::new("phase", -std::f64::consts::PI, std::f64::consts::PI)
            .with_unit(crate::units::PHASE_UNITS[1]);
        let layout = AxisLayout::compute(&axis, 300.0, &PlotConfig::default(), &FixedMetrics::default());
        let labels: Vec<&str> = layout.ticks.iter().map(|tick| tick.label.as_str()).collect();
        assert_eq!(labels, vec!["-150", "-100", "-50", "0", "50", "100", "150"]);
    }

    #[test]
    fn precision_grows_to_separate_ticks() {
        let axis = Axis::new("x", 1000.0, 1000.5).with_precision(2);
        let layout = AxisLayout::compute(&axis, 400.0, &PlotConfig::default(), &FixedMetrics::default());
        let mut labels: Vec<&str> = layout.ticks.iter().map(|tick| tick.label.as_str()).collect();
        let count = labels.len();
        labels.dedup();
        assert_eq!(labels.len(), count);
        assert_eq!(labels[0], "1000");
    }

    #[test]
    fn short_axis_gets_fewer_ticks() {
        let axis = Axis::new("x", 0.0, 100.0);
        let config = PlotConfig::default();
        let layout = AxisLayout::compute(&axis, 90.0, &config, &FixedMetrics::default());
        assert!(layout.ticks.len() <= 3);
    }

    #[test]
    fn autoscale_pads_and_rejects_flat_data() {
        let range = autoscale_range(Some(Range::new(0.0, 2.0)), AxisScale::Linear, 0.05, AxisId::Y)
            .unwrap();
        assert!((range.min + 0.1).abs() < 1e-12);
        assert!((range.max - 2.1).abs() < 1e-12);

        let fallback = autoscale_range(None, AxisScale::Log10, 0.05, AxisId::Y).unwrap();
        assert!(fallback.min < fallback.max);

        let flat = autoscale_range(Some(Range::new(3.0, 3.0)), AxisScale::Linear, 0.05, AxisId::Y);
        assert!(matches!(flat, Err(PlotError::DegenerateRange { .. })));
    }

    #[test]
    fn autoscale_margin_stops_at_largest_float() {
        let near_top = Range::new(0.9 * f64::MAX, f64::MAX);
        let range = autoscale_range(Some(near_top), AxisScale::Linear, 0.05, AxisId::Y).unwrap();
        assert_eq!(range.max, f64::MAX);
        assert!(range.min < near_top.min && range.span().is_finite());

        let huge = autoscale_range(Some(Range::new(1.0, f64::MAX)), AxisScale::Log10, 0.05, AxisId::Y)
            .unwrap();
        assert_eq!(huge.max, f64::MAX);
        assert!(huge.min > 0.0 && huge.min < 1.0);

        let full = Range::new(-f64::MAX, f64::MAX);
        let overflow = autoscale_range(Some(full), AxisScale::Linear, 0.05, AxisId::Y);
        assert!(matches!(
            overflow,
            Err(PlotError::NonFiniteBound { axis: AxisId::Y, .. })
        ));
    }

    #[test]
    fn apply_range_keeps_orientation() {
        let mut axis = Axis::new("y", 10.0, -10.0);
        apply_range(&mut axis, Range::new(-1.0, 1.0));
        assert_eq!((axis.start, axis.stop), (1.0, -1.0));
    }
}
