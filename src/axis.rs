//! Axis description: range, scale, unit and label settings.

use std::fmt;

use crate::error::{PlotError, PlotResult};
use crate::range::Range;
use crate::units::Unit;

/// Smallest bound accepted on a logarithmic axis. Non-positive bounds are
/// replaced by this value.
pub const LOG_TOLERANCE: f64 = 1e-12;

/// Axis scale type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisScale {
    /// Linear scaling.
    #[default]
    Linear,
    /// Base-10 logarithmic scaling.
    Log10,
}

impl AxisScale {
    /// Map a value into axis space.
    pub fn map_value(self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match self {
            Self::Linear => Some(value),
            Self::Log10 => {
                if value <= 0.0 {
                    None
                } else {
                    Some(value.log10())
                }
            }
        }
    }

    /// Check whether this is a logarithmic scale.
    pub fn is_log(self) -> bool {
        self == Self::Log10
    }
}

/// Identifies the axis an error or layout refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisId {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// Per-axis option flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisFlags {
    /// Logarithmic scale.
    pub log: bool,
    /// Draw grid lines at the ticks.
    pub grid: bool,
    /// Derive the range from the data.
    pub autoscale: bool,
}

/// One dimension of a plot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Axis {
    /// Axis name, may contain simple markup (`<i>f</i>`).
    pub name: String,
    /// Unit used for tick labels and the title.
    pub unit: Option<Unit>,
    /// World value at the left/bottom end.
    pub start: f64,
    /// World value at the right/top end.
    pub stop: f64,
    /// Option flags.
    pub flags: AxisFlags,
    /// Significant digits for tick labels.
    pub precision: usize,
}

impl Axis {
    /// Create a linear axis over `[start, stop]`.
    pub fn new(name: impl Into<String>, start: f64, stop: f64) -> Self {
        Self {
            name: name.into(),
            unit: None,
            start,
            stop,
            flags: AxisFlags::default(),
            precision: 4,
        }
    }

    /// Set the unit.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Switch to a logarithmic scale.
    pub fn logarithmic(mut self, log: bool) -> Self {
        self.flags.log = log;
        self
    }

    /// Toggle grid lines.
    pub fn with_grid(mut self, grid: bool) -> Self {
        self.flags.grid = grid;
        self
    }

    /// Toggle autoscaling.
    pub fn autoscaled(mut self, autoscale: bool) -> Self {
        self.flags.autoscale = autoscale;
        self
    }

    /// Set the label precision in significant digits.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Access the axis scale.
    pub fn scale(&self) -> AxisScale {
        if self.flags.log {
            AxisScale::Log10
        } else {
            AxisScale::Linear
        }
    }

    /// Current range (normalised so `min <= max`).
    pub fn range(&self) -> Range {
        Range::new(self.start, self.stop)
    }

    /// Title text: the name without markup, followed by the unit.
    pub fn title(&self) -> Option<String> {
        let name = strip_markup(&self.name);
        match (name.is_empty(), self.unit) {
            (false, Some(unit)) => Some(format!("{name} [{}]", unit.name)),
            (false, None) => Some(name),
            (true, Some(unit)) => Some(format!("[{}]", unit.name)),
            (true, None) => None,
        }
    }

    /// Check the bounds and apply the log-axis leniency.
    ///
    /// Non-positive bounds of a logarithmic axis are replaced by
    /// [`LOG_TOLERANCE`]; the axis is rejected only when both bounds are
    /// non-positive. Bounds whose span overflows count as non-finite.
    pub(crate) fn validate(&mut self, id: AxisId) -> PlotResult<()> {
        let (start, stop) = (self.start, self.stop);
        if !(stop - start).is_finite() {
            return Err(PlotError::NonFiniteBound {
                axis: id,
                start,
                stop,
            });
        }
        if self.flags.log {
            if start <= 0.0 && stop <= 0.0 {
                return Err(PlotError::LogRange {
                    axis: id,
                    start,
                    stop,
                });
            }
            if start <= 0.0 || stop <= 0.0 {
                tracing::warn!(axis = %id, start, stop, "clamping non-positive log axis bound");
                self.start = start.max(LOG_TOLERANCE);
                self.stop = stop.max(LOG_TOLERANCE);
            }
        }
        if self.start == self.stop {
            return Err(PlotError::DegenerateRange {
                axis: id,
                start: self.start,
                stop: self.stop,
            });
        }
        Ok(())
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::new("", 0.0, 1.0)
    }
}

/// Remove markup tags and decode the basic entities from an axis name.
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
