//! Error types for plot requests.

use thiserror::Error;

use crate::axis::AxisId;

/// Result type alias for plot operations.
pub type PlotResult<T> = std::result::Result<T, PlotError>;

/// Reason reported by a [`SampleSource`](crate::sampler::SampleSource) that
/// cannot produce data (for example a singular filter).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct InitError {
    reason: String,
}

impl InitError {
    /// Create an init error with a human readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Access the reason.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Errors that abort a plot request.
///
/// Configuration errors are detected before anything is drawn. Singularities
/// and cancellation are not errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlotError {
    /// Start and stop of an axis coincide.
    #[error("{axis} axis range is degenerate ({start} .. {stop})")]
    DegenerateRange { axis: AxisId, start: f64, stop: f64 },

    /// Both bounds of a logarithmic axis are non-positive.
    #[error("{axis} axis is logarithmic but its range ({start} .. {stop}) is not positive")]
    LogRange { axis: AxisId, start: f64, stop: f64 },

    /// An axis bound is NaN or infinite, or the span between the bounds
    /// overflows.
    #[error("{axis} axis bound is not finite ({start} .. {stop})")]
    NonFiniteBound { axis: AxisId, start: f64, stop: f64 },

    /// Nothing of the drawing area is left after reserving space for labels.
    #[error("drawing area {width}x{height} is too small for the plot")]
    AreaTooSmall { width: f32, height: f32 },

    /// The sample source refused to initialise.
    #[error("sample source initialisation failed: {0}")]
    Init(#[from] InitError),
}

impl PlotError {
    /// Negative status code for callers that branch on an integer result.
    pub fn code(&self) -> i64 {
        match self {
            Self::DegenerateRange { .. } => -1,
            Self::LogRange { .. } => -2,
            Self::NonFiniteBound { .. } => -3,
            Self::AreaTooSmall { .. } => -4,
            Self::Init(_) => -5,
        }
    }

    /// Check whether the error stems from the axis or area configuration.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Init(_))
    }
}

/// Flatten a plot result into the integer contract: the sample count, or a
/// negative code on failure.
pub fn plot_status(result: &PlotResult<usize>) -> i64 {
    match result {
        Ok(count) => i64::try_from(*count).unwrap_or(i64::MAX),
        Err(err) => err.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_negative_and_distinct() {
        let errors = [
            PlotError::DegenerateRange {
                axis: AxisId::X,
                start: 1.0,
                stop: 1.0,
            },
            PlotError::LogRange {
                axis: AxisId::Y,
                start: -1.0,
                stop: 0.0,
            },
            PlotError::NonFiniteBound {
                axis: AxisId::X,
                start: f64::NAN,
                stop: 1.0,
            },
            PlotError::AreaTooSmall {
                width: 2.0,
                height: 2.0,
            },
            PlotError::Init(InitError::new("singular")),
        ];
        let mut codes: Vec<i64> = errors.iter().map(PlotError::code).collect();
        assert!(codes.iter().all(|code| *code < 0));
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn status_passes_counts_through() {
        assert_eq!(plot_status(&Ok(42)), 42);
        let err = PlotError::Init(InitError::new("no workspace"));
        assert!(!err.is_configuration());
        assert_eq!(plot_status(&Err(err)), -5);
    }

    #[test]
    fn init_error_message() {
        let err = PlotError::from(InitError::new("filter is singular"));
        assert_eq!(
            err.to_string(),
            "sample source initialisation failed: filter is singular"
        );
    }
}
