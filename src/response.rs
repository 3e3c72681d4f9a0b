//! Filter responses as plot sources.
//!
//! The filter math lives behind [`ResponseModel`]; this module only knows how
//! each response is laid out and how time responses are sampled.

use crate::axis::Axis;
use crate::error::InitError;
use crate::geom::ScreenRect;
use crate::plot::PlotDescriptor;
use crate::sampler::SampleSource;
use crate::style::DrawStyle;
use crate::units::{FREQUENCY_UNITS, LEVEL_UNITS, PHASE_UNITS, TIME_UNITS};

/// Upper bound on the instants a time response may request.
const MAX_INSTANTS: usize = 1 << 20;

/// Samples shown by the default time-response window.
const DEFAULT_INSTANTS: f64 = 32.0;

/// Which filter response to plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResponseKind {
    /// Linear magnitude over frequency.
    Magnitude,
    /// Attenuation in dB over frequency.
    Attenuation,
    /// Phase over frequency.
    Phase,
    /// Phase delay over frequency.
    PhaseDelay,
    /// Group delay over frequency.
    GroupDelay,
    /// Impulse response over time.
    Impulse,
    /// Step response over time.
    Step,
}

impl ResponseKind {
    /// All kinds in menu order.
    pub const ALL: [ResponseKind; 7] = [
        Self::Magnitude,
        Self::Attenuation,
        Self::Phase,
        Self::PhaseDelay,
        Self::GroupDelay,
        Self::Impulse,
        Self::Step,
    ];

    /// Check whether the response is sampled at discrete time instants.
    pub fn is_time_domain(self) -> bool {
        matches!(self, Self::Impulse | Self::Step)
    }

    /// Human readable name.
    pub fn title(self) -> &'static str {
        match self {
            Self::Magnitude => "Magnitude",
            Self::Attenuation => "Attenuation",
            Self::Phase => "Phase",
            Self::PhaseDelay => "Phase delay",
            Self::GroupDelay => "Group delay",
            Self::Impulse => "Impulse response",
            Self::Step => "Step response",
        }
    }

    /// Default plot for this response of a filter running at `sample_rate`.
    pub fn descriptor(self, sample_rate: f64, area: ScreenRect) -> PlotDescriptor {
        let nyquist = sample_rate * 0.5;
        let frequency = Axis::new("Frequency", 0.0, nyquist)
            .with_unit(FREQUENCY_UNITS[0])
            .with_grid(true);
        let (x, y, style) = match self {
            Self::Magnitude => (
                frequency,
                Axis::new("Magnitude", 0.0, 1.0).autoscaled(true),
                DrawStyle::Line,
            ),
            Self::Attenuation => (
                frequency,
                Axis::new("Attenuation", 0.0, 100.0)
                    .with_unit(LEVEL_UNITS[0])
                    .autoscaled(true),
                DrawStyle::Line,
            ),
            Self::Phase => (
                frequency,
                Axis::new("Phase", -std::f64::consts::PI, std::f64::consts::PI)
                    .with_unit(PHASE_UNITS[1]),
                DrawStyle::Line,
            ),
            Self::PhaseDelay | Self::GroupDelay => (
                frequency,
                Axis::new(self.title(), 0.0, 1.0)
                    .with_unit(TIME_UNITS[0])
                    .autoscaled(true),
                DrawStyle::Line,
            ),
            Self::Impulse | Self::Step => (
                Axis::new("Time", 0.0, (DEFAULT_INSTANTS - 1.0) / sample_rate)
                    .with_unit(TIME_UNITS[0])
                    .with_grid(true),
                Axis::new("Amplitude", -1.0, 1.0).autoscaled(true),
                DrawStyle::CircleSample,
            ),
        };
        PlotDescriptor::builder()
            .x_axis(x)
            .y_axis(y.with_grid(true))
            .style(style)
            .note(self.title())
            .area(area)
            .build()
    }
}

/// Filter math needed to plot a response.
pub trait ResponseModel {
    /// Sample rate in Hz.
    fn sample_rate(&self) -> f64;

    /// Allocate whatever `kind` needs. On error nothing must stay allocated.
    fn prepare(&mut self, kind: ResponseKind) -> Result<(), InitError>;

    /// Value of `kind` at `x` (frequency in Hz, or time in seconds).
    fn evaluate(&mut self, kind: ResponseKind, x: f64) -> f64;

    /// Free what [`prepare`](Self::prepare) allocated.
    fn release(&mut self, _kind: ResponseKind) {}
}

/// Adapts a [`ResponseModel`] to [`SampleSource`].
///
/// Time responses are sampled at the instants `n / fs` inside the x range,
/// one sample each; frequency responses use the configured count.
#[derive(Debug)]
pub struct ResponseSource<M> {
    model: M,
    kind: ResponseKind,
    first_instant: i64,
    instants: usize,
    cursor: usize,
}

impl<M: ResponseModel> ResponseSource<M> {
    /// Plot `kind` of `model`.
    pub fn new(model: M, kind: ResponseKind) -> Self {
        Self {
            model,
            kind,
            first_instant: 0,
            instants: 0,
            cursor: 0,
        }
    }

    /// Access the response kind.
    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    /// Access the model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Unwrap the model.
    pub fn into_model(self) -> M {
        self.model
    }

    fn instant_window(&self, start: f64, stop: f64) -> Result<(i64, usize), InitError> {
        let rate = self.model.sample_rate();
        if !(rate.is_finite() && rate > 0.0) {
            return Err(InitError::new(format!("invalid sample rate {rate}")));
        }
        let (lo, hi) = (start.min(stop), start.max(stop));
        let first = (lo * rate - 1e-9).ceil();
        let last = (hi * rate + 1e-9).floor();
        if last < first {
            return Err(InitError::new("no sampling instant inside the time range"));
        }
        let count = (last - first + 1.0).min(MAX_INSTANTS as f64) as usize;
        if count == MAX_INSTANTS {
            tracing::warn!(count, "time response truncated");
        }
        Ok((first as i64, count))
    }
}

impl<M: ResponseModel> SampleSource for ResponseSource<M> {
    fn init(&mut self, start: f64, stop: f64) -> Result<Option<usize>, InitError> {
        self.model.prepare(self.kind)?;
        self.cursor = 0;
        if !self.kind.is_time_domain() {
            self.instants = 0;
            return Ok(None);
        }
        match self.instant_window(start, stop) {
            Ok((first, count)) => {
                tracing::debug!(kind = ?self.kind, first, count, "time response instants");
                self.first_instant = first;
                self.instants = count;
                Ok(Some(count))
            }
            Err(err) => {
                self.model.release(self.kind);
                Err(err)
            }
        }
    }

    fn sample(&mut self, x: &mut f64) -> f64 {
        if self.instants > 0 {
            if self.cursor >= self.instants {
                self.cursor = 0;
            }
            let n = self.first_instant + self.cursor as i64;
            self.cursor += 1;
            *x = n as f64 / self.model.sample_rate();
        }
        self.model.evaluate(self.kind, *x)
    }

    fn end(&mut self) {
        self.model.release(self.kind);
    }
}
