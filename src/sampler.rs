//! Sample acquisition across the x domain.
//!
//! A [`SampleSource`] stands for the caller's data: it is asked for one y
//! value per x position, may report its own x (discrete sources), and can
//! cancel the run from its progress hook.

use std::ops::ControlFlow;

use crate::axis::AxisScale;
use crate::error::InitError;
use crate::geom::Point;
use crate::range::Range;
use crate::transform::CoordinateMapper;

/// Provider of plot data.
///
/// Only [`sample`](Self::sample) is required. The call order for one plot is
/// `init`, then `sample`/`progress` pairs, then `end`.
pub trait SampleSource {
    /// Prepare for a run over `[start, stop]`.
    ///
    /// Returns `Some(n)` to take exactly `n` samples (0 included), or `None`
    /// to use the configured default. When this fails, [`end`](Self::end) is
    /// not called, so an implementation must release whatever it acquired
    /// before returning the error.
    fn init(&mut self, _start: f64, _stop: f64) -> Result<Option<usize>, InitError> {
        Ok(None)
    }

    /// Produce the y value at `*x`.
    ///
    /// Discrete sources may overwrite `*x` with the position of their own
    /// sample. A non-finite return value marks a gap (singularity).
    fn sample(&mut self, x: &mut f64) -> f64;

    /// Release per-run resources. Called once after every run whose init
    /// succeeded, also when the run was cancelled.
    fn end(&mut self) {}

    /// Called after each sample with the completed fraction in `0..=1`.
    fn progress(&mut self, _fraction: f64) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn init(&mut self, start: f64, stop: f64) -> Result<Option<usize>, InitError> {
        (**self).init(start, stop)
    }

    fn sample(&mut self, x: &mut f64) -> f64 {
        (**self).sample(x)
    }

    fn end(&mut self) {
        (**self).end()
    }

    fn progress(&mut self, fraction: f64) -> ControlFlow<()> {
        (**self).progress(fraction)
    }
}

/// Continuous source backed by a closure `y = f(x)`.
pub struct FnSource<F> {
    function: F,
}

impl<F: FnMut(f64) -> f64> FnSource<F> {
    /// Wrap a closure.
    pub fn new(function: F) -> Self {
        Self { function }
    }

    /// Attach a progress/cancel hook.
    pub fn with_progress<P>(self, hook: P) -> WithProgress<Self, P>
    where
        P: FnMut(f64) -> ControlFlow<()>,
    {
        WithProgress::new(self, hook)
    }
}

impl<F: FnMut(f64) -> f64> SampleSource for FnSource<F> {
    fn sample(&mut self, x: &mut f64) -> f64 {
        (self.function)(*x)
    }
}

impl<F> std::fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FnSource(..)")
    }
}

/// Discrete source over a fixed list of points.
///
/// Requests exactly one sample per point and reports each point's own x.
#[derive(Debug, Clone)]
pub struct PointSource {
    points: Vec<Point>,
    cursor: usize,
}

impl PointSource {
    /// Create a source over the given points.
    pub fn new(points: impl IntoIterator<Item = Point>) -> Self {
        Self {
            points: points.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Access the points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl SampleSource for PointSource {
    fn init(&mut self, _start: f64, _stop: f64) -> Result<Option<usize>, InitError> {
        self.cursor = 0;
        Ok(Some(self.points.len()))
    }

    fn sample(&mut self, x: &mut f64) -> f64 {
        // The dry run and the render pass both walk the list once.
        if self.cursor >= self.points.len() {
            self.cursor = 0;
        }
        match self.points.get(self.cursor) {
            Some(point) => {
                self.cursor += 1;
                *x = point.x;
                point.y
            }
            None => f64::NAN,
        }
    }
}

/// Adds a progress/cancel hook to another source.
pub struct WithProgress<S, P> {
    inner: S,
    hook: P,
}

impl<S, P> WithProgress<S, P>
where
    S: SampleSource,
    P: FnMut(f64) -> ControlFlow<()>,
{
    /// Wrap `inner`, calling `hook` after every sample.
    pub fn new(inner: S, hook: P) -> Self {
        Self { inner, hook }
    }

    /// Unwrap the inner source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, P> SampleSource for WithProgress<S, P>
where
    S: SampleSource,
    P: FnMut(f64) -> ControlFlow<()>,
{
    fn init(&mut self, start: f64, stop: f64) -> Result<Option<usize>, InitError> {
        self.inner.init(start, stop)
    }

    fn sample(&mut self, x: &mut f64) -> f64 {
        self.inner.sample(x)
    }

    fn end(&mut self) {
        self.inner.end();
    }

    fn progress(&mut self, fraction: f64) -> ControlFlow<()> {
        self.inner.progress(fraction)?;
        (self.hook)(fraction)
    }
}

/// Pick the sample count: init override, then the requested count, then one
/// sample per pixel column.
pub(crate) fn resolve_count(init: Option<usize>, requested: usize, pixel_width: f32) -> usize {
    match init {
        Some(count) => count,
        None if requested > 0 => requested,
        None => pixel_columns(pixel_width),
    }
}

/// One sample per pixel column, both edges included.
pub(crate) fn pixel_columns(pixel_width: f32) -> usize {
    pixel_width.max(0.0).round() as usize + 1
}

/// Positions of `count` samples spread evenly in screen space, which is even
/// spacing in world units on a linear axis and geometric on a log axis.
///
/// The positions depend on the count and the world bounds only, so two plans
/// with the same count visit the same x values whatever their pixel width.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SamplePlan {
    count: usize,
    mapper: CoordinateMapper,
}

impl SamplePlan {
    pub(crate) fn new(count: usize, mapper: CoordinateMapper) -> Self {
        Self { count, mapper }
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }

    /// World x of sample `index`; the first and last land on the bounds.
    pub(crate) fn x_at(&self, index: usize) -> f64 {
        let (world_start, world_stop) = self.mapper.world_bounds();
        if index == 0 || self.count < 2 {
            return world_start;
        }
        if index + 1 == self.count {
            return world_stop;
        }
        self.mapper.world_at(index as f64 / (self.count - 1) as f64)
    }
}

/// Walk the plan, handing every `(x, y)` to `visit`.
///
/// With `report_progress` the source's progress hook runs after each sample
/// and may stop the walk. Returns the number of samples taken.
pub(crate) fn sweep(
    source: &mut dyn SampleSource,
    plan: &SamplePlan,
    report_progress: bool,
    mut visit: impl FnMut(f64, f64),
) -> usize {
    let count = plan.count();
    for index in 0..count {
        let mut x = plan.x_at(index);
        let y = source.sample(&mut x);
        visit(x, y);
        let taken = index + 1;
        if report_progress && source.progress(taken as f64 / count as f64).is_break() {
            tracing::debug!(taken, count, "sampling cancelled");
            return taken;
        }
    }
    count
}

/// Dry run: the extent of all finite samples that fit the y scale.
pub(crate) fn sample_extent(
    source: &mut dyn SampleSource,
    plan: &SamplePlan,
    y_scale: AxisScale,
) -> Option<Range> {
    let mut extent: Option<Range> = None;
    sweep(source, plan, false, |_, y| {
        if y_scale.map_value(y).is_none() {
            return;
        }
        match extent.as_mut() {
            Some(range) => range.expand_to_include(y),
            None => extent = Some(Range::new(y, y)),
        }
    });
    extent
}
