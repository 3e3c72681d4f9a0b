//! Pole/zero diagrams.

use crate::axis::Axis;
use crate::error::{InitError, PlotResult};
use crate::geom::{Point, ScreenRect};
use crate::plot::{PlotDescriptor, overlay, plot};
use crate::range::Range;
use crate::render::RenderList;
use crate::sampler::{PointSource, SampleSource};
use crate::scale::{TextMeasurer, apply_range};
use crate::style::{ColorRole, DrawStyle};

/// Points on the unit circle, both ends at angle 0.
const UNIT_CIRCLE_POINTS: usize = 181;

/// Relative margin around the roots.
const ROOT_MARGIN: f64 = 0.1;

/// A complex root.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Root {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl Root {
    /// Create a root.
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    fn point(self) -> Point {
        Point::new(self.re, self.im)
    }
}

/// Zeros and poles of a transfer function.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootSet {
    /// Zeros.
    pub zeros: Vec<Root>,
    /// Poles.
    pub poles: Vec<Root>,
}

impl RootSet {
    /// Create a root set.
    pub fn new(zeros: Vec<Root>, poles: Vec<Root>) -> Self {
        Self { zeros, poles }
    }

    /// Square range covering every finite root and the unit circle.
    pub fn bounds(&self) -> Range {
        let extent = self
            .zeros
            .iter()
            .chain(&self.poles)
            .filter(|root| root.re.is_finite() && root.im.is_finite())
            .fold(1.0_f64, |extent, root| {
                extent.max(root.re.abs()).max(root.im.abs())
            });
        let half = extent * (1.0 + ROOT_MARGIN);
        Range::new(-half, half)
    }

    /// Default pole/zero plot.
    pub fn descriptor(area: ScreenRect) -> PlotDescriptor {
        PlotDescriptor::builder()
            .x_axis(Axis::new("Real", -1.1, 1.1).with_grid(true).autoscaled(true))
            .y_axis(
                Axis::new("Imaginary", -1.1, 1.1)
                    .with_grid(true)
                    .autoscaled(true),
            )
            .style(DrawStyle::Circle)
            .area(area)
            .build()
    }
}

/// The unit circle traced as a parametric curve.
#[derive(Debug, Default)]
struct UnitCircle {
    index: usize,
}

impl SampleSource for UnitCircle {
    fn init(&mut self, _start: f64, _stop: f64) -> Result<Option<usize>, InitError> {
        self.index = 0;
        Ok(Some(UNIT_CIRCLE_POINTS))
    }

    fn sample(&mut self, x: &mut f64) -> f64 {
        let angle =
            std::f64::consts::TAU * self.index as f64 / (UNIT_CIRCLE_POINTS - 1) as f64;
        self.index += 1;
        *x = angle.cos();
        angle.sin()
    }
}

/// Plot zeros as circles, the unit circle, and poles as crosses.
///
/// When either axis requests autoscale, both get [`RootSet::bounds`] so the
/// diagram stays square. Returns the number of roots drawn.
pub fn plot_roots(
    canvas: &mut RenderList,
    measurer: &dyn TextMeasurer,
    descriptor: &mut PlotDescriptor,
    roots: &RootSet,
) -> PlotResult<usize> {
    let mut working = descriptor.clone();
    if working.x.flags.autoscale || working.y.flags.autoscale {
        let bounds = roots.bounds();
        apply_range(&mut working.x, bounds);
        apply_range(&mut working.y, bounds);
        working.x.flags.autoscale = false;
        working.y.flags.autoscale = false;
    }
    working.style = DrawStyle::Circle;

    let mut zeros = PointSource::new(roots.zeros.iter().map(|root| root.point()));
    let zero_count = plot(canvas, measurer, &mut working, &mut zeros)?;

    let mut circle = working.clone();
    circle.style = DrawStyle::Line;
    circle.colors[ColorRole::Graph] = working.colors[ColorRole::Box];
    overlay(canvas, &circle, &mut UnitCircle::default())?;

    let mut poles_desc = working.clone();
    poles_desc.style = DrawStyle::Cross;
    let mut poles = PointSource::new(roots.poles.iter().map(|root| root.point()));
    let pole_count = overlay(canvas, &poles_desc, &mut poles)?;

    descriptor.x.start = working.x.start;
    descriptor.x.stop = working.x.stop;
    descriptor.y.start = working.y.start;
    descriptor.y.stop = working.y.stop;
    descriptor.area = working.area;
    tracing::debug!(zeros = zero_count, poles = pole_count, "roots plotted");
    Ok(zero_count + pole_count)
}
