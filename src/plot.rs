//! Plot entry points: one request in, render commands and a sample count out.

use crate::axis::{Axis, AxisId};
use crate::config::PlotConfig;
use crate::error::{PlotError, PlotResult};
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::render::{
    CurveRenderer, LineSegment, LineStyle, RectStyle, RenderCommand, RenderList, TextStyle,
};
use crate::sampler::{SamplePlan, SampleSource, resolve_count, sample_extent, sweep};
use crate::scale::{AxisLayout, TextMeasurer, apply_range, autoscale_range};
use crate::style::{ColorRole, ColorTable, DrawStyle};
use crate::transform::{CoordinateMapper, Transform, narrow};

/// One full plot request.
///
/// The caller owns the descriptor. A successful [`plot`] writes back the
/// autoscaled y range and replaces `area` with the rectangle the curve was
/// actually drawn into.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlotDescriptor {
    /// Horizontal axis.
    pub x: Axis,
    /// Vertical axis.
    pub y: Axis,
    /// Draw style of the curve.
    pub style: DrawStyle,
    /// Requested sample count, 0 = one per pixel column.
    pub samples: usize,
    /// Line width in pixels.
    pub thickness: f32,
    /// Marker size in pixels.
    pub marker_size: f32,
    /// Colors by role.
    pub colors: ColorTable,
    /// Text shown in a box in the top right corner of the plot.
    pub note: Option<String>,
    /// Layout settings.
    pub config: PlotConfig,
    /// Input: available area. Output: plotted rectangle.
    pub area: ScreenRect,
}

impl PlotDescriptor {
    /// Create a descriptor with default styling.
    pub fn new(x: Axis, y: Axis, area: ScreenRect) -> Self {
        Self {
            x,
            y,
            style: DrawStyle::default(),
            samples: 0,
            thickness: 1.0,
            marker_size: 6.0,
            colors: ColorTable::default(),
            note: None,
            config: PlotConfig::default(),
            area,
        }
    }

    /// Start building a descriptor.
    pub fn builder() -> PlotBuilder {
        PlotBuilder::default()
    }

    /// Convert a pixel position inside the plotted rectangle into world
    /// coordinates. Meaningful after a successful [`plot`].
    pub fn locate(&self, point: ScreenPoint) -> Option<Point> {
        if !self.area.contains(point) {
            return None;
        }
        let transform = Transform::new(&self.x, &self.y, self.area)?;
        Some(transform.screen_to_data(point))
    }
}

impl Default for PlotDescriptor {
    fn default() -> Self {
        Self::new(
            Axis::default(),
            Axis::default(),
            ScreenRect::from_origin_size(0.0, 0.0, 0.0, 0.0),
        )
    }
}

/// Builder for a [`PlotDescriptor`].
#[derive(Debug, Default)]
pub struct PlotBuilder {
    descriptor: PlotDescriptor,
}

impl PlotBuilder {
    /// Set the x axis.
    pub fn x_axis(mut self, axis: Axis) -> Self {
        self.descriptor.x = axis;
        self
    }

    /// Set the y axis.
    pub fn y_axis(mut self, axis: Axis) -> Self {
        self.descriptor.y = axis;
        self
    }

    /// Set the draw style.
    pub fn style(mut self, style: DrawStyle) -> Self {
        self.descriptor.style = style;
        self
    }

    /// Set the requested sample count.
    pub fn samples(mut self, samples: usize) -> Self {
        self.descriptor.samples = samples;
        self
    }

    /// Set the line width.
    pub fn thickness(mut self, thickness: f32) -> Self {
        self.descriptor.thickness = thickness;
        self
    }

    /// Set the marker size.
    pub fn marker_size(mut self, size: f32) -> Self {
        self.descriptor.marker_size = size;
        self
    }

    /// Set the color table.
    pub fn colors(mut self, colors: ColorTable) -> Self {
        self.descriptor.colors = colors;
        self
    }

    /// Set the note text.
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.descriptor.note = Some(note.into());
        self
    }

    /// Set the layout configuration.
    pub fn config(mut self, config: PlotConfig) -> Self {
        self.descriptor.config = config;
        self
    }

    /// Set the available drawing area.
    pub fn area(mut self, area: ScreenRect) -> Self {
        self.descriptor.area = area;
        self
    }

    /// Build the descriptor.
    pub fn build(self) -> PlotDescriptor {
        self.descriptor
    }
}

/// Plot a curve with axes, grid and labels.
///
/// Runs init, the autoscale dry run (when the y axis requests it), the layout
/// and the sampling loop, then end. Returns the number of samples taken,
/// which is less than the resolved count if the source cancelled. Nothing is
/// drawn when an error is returned. The canvas is expected to be clipped to
/// the descriptor's area by the caller.
pub fn plot(
    canvas: &mut RenderList,
    measurer: &dyn TextMeasurer,
    descriptor: &mut PlotDescriptor,
    source: &mut dyn SampleSource,
) -> PlotResult<usize> {
    let mut x_axis = descriptor.x.clone();
    let mut y_axis = descriptor.y.clone();
    x_axis.validate(AxisId::X)?;
    // An autoscaled y range is a placeholder; the range it is replaced with
    // gets checked instead.
    if !y_axis.flags.autoscale {
        y_axis.validate(AxisId::Y)?;
    }
    let area = descriptor.area;
    if !area.is_valid() {
        return Err(PlotError::AreaTooSmall {
            width: area.width(),
            height: area.height(),
        });
    }
    if x_axis.flags.autoscale {
        tracing::debug!("autoscale is not applied to the x axis");
    }

    tracing::debug!(style = ?descriptor.style, samples = descriptor.samples, "plot");
    let requested = init_source(source, &x_axis)?;

    let result = render_plot(canvas, measurer, descriptor, source, requested, &x_axis, &mut y_axis);
    source.end();

    let (taken, plot_rect) = result?;
    descriptor.x = x_axis;
    descriptor.y = y_axis;
    descriptor.area = plot_rect;
    tracing::debug!(taken, "plot finished");
    Ok(taken)
}

/// Upper bound on dry run and layout rounds while autoscaling.
const LAYOUT_PASSES: usize = 3;

/// Everything between init and end of a [`plot`] run.
fn render_plot(
    canvas: &mut RenderList,
    measurer: &dyn TextMeasurer,
    descriptor: &PlotDescriptor,
    source: &mut dyn SampleSource,
    requested: Option<usize>,
    x_axis: &Axis,
    y_axis: &mut Axis,
) -> PlotResult<(usize, ScreenRect)> {
    let autoscale = y_axis.flags.autoscale;
    let mut count = resolve_count(requested, descriptor.samples, descriptor.area.width());
    let mut pass = 1;
    let frame = loop {
        if autoscale {
            autoscale_y(source, descriptor, x_axis, y_axis, count)?;
        }
        let frame = layout(x_axis, y_axis, descriptor, measurer)?;
        let fitted = resolve_count(requested, descriptor.samples, frame.plot_rect.width());
        if !autoscale {
            count = fitted;
            break frame;
        }
        // The render pass has to visit the x values of the last dry run.
        if fitted == count || pass == LAYOUT_PASSES {
            break frame;
        }
        tracing::trace!(pass, count, fitted, "plot width changed, repeating dry run");
        count = fitted;
        pass += 1;
    };
    let transform =
        Transform::new(x_axis, y_axis, frame.plot_rect).ok_or(PlotError::AreaTooSmall {
            width: frame.plot_rect.width(),
            height: frame.plot_rect.height(),
        })?;

    draw_frame(canvas, measurer, &frame, &transform, (x_axis, y_axis), descriptor);
    let taken = draw_curve(canvas, source, &transform, count, descriptor);
    Ok((taken, frame.plot_rect))
}

/// Dry run over `count` samples, then store the padded extent on the y axis.
fn autoscale_y(
    source: &mut dyn SampleSource,
    descriptor: &PlotDescriptor,
    x_axis: &Axis,
    y_axis: &mut Axis,
    count: usize,
) -> PlotResult<()> {
    let area = descriptor.area;
    let mapper = CoordinateMapper::new(
        area.min.x as f64,
        area.max.x as f64,
        x_axis.start,
        x_axis.stop,
        x_axis.scale(),
    );
    let extent = sample_extent(source, &SamplePlan::new(count, mapper), y_axis.scale());
    let range = autoscale_range(
        extent,
        y_axis.scale(),
        descriptor.config.autoscale_margin,
        AxisId::Y,
    )?;
    tracing::debug!(min = range.min, max = range.max, count, "autoscaled y axis");
    apply_range(y_axis, range);
    y_axis.validate(AxisId::Y)
}

/// Draw one more curve onto a descriptor laid out by a previous [`plot`].
///
/// Uses `descriptor.area` as the plot rectangle and draws no frame. The
/// callback contract and return value match [`plot`].
pub fn overlay(
    canvas: &mut RenderList,
    descriptor: &PlotDescriptor,
    source: &mut dyn SampleSource,
) -> PlotResult<usize> {
    let mut x_axis = descriptor.x.clone();
    let mut y_axis = descriptor.y.clone();
    x_axis.validate(AxisId::X)?;
    y_axis.validate(AxisId::Y)?;
    let area = descriptor.area;
    let transform = Transform::new(&x_axis, &y_axis, area).ok_or(PlotError::AreaTooSmall {
        width: area.width(),
        height: area.height(),
    })?;

    let requested = init_source(source, &x_axis)?;
    let count = resolve_count(requested, descriptor.samples, area.width());
    let taken = draw_curve(canvas, source, &transform, count, descriptor);
    source.end();
    Ok(taken)
}

fn init_source(source: &mut dyn SampleSource, x_axis: &Axis) -> PlotResult<Option<usize>> {
    source.init(x_axis.start, x_axis.stop).map_err(|err| {
        tracing::warn!(reason = err.reason(), "sample source failed to initialise");
        PlotError::from(err)
    })
}

fn draw_curve(
    canvas: &mut RenderList,
    source: &mut dyn SampleSource,
    transform: &Transform,
    count: usize,
    descriptor: &PlotDescriptor,
) -> usize {
    let plan = SamplePlan::new(count, *transform.x());
    let mut renderer = CurveRenderer::new(
        descriptor.style,
        transform,
        descriptor.colors[ColorRole::Graph],
        descriptor.thickness,
        descriptor.marker_size,
    );
    canvas.push(RenderCommand::ClipRect(transform.screen()));
    let taken = sweep(source, &plan, true, |x, y| {
        let point = if y.is_finite() {
            transform.data_to_screen(Point::new(x, y))
        } else {
            None
        };
        renderer.push(point);
    });
    renderer.finish(canvas);
    canvas.push(RenderCommand::ClipEnd);
    taken
}

/// Result of the layout pass.
#[derive(Debug, Clone)]
struct PlotFrame {
    plot_rect: ScreenRect,
    x_layout: AxisLayout,
    y_layout: AxisLayout,
    x_title: Option<(String, (f32, f32))>,
    y_title: Option<(String, (f32, f32))>,
}

/// Inset the area so tick labels and titles fit around the plot rect.
fn layout(
    x_axis: &Axis,
    y_axis: &Axis,
    descriptor: &PlotDescriptor,
    measurer: &dyn TextMeasurer,
) -> PlotResult<PlotFrame> {
    let config = &descriptor.config;
    let area = descriptor.area;
    let measure_title = |axis: &Axis| {
        axis.title().map(|title| {
            let size = measurer.measure(&title, config.title_size);
            (title, size)
        })
    };
    let x_title = measure_title(x_axis);
    let y_title = measure_title(y_axis);

    let mut x_layout = AxisLayout::compute(x_axis, area.width(), config, measurer);
    let mut y_layout = AxisLayout::compute(y_axis, area.height(), config, measurer);
    let mut plot_rect = area;
    // Tick budgets depend on the inset lengths, so settle them in two passes.
    for _ in 0..2 {
        let insets = Insets::new(&x_layout, &y_layout, &x_title, &y_title, config);
        plot_rect = area.inset(insets.left, insets.top, insets.right, insets.bottom);
        if !plot_rect.is_valid() {
            return Err(PlotError::AreaTooSmall {
                width: area.width(),
                height: area.height(),
            });
        }
        x_layout = AxisLayout::compute(x_axis, plot_rect.width(), config, measurer);
        y_layout = AxisLayout::compute(y_axis, plot_rect.height(), config, measurer);
    }
    tracing::trace!(?plot_rect, "plot layout");

    Ok(PlotFrame {
        plot_rect,
        x_layout,
        y_layout,
        x_title,
        y_title,
    })
}

#[derive(Debug, Clone, Copy)]
struct Insets {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Insets {
    fn new(
        x_layout: &AxisLayout,
        y_layout: &AxisLayout,
        x_title: &Option<(String, (f32, f32))>,
        y_title: &Option<(String, (f32, f32))>,
        config: &PlotConfig,
    ) -> Self {
        let (x_label_w, x_label_h) = x_layout.max_label_size;
        let (y_label_w, y_label_h) = y_layout.max_label_size;
        let left = (y_label_w + config.tick_length + config.padding * 2.0).max(x_label_w * 0.5);
        let right = x_label_w * 0.5 + config.padding;
        let top = match y_title {
            Some((_, (_, h))) => h + config.padding,
            None => config.padding,
        }
        .max(y_label_h * 0.5);
        let bottom = x_label_h
            + config.tick_length
            + config.padding * 2.0
            + x_title.as_ref().map_or(0.0, |(_, (_, h))| h + config.padding);
        Self {
            left,
            top,
            right,
            bottom,
        }
    }
}

fn draw_frame(
    canvas: &mut RenderList,
    measurer: &dyn TextMeasurer,
    frame: &PlotFrame,
    transform: &Transform,
    (x_axis, y_axis): (&Axis, &Axis),
    descriptor: &PlotDescriptor,
) {
    let colors = &descriptor.colors;
    let config = &descriptor.config;
    let plot_rect = frame.plot_rect;

    let mut grid = Vec::new();
    let mut ticks = Vec::new();
    let mut x_ticks = Vec::new();
    for tick in &frame.x_layout.ticks {
        let Some(x) = transform.x().try_forward(tick.value) else {
            continue;
        };
        let x = narrow(x);
        if x_axis.flags.grid {
            grid.push(LineSegment::new(
                ScreenPoint::new(x, plot_rect.min.y),
                ScreenPoint::new(x, plot_rect.max.y),
            ));
        }
        ticks.push(LineSegment::new(
            ScreenPoint::new(x, plot_rect.max.y),
            ScreenPoint::new(x, plot_rect.max.y + config.tick_length),
        ));
        x_ticks.push((x, tick));
    }
    let mut y_ticks = Vec::new();
    for tick in &frame.y_layout.ticks {
        let Some(y) = transform.y().try_forward(tick.value) else {
            continue;
        };
        let y = narrow(y);
        if y_axis.flags.grid {
            grid.push(LineSegment::new(
                ScreenPoint::new(plot_rect.min.x, y),
                ScreenPoint::new(plot_rect.max.x, y),
            ));
        }
        ticks.push(LineSegment::new(
            ScreenPoint::new(plot_rect.min.x - config.tick_length, y),
            ScreenPoint::new(plot_rect.min.x, y),
        ));
        y_ticks.push((y, tick));
    }

    if !grid.is_empty() {
        canvas.push(RenderCommand::LineSegments {
            segments: grid,
            style: LineStyle {
                color: colors[ColorRole::Grid],
                width: 1.0,
            },
        });
    }
    canvas.push(RenderCommand::Rect {
        rect: plot_rect,
        style: RectStyle {
            stroke: colors[ColorRole::Box],
            ..RectStyle::default()
        },
    });
    if !ticks.is_empty() {
        canvas.push(RenderCommand::LineSegments {
            segments: ticks,
            style: LineStyle {
                color: colors[ColorRole::Box],
                width: 1.0,
            },
        });
    }

    let label_style = TextStyle {
        color: colors[ColorRole::Labels],
        size: config.label_size,
    };
    let (_, x_label_h) = frame.x_layout.max_label_size;
    for (x, tick) in x_ticks {
        let (w, _) = measurer.measure(&tick.label, config.label_size);
        canvas.push(RenderCommand::Text {
            position: ScreenPoint::new(
                x - w * 0.5,
                plot_rect.max.y + config.tick_length + config.padding,
            ),
            text: tick.label.clone(),
            style: label_style.clone(),
        });
    }
    for (y, tick) in y_ticks {
        let (w, h) = measurer.measure(&tick.label, config.label_size);
        canvas.push(RenderCommand::Text {
            position: ScreenPoint::new(
                plot_rect.min.x - config.tick_length - config.padding - w,
                y - h * 0.5,
            ),
            text: tick.label.clone(),
            style: label_style.clone(),
        });
    }

    let title_style = TextStyle {
        color: colors[ColorRole::AxisName],
        size: config.title_size,
    };
    if let Some((title, (w, _))) = &frame.x_title {
        canvas.push(RenderCommand::Text {
            position: ScreenPoint::new(
                plot_rect.min.x + (plot_rect.width() - w) * 0.5,
                plot_rect.max.y + config.tick_length + config.padding * 2.0 + x_label_h,
            ),
            text: title.clone(),
            style: title_style.clone(),
        });
    }
    if let Some((title, _)) = &frame.y_title {
        canvas.push(RenderCommand::Text {
            position: ScreenPoint::new(
                descriptor.area.min.x + config.padding,
                descriptor.area.min.y,
            ),
            text: title.clone(),
            style: title_style,
        });
    }

    if let Some(note) = descriptor.note.as_deref().filter(|note| !note.is_empty()) {
        draw_note(canvas, measurer, note, plot_rect, descriptor);
    }
}

fn draw_note(
    canvas: &mut RenderList,
    measurer: &dyn TextMeasurer,
    note: &str,
    plot_rect: ScreenRect,
    descriptor: &PlotDescriptor,
) {
    let config = &descriptor.config;
    let (w, h) = measurer.measure(note, config.note_size);
    let pad = config.padding;
    let rect = ScreenRect::from_origin_size(
        plot_rect.max.x - w - pad * 3.0,
        plot_rect.min.y + pad,
        w + pad * 2.0,
        h + pad * 2.0,
    );
    canvas.push(RenderCommand::Rect {
        rect,
        style: RectStyle {
            fill: descriptor.colors[ColorRole::NoteBox],
            stroke: descriptor.colors[ColorRole::NoteText],
            stroke_width: 1.0,
        },
    });
    canvas.push(RenderCommand::Text {
        position: ScreenPoint::new(rect.min.x + pad, rect.min.y + pad),
        text: note.to_string(),
        style: TextStyle {
            color: descriptor.colors[ColorRole::NoteText],
            size: config.note_size,
        },
    });
}
