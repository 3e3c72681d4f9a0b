//! Backend-agnostic drawing output of the plot core.
//!
//! [`plot`](crate::plot::plot) writes [`RenderCommand`]s into a
//! [`RenderList`]; a backend (the GPUI one, or a test) replays them.

use crate::geom::{ScreenPoint, ScreenRect};
use crate::style::DrawStyle;
use crate::transform::{Transform, narrow};

/// Straight RGBA color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Color from all four channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

/// Stroke of curves, stems, grid lines and ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Shape drawn at each point of a discrete curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    /// Circle of the marker size in diameter.
    Circle,
    /// Axis-aligned square.
    Square,
    /// Diagonal cross (X).
    Cross,
}

/// How the markers of one [`RenderCommand::Markers`] look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Fill or outline color.
    pub color: Color,
    /// Edge length or diameter in pixels.
    pub size: f32,
    /// Marker outline.
    pub shape: MarkerShape,
    /// Solid instead of outlined.
    pub filled: bool,
    /// Outline width, unused when `filled`.
    pub stroke_width: f32,
}

/// Fill and outline of a rectangle (plot box, note box).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Interior color.
    pub fill: Color,
    /// Outline color.
    pub stroke: Color,
    /// Outline width in pixels.
    pub stroke_width: f32,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            fill: Color::TRANSPARENT,
            stroke: Color::BLACK,
            stroke_width: 1.0,
        }
    }
}

/// Color and font size of a text run.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
}

/// Segment between two screen points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// First end point.
    pub start: ScreenPoint,
    /// Second end point.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Create a segment from its end points.
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }

    /// Both ends share one x (stems, vertical grid lines).
    pub fn is_vertical(&self) -> bool {
        self.start.x == self.end.x
    }
}

/// One drawing step. Commands are replayed in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Clip following commands to the rect until the matching `ClipEnd`.
    ClipRect(ScreenRect),
    /// Restore the clip that was active before the last `ClipRect`.
    ClipEnd,
    /// Unconnected straight segments sharing one stroke.
    LineSegments {
        /// Segments in drawing order.
        segments: Vec<LineSegment>,
        /// Stroke of every segment.
        style: LineStyle,
    },
    /// One marker per point.
    Markers {
        /// Marker centres.
        points: Vec<ScreenPoint>,
        /// Look of every marker.
        style: MarkerStyle,
    },
    /// Filled and outlined rectangle.
    Rect {
        /// Rectangle in screen space.
        rect: ScreenRect,
        /// Fill and outline.
        style: RectStyle,
    },
    /// Single-line text run.
    Text {
        /// Top-left corner of the text box.
        position: ScreenPoint,
        /// Text to draw, without markup.
        text: String,
        /// Color and size.
        style: TextStyle,
    },
}

/// The drawing surface of the plot core: an ordered command list.
#[derive(Debug, Default, Clone)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access the commands in drawing order.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Drop everything drawn so far.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Check whether nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text of every `Text` command, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            RenderCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Turns a stream of sampled points (with gaps) into render commands for one
/// draw style.
#[derive(Debug)]
pub(crate) struct CurveRenderer {
    style: DrawStyle,
    clip: ScreenRect,
    baseline: f32,
    color: Color,
    thickness: f32,
    marker_size: f32,
    segments: Vec<LineSegment>,
    markers: Vec<ScreenPoint>,
    stems: Vec<LineSegment>,
    last: Option<ScreenPoint>,
}

impl CurveRenderer {
    pub(crate) fn new(
        style: DrawStyle,
        transform: &Transform,
        color: Color,
        thickness: f32,
        marker_size: f32,
    ) -> Self {
        let clip = transform.screen();
        // Stems end at y = 0, or at the nearest edge when 0 is off the axis.
        let baseline = transform
            .y()
            .try_forward(0.0)
            .map(|y| narrow(y).clamp(clip.min.y, clip.max.y))
            .unwrap_or(clip.max.y);
        Self {
            style,
            clip,
            baseline,
            color,
            thickness,
            marker_size,
            segments: Vec::new(),
            markers: Vec::new(),
            stems: Vec::new(),
            last: None,
        }
    }

    /// Add the next point; `None` is a gap that breaks the line.
    pub(crate) fn push(&mut self, point: Option<ScreenPoint>) {
        let Some(point) = point else {
            self.last = None;
            return;
        };
        match self.style {
            DrawStyle::Line => {
                if let Some(prev) = self.last {
                    if let Some((start, end)) = clip_segment(prev, point, self.clip) {
                        self.segments.push(LineSegment::new(start, end));
                    }
                }
                self.last = Some(point);
            }
            _ => {
                if !self.clip.contains(point) {
                    return;
                }
                self.markers.push(point);
                if self.style == DrawStyle::CircleSample {
                    self.stems.push(LineSegment::new(
                        ScreenPoint::new(point.x, self.baseline),
                        point,
                    ));
                }
            }
        }
    }

    /// Emit the collected geometry.
    pub(crate) fn finish(self, list: &mut RenderList) {
        let line = LineStyle {
            color: self.color,
            width: self.thickness,
        };
        if !self.segments.is_empty() {
            list.push(RenderCommand::LineSegments {
                segments: self.segments,
                style: line,
            });
        }
        if !self.stems.is_empty() {
            list.push(RenderCommand::LineSegments {
                segments: self.stems,
                style: line,
            });
        }
        if let Some((shape, filled)) = self.style.marker() {
            if !self.markers.is_empty() {
                list.push(RenderCommand::Markers {
                    points: self.markers,
                    style: MarkerStyle {
                        color: self.color,
                        size: self.marker_size,
                        shape,
                        filled,
                        stroke_width: self.thickness,
                    },
                });
            }
        }
    }
}

/// Clip a segment to a rectangle (Liang-Barsky).
///
/// Returns the visible part, or `None` when the segment misses the rect.
pub(crate) fn clip_segment(
    start: ScreenPoint,
    end: ScreenPoint,
    rect: ScreenRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;
    // (p, q) per edge: left, right, top, bottom.
    let edges = [
        (-dx, start.x - rect.min.x),
        (dx, rect.max.x - start.x),
        (-dy, start.y - rect.min.y),
        (dy, rect.max.y - start.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t_enter = t_enter.max(t);
        } else {
            t_exit = t_exit.min(t);
        }
        if t_enter > t_exit {
            return None;
        }
    }
    let at = |t: f32| ScreenPoint::new(start.x + t * dx, start.y + t * dy);
    let clipped_start = if t_enter > 0.0 { at(t_enter) } else { start };
    let clipped_end = if t_exit < 1.0 { at(t_exit) } else { end };
    Some((clipped_start, clipped_end))
}
