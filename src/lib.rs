//! filterplot draws the response curves of a digital filter design tool.
//!
//! A plot request is a [`PlotDescriptor`] (axes, style, colors, area) plus a
//! [`SampleSource`] that supplies the data. [`plot`] turns both into a
//! backend-agnostic [`RenderList`]; the optional `gpui` feature paints it.

#![forbid(unsafe_code)]

pub mod axis;
pub mod config;
pub mod error;
pub mod geom;
pub mod plot;
pub mod range;
pub mod render;
pub mod response;
pub mod roots;
pub mod sampler;
pub mod scale;
pub mod style;
pub mod transform;
pub mod units;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use axis::{Axis, AxisFlags, AxisId, AxisScale, LOG_TOLERANCE};
pub use config::PlotConfig;
pub use error::{InitError, PlotError, PlotResult, plot_status};
pub use geom::{Point, ScreenPoint, ScreenRect};
pub use plot::{PlotBuilder, PlotDescriptor, overlay, plot};
pub use range::Range;
pub use render::{
    Color, LineSegment, LineStyle, MarkerShape, MarkerStyle, RectStyle, RenderCommand, RenderList,
    TextStyle,
};
pub use response::{ResponseKind, ResponseModel, ResponseSource};
pub use roots::{Root, RootSet, plot_roots};
pub use sampler::{FnSource, PointSource, SampleSource, WithProgress};
pub use scale::{AxisLayout, FixedMetrics, TextMeasurer, Tick};
pub use style::{ColorRole, ColorTable, DrawStyle};
pub use transform::{CoordinateMapper, Transform};
pub use units::Unit;

#[cfg(feature = "gpui")]
pub use gpui_backend::{FilterPlotHandle, FilterPlotView, GpuiTextMeasurer, paint_render_list};
