//! GPUI integration for filterplot.
//!
//! Paints a [`RenderList`](crate::render::RenderList) into a GPUI window and
//! provides [`FilterPlotView`], a view that re-plots its source every frame.

mod paint;
mod text;
mod view;

pub use paint::paint_render_list;
pub use text::GpuiTextMeasurer;
pub use view::{FilterPlotHandle, FilterPlotView};

/// Font used for measuring and painting.
const FONT_FAMILY: &str = ".SystemUIFont";
