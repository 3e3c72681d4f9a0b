use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gpui::prelude::*;
use gpui::{Bounds, MouseMoveEvent, Pixels, Window, canvas, div};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::plot::{PlotDescriptor, plot};
use crate::render::{Color, RenderCommand, RenderList, TextStyle};
use crate::sampler::SampleSource;
use crate::scale::{TextMeasurer, format_general};
use crate::style::ColorRole;

use super::paint::{paint_render_list, to_hsla};
use super::text::GpuiTextMeasurer;

struct ViewState {
    descriptor: PlotDescriptor,
    background: Color,
    source: Box<dyn SampleSource + Send>,
    cursor: Option<ScreenPoint>,
}

/// A GPUI view that plots a [`SampleSource`] every frame.
///
/// The descriptor's area is replaced by the view bounds before each plot.
/// Failures are drawn as a centred message instead of the plot.
#[derive(Clone)]
pub struct FilterPlotView {
    state: Arc<Mutex<ViewState>>,
}

impl FilterPlotView {
    /// Create a view for a descriptor and its data source.
    pub fn new(descriptor: PlotDescriptor, source: impl SampleSource + Send + 'static) -> Self {
        Self {
            state: Arc::new(Mutex::new(ViewState {
                descriptor,
                background: Color::WHITE,
                source: Box::new(source),
                cursor: None,
            })),
        }
    }

    /// Set the color behind the plot.
    pub fn with_background(self, color: Color) -> Self {
        lock_state(&self.state).background = color;
        self
    }

    /// Get a handle for changing the plot from outside the view.
    pub fn handle(&self) -> FilterPlotHandle {
        FilterPlotHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let pos = ScreenPoint::new(f32::from(ev.position.x), f32::from(ev.position.y));
        lock_state(&self.state).cursor = Some(pos);
        cx.notify();
    }
}

impl Render for FilterPlotView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let state = Arc::clone(&self.state);
        let background = lock_state(&self.state).background;

        div()
            .size_full()
            .bg(to_hsla(background))
            .child(
                canvas(
                    move |bounds, window, _| {
                        let mut state = lock_state(&state);
                        build_frame(&mut state, bounds, window)
                    },
                    move |_, list, window, cx| {
                        paint_render_list(&list, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
    }
}

/// A handle for changing the plot shown by a [`FilterPlotView`].
///
/// The handle clones cheaply; the next frame picks up the change.
#[derive(Clone)]
pub struct FilterPlotHandle {
    state: Arc<Mutex<ViewState>>,
}

impl FilterPlotHandle {
    /// Mutate the descriptor.
    pub fn update<R>(&self, f: impl FnOnce(&mut PlotDescriptor) -> R) -> R {
        f(&mut lock_state(&self.state).descriptor)
    }

    /// Replace the data source.
    pub fn set_source(&self, source: impl SampleSource + Send + 'static) {
        lock_state(&self.state).source = Box::new(source);
    }
}

fn lock_state(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn build_frame(state: &mut ViewState, bounds: Bounds<Pixels>, window: &Window) -> RenderList {
    let area = ScreenRect::from_origin_size(
        f32::from(bounds.origin.x),
        f32::from(bounds.origin.y),
        f32::from(bounds.size.width),
        f32::from(bounds.size.height),
    );
    let measurer = GpuiTextMeasurer::new(window);
    let ViewState {
        descriptor,
        source,
        cursor,
        ..
    } = state;
    descriptor.area = area;

    let mut list = RenderList::new();
    match plot(&mut list, &measurer, descriptor, &mut **source) {
        Ok(taken) => {
            tracing::trace!(taken, "frame plotted");
            if let Some(world) = (*cursor).and_then(|cursor| descriptor.locate(cursor)) {
                let readout = format!(
                    "{}, {}",
                    format_general(world.x, descriptor.x.precision),
                    format_general(world.y, descriptor.y.precision)
                );
                let plot_rect = descriptor.area;
                list.push(RenderCommand::Text {
                    position: ScreenPoint::new(
                        plot_rect.min.x + descriptor.config.padding,
                        plot_rect.min.y + descriptor.config.padding,
                    ),
                    text: readout,
                    style: TextStyle {
                        color: descriptor.colors[ColorRole::Labels],
                        size: descriptor.config.label_size,
                    },
                });
            }
        }
        Err(err) => {
            tracing::debug!(code = err.code(), %err, "plot failed");
            list.clear();
            let message = err.to_string();
            let size = descriptor.config.title_size;
            let (w, h) = measurer.measure(&message, size);
            list.push(RenderCommand::Text {
                position: ScreenPoint::new(
                    area.min.x + (area.width() - w) * 0.5,
                    area.min.y + (area.height() - h) * 0.5,
                ),
                text: message,
                style: TextStyle {
                    color: descriptor.colors[ColorRole::NoteText],
                    size,
                },
            });
        }
    }
    list
}
