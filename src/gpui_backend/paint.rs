use gpui::{
    App, BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, TextRun, Window,
    font, point, px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{
    Color, LineSegment, LineStyle, MarkerShape, MarkerStyle, RectStyle, RenderCommand, RenderList,
    TextStyle,
};

use super::FONT_FAMILY;

/// Segments used to outline a hollow circle.
const CIRCLE_SEGMENTS: usize = 16;

/// Paint every command of `list` into the window, honouring clip commands.
pub fn paint_render_list(list: &RenderList, window: &mut Window, cx: &mut App) {
    let mut clip_stack: Vec<ContentMask<Pixels>> = Vec::new();
    for command in list.commands() {
        match command {
            RenderCommand::ClipRect(rect) => {
                clip_stack.push(ContentMask {
                    bounds: to_bounds(*rect),
                });
            }
            RenderCommand::ClipEnd => {
                clip_stack.pop();
            }
            RenderCommand::LineSegments { segments, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_lines(window, segments, *style);
                });
            }
            RenderCommand::Markers { points, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_markers(window, points, *style);
                });
            }
            RenderCommand::Rect { rect, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_rect(window, *rect, *style);
                });
            }
            RenderCommand::Text {
                position,
                text,
                style,
            } => {
                with_clip(window, &clip_stack, |window| {
                    paint_text(window, cx, *position, text, style);
                });
            }
        }
    }
}

fn paint_lines(window: &mut Window, segments: &[LineSegment], style: LineStyle) {
    if segments.is_empty() {
        return;
    }
    let mut builder = PathBuilder::stroke(px(style.width.max(0.5)));
    for segment in segments {
        builder.move_to(point(px(segment.start.x), px(segment.start.y)));
        builder.line_to(point(px(segment.end.x), px(segment.end.y)));
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn paint_markers(window: &mut Window, points: &[ScreenPoint], style: MarkerStyle) {
    if points.is_empty() {
        return;
    }
    let half = style.size.max(2.0) * 0.5;
    match (style.shape, style.filled) {
        (MarkerShape::Circle, true) | (MarkerShape::Square, true) => {
            let corner = if style.shape == MarkerShape::Circle {
                half
            } else {
                0.0
            };
            for pt in points {
                let bounds = Bounds::from_corners(
                    point(px(pt.x - half), px(pt.y - half)),
                    point(px(pt.x + half), px(pt.y + half)),
                );
                window.paint_quad(quad(
                    bounds,
                    Corners::all(px(corner)),
                    to_rgba(style.color),
                    Edges::all(px(0.0)),
                    to_rgba(style.color),
                    BorderStyle::default(),
                ));
            }
        }
        (MarkerShape::Circle, false) => {
            let mut builder = PathBuilder::stroke(px(style.stroke_width.max(0.5)));
            for pt in points {
                for i in 0..CIRCLE_SEGMENTS {
                    let a0 = std::f32::consts::TAU * i as f32 / CIRCLE_SEGMENTS as f32;
                    let a1 = std::f32::consts::TAU * (i + 1) as f32 / CIRCLE_SEGMENTS as f32;
                    builder.move_to(point(px(pt.x + half * a0.cos()), px(pt.y + half * a0.sin())));
                    builder.line_to(point(px(pt.x + half * a1.cos()), px(pt.y + half * a1.sin())));
                }
            }
            if let Ok(path) = builder.build() {
                window.paint_path(path, to_rgba(style.color));
            }
        }
        (MarkerShape::Square, false) => {
            for pt in points {
                let rect = ScreenRect::new(
                    ScreenPoint::new(pt.x - half, pt.y - half),
                    ScreenPoint::new(pt.x + half, pt.y + half),
                );
                paint_rect(
                    window,
                    rect,
                    RectStyle {
                        fill: Color::TRANSPARENT,
                        stroke: style.color,
                        stroke_width: style.stroke_width,
                    },
                );
            }
        }
        (MarkerShape::Cross, _) => {
            let mut builder = PathBuilder::stroke(px(style.stroke_width.max(0.5)));
            for pt in points {
                builder.move_to(point(px(pt.x - half), px(pt.y - half)));
                builder.line_to(point(px(pt.x + half), px(pt.y + half)));
                builder.move_to(point(px(pt.x - half), px(pt.y + half)));
                builder.line_to(point(px(pt.x + half), px(pt.y - half)));
            }
            if let Ok(path) = builder.build() {
                window.paint_path(path, to_rgba(style.color));
            }
        }
    }
}

fn paint_rect(window: &mut Window, rect: ScreenRect, style: RectStyle) {
    window.paint_quad(quad(
        to_bounds(rect),
        Corners::all(px(0.0)),
        to_rgba(style.fill),
        Edges::all(px(style.stroke_width)),
        to_rgba(style.stroke),
        BorderStyle::default(),
    ));
}

fn paint_text(
    window: &mut Window,
    cx: &mut App,
    position: ScreenPoint,
    text: &str,
    style: &TextStyle,
) {
    if text.is_empty() {
        return;
    }
    let run = TextRun {
        len: text.len(),
        font: font(FONT_FAMILY),
        color: to_hsla(style.color),
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    let shaped = window
        .text_system()
        .shape_line(text.to_string().into(), px(style.size), &[run], None);
    let line_height = shaped.ascent + shaped.descent;
    if let Err(err) = shaped.paint(point(px(position.x), px(position.y)), line_height, window, cx) {
        tracing::debug!(%err, "failed to paint text");
    }
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}

pub(crate) fn to_bounds(rect: ScreenRect) -> Bounds<Pixels> {
    Bounds::from_corners(
        point(px(rect.min.x), px(rect.min.y)),
        point(px(rect.max.x), px(rect.max.y)),
    )
}

fn with_clip(window: &mut Window, stack: &[ContentMask<Pixels>], f: impl FnOnce(&mut Window)) {
    match stack.last() {
        Some(mask) => window.with_content_mask(Some(mask.clone()), f),
        None => f(window),
    }
}
