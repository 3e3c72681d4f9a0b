//! Coordinate transforms between world and screen space.

use crate::axis::{Axis, AxisScale, LOG_TOLERANCE};
use crate::geom::{Point, ScreenPoint, ScreenRect};

/// Screen coordinates are clamped to this distance from the origin before
/// they are narrowed to `f32`.
const SCREEN_GUARD: f64 = 1e6;

/// Maps world values of one axis onto one screen dimension and back.
///
/// The mapper is a pure function of its configuration. `screen_max` may be
/// smaller than `screen_min` (e.g. a y axis growing upwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    screen_min: f64,
    screen_max: f64,
    world_min: f64,
    world_max: f64,
    scale: AxisScale,
}

impl CoordinateMapper {
    /// Configure a mapper.
    ///
    /// On a logarithmic scale non-positive world bounds are replaced by
    /// [`LOG_TOLERANCE`].
    pub fn new(screen_min: f64, screen_max: f64, world_min: f64, world_max: f64, scale: AxisScale) -> Self {
        let (world_min, world_max) = match scale {
            AxisScale::Linear => (world_min, world_max),
            AxisScale::Log10 => (world_min.max(LOG_TOLERANCE), world_max.max(LOG_TOLERANCE)),
        };
        Self {
            screen_min,
            screen_max,
            world_min,
            world_max,
            scale,
        }
    }

    /// Access the scale.
    pub fn scale(&self) -> AxisScale {
        self.scale
    }

    /// Configured world bounds.
    pub fn world_bounds(&self) -> (f64, f64) {
        (self.world_min, self.world_max)
    }

    /// Map a world value to a screen coordinate.
    ///
    /// The world bounds land exactly on the screen bounds.
    pub fn forward(&self, world: f64) -> f64 {
        let t = match self.scale {
            AxisScale::Linear => (world - self.world_min) / (self.world_max - self.world_min),
            AxisScale::Log10 => {
                (world / self.world_min).log10() / (self.world_max / self.world_min).log10()
            }
        };
        self.screen_min * (1.0 - t) + self.screen_max * t
    }

    /// Map a world value, rejecting values without a finite screen position.
    pub fn try_forward(&self, world: f64) -> Option<f64> {
        self.scale.map_value(world)?;
        let screen = self.forward(world);
        screen.is_finite().then_some(screen)
    }

    /// Map a screen coordinate back to a world value.
    pub fn inverse(&self, screen: f64) -> f64 {
        self.world_at((screen - self.screen_min) / (self.screen_max - self.screen_min))
    }

    /// World value at fraction `t` of the way from `world_min` to
    /// `world_max`, measured in screen space.
    ///
    /// Depends on the world bounds only, not on the screen bounds.
    pub fn world_at(&self, t: f64) -> f64 {
        match self.scale {
            AxisScale::Linear => self.world_min * (1.0 - t) + self.world_max * t,
            AxisScale::Log10 => self.world_min * (self.world_max / self.world_min).powf(t),
        }
    }
}

/// Transform from world coordinates into screen coordinates of a plot rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    screen: ScreenRect,
    x: CoordinateMapper,
    y: CoordinateMapper,
}

impl Transform {
    /// Create a transform for two axes and a screen rectangle.
    ///
    /// Returns `None` if the rectangle has no area.
    pub fn new(x_axis: &Axis, y_axis: &Axis, screen: ScreenRect) -> Option<Self> {
        if !screen.is_valid() {
            return None;
        }
        let x = CoordinateMapper::new(
            screen.min.x as f64,
            screen.max.x as f64,
            x_axis.start,
            x_axis.stop,
            x_axis.scale(),
        );
        let y = CoordinateMapper::new(
            screen.max.y as f64,
            screen.min.y as f64,
            y_axis.start,
            y_axis.stop,
            y_axis.scale(),
        );
        Some(Self { screen, x, y })
    }

    /// Access the screen rectangle.
    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    /// Access the x mapper.
    pub fn x(&self) -> &CoordinateMapper {
        &self.x
    }

    /// Access the y mapper.
    pub fn y(&self) -> &CoordinateMapper {
        &self.y
    }

    /// Map a world point into screen space.
    pub fn data_to_screen(&self, point: Point) -> Option<ScreenPoint> {
        let sx = self.x.try_forward(point.x)?;
        let sy = self.y.try_forward(point.y)?;
        Some(ScreenPoint::new(narrow(sx), narrow(sy)))
    }

    /// Map a screen point into world space.
    pub fn screen_to_data(&self, point: ScreenPoint) -> Point {
        Point::new(
            self.x.inverse(point.x as f64),
            self.y.inverse(point.y as f64),
        )
    }
}

/// Narrow a screen coordinate to `f32`, clamped to the guard band.
pub(crate) fn narrow(value: f64) -> f32 {
    value.clamp(-SCREEN_GUARD, SCREEN_GUARD) as f32
}
