//! Draw styles and the semantic color table.

use std::ops::{Index, IndexMut};

use crate::render::{Color, MarkerShape};

/// How sampled points are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawStyle {
    /// Straight segments between consecutive finite points.
    #[default]
    Line,
    /// Hollow circle at each point.
    Circle,
    /// Filled circle with a stem down to the baseline (discrete-time signals).
    CircleSample,
    /// X-shaped marker at each point.
    Cross,
    /// Square marker at each point.
    Box,
}

impl DrawStyle {
    /// Check whether the style draws isolated markers.
    pub fn is_discrete(self) -> bool {
        self != Self::Line
    }

    /// Marker shape and fill for discrete styles.
    pub(crate) fn marker(self) -> Option<(MarkerShape, bool)> {
        match self {
            Self::Line => None,
            Self::Circle => Some((MarkerShape::Circle, false)),
            Self::CircleSample => Some((MarkerShape::Circle, true)),
            Self::Cross => Some((MarkerShape::Cross, false)),
            Self::Box => Some((MarkerShape::Square, true)),
        }
    }
}

/// Semantic role of a color. The discriminant is the index into a
/// [`ColorTable`] and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(usize)]
pub enum ColorRole {
    /// Tick labels.
    Labels = 0,
    /// Grid lines.
    Grid = 1,
    /// The plotted curve.
    Graph = 2,
    /// Bounding box and tick marks.
    Box = 3,
    /// Axis titles.
    AxisName = 4,
    /// Note text.
    NoteText = 5,
    /// Note box background.
    NoteBox = 6,
}

impl ColorRole {
    /// Number of roles.
    pub const COUNT: usize = 7;

    /// All roles in index order.
    pub const ALL: [ColorRole; Self::COUNT] = [
        Self::Labels,
        Self::Grid,
        Self::Graph,
        Self::Box,
        Self::AxisName,
        Self::NoteText,
        Self::NoteBox,
    ];
}

/// Fixed-size color palette indexed by [`ColorRole`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorTable([Color; ColorRole::COUNT]);

impl ColorTable {
    /// Build a table positionally (index = [`ColorRole`] discriminant).
    pub const fn from_array(colors: [Color; ColorRole::COUNT]) -> Self {
        Self(colors)
    }

    /// Colors in index order.
    pub fn as_array(&self) -> &[Color; ColorRole::COUNT] {
        &self.0
    }

    /// Light palette.
    pub fn light() -> Self {
        Self([
            Color::new(0.0, 0.0, 0.0, 1.0),
            Color::new(0.75, 0.75, 0.75, 1.0),
            Color::new(0.85, 0.1, 0.1, 1.0),
            Color::new(0.0, 0.0, 0.0, 1.0),
            Color::new(0.0, 0.0, 0.55, 1.0),
            Color::new(0.0, 0.0, 0.0, 1.0),
            Color::new(1.0, 1.0, 0.8, 1.0),
        ])
    }

    /// Dark palette.
    pub fn dark() -> Self {
        Self([
            Color::new(0.85, 0.85, 0.85, 1.0),
            Color::new(0.3, 0.3, 0.3, 1.0),
            Color::new(0.2, 0.75, 0.95, 1.0),
            Color::new(0.7, 0.7, 0.7, 1.0),
            Color::new(0.95, 0.85, 0.4, 1.0),
            Color::new(0.1, 0.1, 0.1, 1.0),
            Color::new(0.9, 0.9, 0.6, 1.0),
        ])
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::light()
    }
}

impl Index<ColorRole> for ColorTable {
    type Output = Color;

    fn index(&self, role: ColorRole) -> &Color {
        &self.0[role as usize]
    }
}

impl IndexMut<ColorRole> for ColorTable {
    fn index_mut(&mut self, role: ColorRole) -> &mut Color {
        &mut self.0[role as usize]
    }
}
