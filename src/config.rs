//! Layout constants of the plot frame.

/// Layout settings shared by all plot windows.
///
/// Sizes are in logical pixels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlotConfig {
    /// Font size of tick labels.
    pub label_size: f32,
    /// Font size of axis titles.
    pub title_size: f32,
    /// Font size of the note box.
    pub note_size: f32,
    /// Length of tick marks outside the plot rect.
    pub tick_length: f32,
    /// Gap between tick marks, labels and titles.
    pub padding: f32,
    /// Upper bound for labelled ticks per axis.
    pub max_ticks: usize,
    /// Minimum distance between two labelled ticks.
    pub min_tick_spacing: f32,
    /// Margin added on both ends of an autoscaled range, as a fraction of
    /// the observed span.
    pub autoscale_margin: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            label_size: 11.0,
            title_size: 12.0,
            note_size: 11.0,
            tick_length: 5.0,
            padding: 4.0,
            max_ticks: 10,
            min_tick_spacing: 40.0,
            autoscale_margin: 0.05,
        }
    }
}
