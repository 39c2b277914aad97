//! Mapping from data coordinates to pixels.

use super::font;
use super::RenderOptions;
use crate::timeline::{Point, Scene};

/// Output resolution used to convert points to pixels
pub const DPI: f64 = 100.0;
/// Font size of annotations, tick labels and legend entries in points
pub const LABEL_FONT_PT: f64 = 10.0;
/// Length of an x-axis tick mark in pixels
pub const TICK_LENGTH: f64 = 4.0;
/// Vertical distance between legend entries in pixels
pub const LEGEND_ROW: f64 = 18.0;
/// Space for the legend marker in front of each label
pub const LEGEND_MARKER_SPACE: f64 = 20.0;
const LEGEND_GAP: f64 = 16.0;
const MIN_PLOT_SIZE: f64 = 10.0;

/// Convert points to pixels
pub fn pt_to_px(pt: f64) -> f64 {
    pt * DPI / 72.0
}

/// Radius in pixels of a marker whose area is `size` points squared
pub fn marker_radius(size: f64) -> f64 {
    pt_to_px((size / std::f64::consts::PI).sqrt())
}

/// Pixel rectangle the axes occupy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub plot: PlotArea,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Canvas {
    /// Lay out the plot area, leaving room for the doy axis and the legend
    pub fn new(scene: &Scene, options: &RenderOptions) -> Self {
        let width = options.width as f64;
        let height = options.height as f64;
        let margin = options.margin as f64;
        let label_px = pt_to_px(LABEL_FONT_PT);

        let legend_width = scene
            .legend
            .iter()
            .map(|entry| font::text_width(&entry.label, label_px))
            .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |a| a.max(w))))
            .map_or(0.0, |w| w + LEGEND_MARKER_SPACE + LEGEND_GAP);

        let axis_height = if scene.x_ticks.is_empty() {
            0.0
        } else {
            TICK_LENGTH + 4.0 + font::text_height(label_px)
        };

        let left = margin;
        let top = margin;
        let right = (width - margin - legend_width).max(left + MIN_PLOT_SIZE);
        let bottom = (height - margin - axis_height).max(top + MIN_PLOT_SIZE);

        Self {
            width: options.width,
            height: options.height,
            plot: PlotArea {
                left,
                top,
                right,
                bottom,
            },
            x_range: scene.x_range,
            y_range: scene.y_range,
        }
    }

    pub fn x_to_px(&self, x: f64) -> f64 {
        let (x0, x1) = self.x_range;
        self.plot.left + (x - x0) / (x1 - x0) * (self.plot.right - self.plot.left)
    }

    pub fn y_to_px(&self, y: f64) -> f64 {
        let (y0, y1) = self.y_range;
        self.plot.bottom - (y - y0) / (y1 - y0) * (self.plot.bottom - self.plot.top)
    }

    pub fn to_px(&self, p: Point) -> (f64, f64) {
        (self.x_to_px(p.x), self.y_to_px(p.y))
    }

    /// Scale a distance along x
    pub fn dx_to_px(&self, dx: f64) -> f64 {
        dx / (self.x_range.1 - self.x_range.0) * (self.plot.right - self.plot.left)
    }

    /// Top-left corner of the legend box, right of the plot
    pub fn legend_origin(&self) -> (f64, f64) {
        (self.plot.right + LEGEND_GAP, self.plot.top)
    }
}
