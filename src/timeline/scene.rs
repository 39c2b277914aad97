//! Backend-independent drawing primitives.
//!
//! Coordinates are data coordinates: x in doys, y in track units. Sizes and
//! line widths are in points; marker sizes are areas in points squared.

use crate::colours::Colour;

/// Layer below everything else (track arrows, interpolation lines)
pub const Z_BACKGROUND: i32 = -1;
/// Layer of the observation markers
pub const Z_MARKERS: i32 = 1;
/// Layer of plain lines (month bars)
pub const Z_LINES: i32 = 2;
/// Layer of annotations
pub const Z_TEXT: i32 = 3;

/// A point in data coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Observation markers of one track
#[derive(Debug, Clone)]
pub struct Scatter {
    pub points: Vec<Point>,
    pub colour: Colour,
    /// Marker area in points squared
    pub size: f64,
}

/// A straight line, optionally dashed
#[derive(Debug, Clone)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub colour: Colour,
    /// Line width in points
    pub width: f64,
    /// On/off dash lengths in points
    pub dashes: Option<(f64, f64)>,
}

/// A horizontal arrow whose length includes the head
#[derive(Debug, Clone)]
pub struct Arrow {
    pub start: Point,
    pub length: f64,
    /// Head width in y data units
    pub head_width: f64,
    /// Head length in x data units
    pub head_length: f64,
    /// Fraction of the head length by which the head's back is indented
    pub overhang: f64,
    pub colour: Colour,
    pub width: f64,
}

impl Arrow {
    pub fn tip(&self) -> Point {
        Point::new(self.start.x + self.length, self.start.y)
    }

    /// Where the shaft meets the (indented) back of the head
    pub fn shaft_end(&self) -> Point {
        let back = self.start.x + self.length - self.head_length;
        Point::new(back + self.overhang * self.head_length, self.start.y)
    }

    /// Head outline: tip, upper barb, notch, lower barb
    pub fn head_polygon(&self) -> [Point; 4] {
        let back = self.start.x + self.length - self.head_length;
        let half = self.head_width / 2.0;
        [
            self.tip(),
            Point::new(back, self.start.y + half),
            self.shaft_end(),
            Point::new(back, self.start.y - half),
        ]
    }
}

/// A text annotation whose lower-left corner sits at `anchor`
#[derive(Debug, Clone)]
pub struct Text {
    pub anchor: Point,
    pub text: String,
    pub colour: Colour,
    /// Font size in points
    pub size: f64,
}

#[derive(Debug, Clone)]
pub enum Element {
    Scatter(Scatter),
    Segment(Segment),
    Arrow(Arrow),
    Text(Text),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub colour: Colour,
}

/// Everything needed to draw one timeline
#[derive(Debug, Clone)]
pub struct Scene {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Doy values to label along the bottom edge (empty hides the axis)
    pub x_ticks: Vec<f64>,
    pub legend: Vec<LegendEntry>,
    layers: Vec<(i32, Element)>,
}

impl Scene {
    pub fn new(x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            x_range,
            y_range,
            x_ticks: Vec::new(),
            legend: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// Add an element on layer `z`; equal layers keep insertion order
    pub fn push(&mut self, z: i32, element: Element) {
        let pos = self.layers.partition_point(|(lz, _)| *lz <= z);
        self.layers.insert(pos, (z, element));
    }

    /// Elements in drawing order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.layers.iter().map(|(_, e)| e)
    }

    pub fn scatters(&self) -> impl Iterator<Item = &Scatter> {
        self.elements().filter_map(|e| match e {
            Element::Scatter(s) => Some(s),
            _ => None,
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.elements().filter_map(|e| match e {
            Element::Segment(s) => Some(s),
            _ => None,
        })
    }

    pub fn arrows(&self) -> impl Iterator<Item = &Arrow> {
        self.elements().filter_map(|e| match e {
            Element::Arrow(a) => Some(a),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &Text> {
        self.elements().filter_map(|e| match e {
            Element::Text(t) => Some(t),
            _ => None,
        })
    }
}
