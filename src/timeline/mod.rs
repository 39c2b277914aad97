//! Timeline layout.
//!
//! Turns doys into a [`Scene`]: horizontal track arrows, observation markers,
//! month marks and dashed lines for interpolated dates. Rendering the scene is
//! left to [`crate::render`].

pub mod axis;
pub mod layout;
pub mod scene;

pub use layout::{layout_multiple, layout_single};
pub use scene::{Arrow, Element, LegendEntry, Point, Scatter, Scene, Segment, Text};

use chrono::NaiveDate;

use crate::colours::{get_palette, parse_colour, Colour, Palette, Tab10};
use crate::config::StyleConfig;
use crate::error::Result;
use crate::logging::log_timed_operation;

/// The doys to draw: one track, or one list per track
#[derive(Debug, Clone, PartialEq)]
pub enum Tracks {
    Single(Vec<i64>),
    Multiple(Vec<Vec<i64>>),
}

impl Tracks {
    /// One list becomes a single track, anything else one track per list
    pub fn from_lists(mut lists: Vec<Vec<i64>>) -> Self {
        if lists.len() == 1 {
            Tracks::Single(lists.remove(0))
        } else {
            Tracks::Multiple(lists)
        }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        match self {
            Tracks::Single(_) => 1,
            Tracks::Multiple(tracks) => tracks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Tracks::Single(doys) => doys.is_empty(),
            Tracks::Multiple(tracks) => tracks.iter().all(Vec::is_empty),
        }
    }
}

/// Everything a timeline is drawn from
#[derive(Debug, Clone)]
pub struct TimelineRequest {
    pub tracks: Tracks,
    /// Legend labels, one per track
    pub names: Option<Vec<String>>,
    /// Doys drawn as dashed reference lines
    pub interp: Option<Vec<i64>>,
    /// Reference date of doy 1, used to place month marks
    pub start: NaiveDate,
}

impl TimelineRequest {
    pub fn new(tracks: Tracks, start: NaiveDate) -> Self {
        Self {
            tracks,
            names: None,
            interp: None,
            start,
        }
    }

    pub fn with_names(mut self, names: Vec<String>) -> Self {
        self.names = Some(names);
        self
    }

    pub fn with_interp(mut self, interp: Vec<i64>) -> Self {
        self.interp = Some(interp);
        self
    }
}

/// Resolved drawing style
pub struct Style {
    /// Marker area in points squared
    pub marker_size: f64,
    pub arrow_colour: Colour,
    pub month_colour: Colour,
    pub interp_colour: Colour,
    pub palette: Box<dyn Palette>,
    /// Label doys along the bottom of multi-track timelines
    pub show_doy_axis: bool,
}

impl Style {
    /// Resolve colour names and the palette from configuration
    pub fn from_config(config: &StyleConfig) -> Result<Self> {
        Ok(Self {
            marker_size: config.marker_size,
            arrow_colour: parse_colour(&config.arrow_colour)?,
            month_colour: parse_colour(&config.month_colour)?,
            interp_colour: parse_colour(&config.interp_colour)?,
            palette: get_palette(&config.palette)?,
            show_doy_axis: config.show_doy_axis,
        })
    }
}

impl Default for Style {
    fn default() -> Self {
        Self {
            marker_size: 10.0,
            arrow_colour: Colour::from_rgb(128, 128, 128),
            month_colour: Colour::from_rgb(255, 165, 0),
            interp_colour: Colour::from_rgb(255, 0, 0),
            palette: Box::new(Tab10),
            show_doy_axis: true,
        }
    }
}

/// Lay out a timeline, single or multi-track depending on `request.tracks`
pub fn draw_timeline(request: &TimelineRequest, style: &Style) -> Result<Scene> {
    log_timed_operation("layout", || {
        let names = request.names.as_deref();
        let interp = request.interp.as_deref();
        match &request.tracks {
            Tracks::Single(doys) => layout_single(doys, names, interp, request.start, style),
            Tracks::Multiple(tracks) => {
                layout_multiple(tracks, names, interp, request.start, style)
            }
        }
    })
}
