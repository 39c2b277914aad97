//! # doyline
//!
//! Convert calendar dates into day-of-year offsets and draw them as timelines.
//!
//! Dates are `YYYYMMDD` strings. Each date becomes a "doy": its day offset from
//! a configurable reference start date, the start date itself being day 1.
//! Lists of doys are laid out as a timeline with one horizontal track per list,
//! month marks and optional dashed lines for interpolated dates, then written
//! as SVG, PNG or PDF.
//!
//! ## Architecture
//!
//! - **Dates**: parse date strings and date files into doys
//! - **Timeline**: lay doys out as a backend-independent scene
//! - **Render**: draw a scene as SVG, PNG or PDF

pub mod colours;
pub mod config;
pub mod dates;
pub mod error;
pub mod logging;
pub mod render;
pub mod timeline;

pub use config::Config;
pub use dates::{doa2doy, parse_date_str, read_datefile};
pub use error::{DoylineError, Result};
pub use logging::{
    init_tracing, log_error, log_operation_end, log_operation_start, log_timed_operation,
};
pub use render::{render, save, OutputFormat, RenderOptions};
pub use timeline::{draw_timeline, Scene, Style, TimelineRequest, Tracks};
