//! Output backends for timeline scenes.
//!
//! A [`Scene`] is drawn as an SVG document, a PNG image or a PDF page.

pub mod canvas;
pub mod font;
pub mod pdf;
pub mod raster;
pub mod svg;

pub use canvas::Canvas;
pub use pdf::render_pdf;
pub use raster::{rasterize, render_png};
pub use svg::render_svg;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::colours::{parse_colour, Colour};
use crate::config::StyleConfig;
use crate::error::{DoylineError, Result};
use crate::timeline::Scene;

/// Plot height in pixels of a single track, margins excluded
const SINGLE_TRACK_HEIGHT: u32 = 80;
/// Plot height in pixels per track of a multi-track timeline
const TRACK_HEIGHT: u32 = 50;
/// Extra plot height of a multi-track timeline for the month labels and doy axis
const MULTI_TRACK_EXTRA: u32 = 60;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(DoylineError::InvalidParameter {
                param: "output".to_string(),
                message: format!(
                    "Cannot infer output format from '{}'. Use a .svg, .png or .pdf file name or pass --format",
                    path.display()
                ),
            }),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
        }
    }
}

/// Pixel geometry of the output image
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub background: Colour,
}

impl RenderOptions {
    /// Resolve the configured geometry; an unset height follows the track count
    pub fn from_config(config: &StyleConfig, track_count: usize) -> Result<Self> {
        let height = config
            .height
            .unwrap_or_else(|| auto_height(track_count) + 2 * config.margin);

        Ok(Self {
            width: config.width,
            height,
            margin: config.margin,
            background: parse_colour(&config.background)?,
        })
    }
}

/// Plot height, margins excluded, for `track_count` tracks
pub fn auto_height(track_count: usize) -> u32 {
    if track_count <= 1 {
        SINGLE_TRACK_HEIGHT
    } else {
        TRACK_HEIGHT * track_count as u32 + MULTI_TRACK_EXTRA
    }
}

/// Render `scene` into the bytes of the requested format
pub fn render(scene: &Scene, format: OutputFormat, options: &RenderOptions) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Svg => render_svg(scene, options).map(String::into_bytes),
        OutputFormat::Png => render_png(scene, options),
        OutputFormat::Pdf => Ok(render_pdf(scene, options)),
    }
}

/// Render `scene` to `path`. Without an explicit format the extension decides.
pub fn save(
    scene: &Scene,
    path: &Path,
    format: Option<OutputFormat>,
    options: &RenderOptions,
) -> Result<OutputFormat> {
    let format = match format {
        Some(format) => format,
        None => OutputFormat::from_path(path)?,
    };

    let bytes = render(scene, format, options)?;
    std::fs::write(path, &bytes)?;

    info!(
        output = %path.display(),
        format = format.extension(),
        bytes = bytes.len(),
        width = options.width,
        height = options.height,
        "Timeline saved"
    );

    Ok(format)
}
