//! Configuration management for doyline.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::colours::{get_palette, parse_colour};
use crate::dates::{parse_date_str, DEFAULT_START_DATE};
use crate::error::{DoylineError, Result};
use crate::render::OutputFormat;

/// Command-line arguments for doyline
#[derive(Parser, Debug)]
#[command(name = "doyline")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to JSON configuration file
    #[arg(short, long, env = "DOYLINE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Reference start date (YYYYMMDD), counted as day 1
    #[arg(short, long, env = "DOYLINE_START_DATE", global = true)]
    pub start_date: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DOYLINE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the day offsets of every date in the given files
    Doy {
        /// Date files, one YYYYMMDD date per line
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Draw a timeline from one or more date files
    Draw(DrawArgs),
}

/// Arguments of the `draw` subcommand
#[derive(ClapArgs, Debug)]
pub struct DrawArgs {
    /// Date files; one file draws a single track, several draw one track each
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Comma-separated legend labels, one per track
    #[arg(short, long, value_delimiter = ',')]
    pub names: Option<Vec<String>>,

    /// Date file whose dates are drawn as dashed reference lines
    #[arg(short, long)]
    pub interp: Option<PathBuf>,

    /// Output file (.svg, .png or .pdf); SVG goes to stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format, overriding the output file extension
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Image width in pixels
    #[arg(long, env = "DOYLINE_WIDTH")]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long, env = "DOYLINE_HEIGHT")]
    pub height: Option<u32>,

    /// Marker area in points squared
    #[arg(long)]
    pub marker_size: Option<f64>,
}

/// Drawing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Marker area in points squared
    #[serde(default = "default_marker_size")]
    pub marker_size: f64,

    /// Image width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels (None = derived from the track count)
    #[serde(default)]
    pub height: Option<u32>,

    /// Blank border around the plot in pixels
    #[serde(default = "default_margin")]
    pub margin: u32,

    /// Track colour palette (tab10, viridis, plasma, turbo, sinebow)
    #[serde(default = "default_palette")]
    pub palette: String,

    #[serde(default = "default_arrow_colour")]
    pub arrow_colour: String,

    #[serde(default = "default_month_colour")]
    pub month_colour: String,

    #[serde(default = "default_interp_colour")]
    pub interp_colour: String,

    #[serde(default = "default_background")]
    pub background: String,

    /// Label doys along the bottom of multi-track timelines
    #[serde(default = "default_show_doy_axis")]
    pub show_doy_axis: bool,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Reference start date (YYYYMMDD)
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// Drawing configuration
    #[serde(default)]
    pub style: StyleConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Command)> {
        Self::from_args(Args::parse())
    }

    /// Build the configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, Command)> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(start_date) = args.start_date {
            config.start_date = start_date;
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        if let Command::Draw(draw) = &args.command {
            config.apply_draw_args(draw);
        }

        Ok((config, args.command))
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.start_date = other.start_date;
        self.style = other.style;
        self.log_level = other.log_level;
    }

    fn apply_draw_args(&mut self, draw: &DrawArgs) {
        if let Some(width) = draw.width {
            self.style.width = width;
        }
        if draw.height.is_some() {
            self.style.height = draw.height;
        }
        if let Some(marker_size) = draw.marker_size {
            self.style.marker_size = marker_size;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        parse_date_str(&self.start_date).map_err(|e| DoylineError::Config {
            message: format!("Invalid start date: {}", e),
        })?;

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(DoylineError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        let style = &self.style;
        if !(style.marker_size > 0.0) {
            return Err(DoylineError::Config {
                message: format!("Marker size must be positive, got {}", style.marker_size),
            });
        }
        if style.width == 0 || style.height == Some(0) {
            return Err(DoylineError::Config {
                message: "Image dimensions cannot be 0".to_string(),
            });
        }
        if style.margin.saturating_mul(2) >= style.width {
            return Err(DoylineError::Config {
                message: format!(
                    "Margin {} leaves no room in a {} pixel wide image",
                    style.margin, style.width
                ),
            });
        }

        for colour in [
            &style.arrow_colour,
            &style.month_colour,
            &style.interp_colour,
            &style.background,
        ] {
            parse_colour(colour).map_err(|e| DoylineError::Config {
                message: e.to_string(),
            })?;
        }
        get_palette(&style.palette).map_err(|e| DoylineError::Config {
            message: e.to_string(),
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            style: StyleConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            marker_size: default_marker_size(),
            width: default_width(),
            height: None,
            margin: default_margin(),
            palette: default_palette(),
            arrow_colour: default_arrow_colour(),
            month_colour: default_month_colour(),
            interp_colour: default_interp_colour(),
            background: default_background(),
            show_doy_axis: default_show_doy_axis(),
        }
    }
}

// Default value functions for serde
fn default_start_date() -> String {
    DEFAULT_START_DATE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_marker_size() -> f64 {
    10.0
}

fn default_width() -> u32 {
    600
}

fn default_margin() -> u32 {
    30
}

fn default_palette() -> String {
    "tab10".to_string()
}

fn default_arrow_colour() -> String {
    "gray".to_string()
}

fn default_month_colour() -> String {
    "orange".to_string()
}

fn default_interp_colour() -> String {
    "red".to_string()
}

fn default_background() -> String {
    "white".to_string()
}

fn default_show_doy_axis() -> bool {
    true
}
