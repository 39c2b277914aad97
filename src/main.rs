//! doyline - day-of-year timelines from date files
//!
//! This is the main entry point for the doyline command-line tool.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use doyline::config::{Command, DrawArgs};
use doyline::logging::log_datefile_stats;
use doyline::render::{render, save, OutputFormat, RenderOptions};
use doyline::timeline::{draw_timeline, Style, TimelineRequest, Tracks};
use doyline::{
    init_tracing, log_error, log_operation_end, log_operation_start, parse_date_str,
    read_datefile, Config,
};

fn main() -> Result<()> {
    // Load configuration
    let (config, command) = Config::load().context("Failed to load configuration")?;

    // Validate configuration
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.log_level);
    info!("Starting doyline v{}", env!("CARGO_PKG_VERSION"));

    match command {
        Command::Doy { files } => run_doy(&config, &files),
        Command::Draw(args) => run_draw(&config, &args),
    }
}

/// Print the doys of every file, one per line
fn run_doy(config: &Config, files: &[PathBuf]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for path in files {
        let doys = load_doys(config, path)?;
        if files.len() > 1 {
            writeln!(out, "# {}", path.display())?;
        }
        for doy in doys {
            writeln!(out, "{}", doy)?;
        }
    }

    Ok(())
}

/// Draw one track per date file
fn run_draw(config: &Config, args: &DrawArgs) -> Result<()> {
    let start_time = Instant::now();
    log_operation_start("draw", Some(&format!("{} date file(s)", args.files.len())));

    let lists = args
        .files
        .iter()
        .map(|path| load_doys(config, path))
        .collect::<Result<Vec<_>>>()?;
    let track_count = lists.len();

    let start = parse_date_str(&config.start_date)?;
    let mut request = TimelineRequest::new(Tracks::from_lists(lists), start);
    if let Some(names) = &args.names {
        request = request.with_names(names.clone());
    }
    if let Some(interp) = &args.interp {
        request = request.with_interp(load_doys(config, interp)?);
    }

    let style = Style::from_config(&config.style)?;
    let scene = draw_timeline(&request, &style).map_err(|e| {
        log_error(&e, "timeline layout");
        e
    })?;
    let options = RenderOptions::from_config(&config.style, track_count)?;

    match &args.output {
        Some(path) => {
            save(&scene, path, args.format, &options)
                .map_err(|e| {
                    log_error(&e, "saving timeline");
                    e
                })
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            let bytes = render(&scene, args.format.unwrap_or(OutputFormat::Svg), &options)?;
            std::io::stdout().write_all(&bytes)?;
        }
    }

    log_operation_end("draw", start_time, true);
    Ok(())
}

fn load_doys(config: &Config, path: &Path) -> Result<Vec<i64>> {
    let doys = read_datefile(path, &config.start_date)
        .map_err(|e| {
            log_error(&e, "reading date file");
            e
        })
        .with_context(|| format!("Failed to read date file {}", path.display()))?;

    if let (Some(min), Some(max)) = (doys.iter().min(), doys.iter().max()) {
        log_datefile_stats(&path.display().to_string(), doys.len(), *min, *max);
    }

    Ok(doys)
}
