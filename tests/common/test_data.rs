//! Test data generation utilities.
//!
//! Writes date files (one `YYYYMMDD` date per line) with known contents.

use std::io::Write;
use std::path::{Path, PathBuf};

/// Acquisition dates of one tile over 2017
pub const TILE_A_DATES: &[&str] = &[
    "20170125", "20170130", "20170206", "20170318", "20170407", "20170517", "20170621",
    "20170726", "20170825", "20170929", "20171103", "20171223",
];

/// Day offsets of [`TILE_A_DATES`] from 20170101
pub const TILE_A_DOYS: &[i64] = &[25, 30, 37, 77, 97, 137, 172, 207, 237, 272, 307, 357];

/// Acquisition dates of a second tile over 2017
pub const TILE_B_DATES: &[&str] = &["20170110", "20170301", "20170601", "20170901", "20171201"];

/// Day offsets of [`TILE_B_DATES`] from 20170101
pub const TILE_B_DOYS: &[i64] = &[10, 60, 152, 244, 335];

/// Dates for dashed reference lines
pub const INTERP_DATES: &[&str] = &["20170401", "20170801"];

/// Write `dates` into `dir/name`, one per line
pub fn write_datefile(dir: &Path, name: &str, dates: &[&str]) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path)?;
    for date in dates {
        writeln!(file, "{}", date)?;
    }
    Ok(path)
}

/// Write a JSON configuration file into `dir`
pub fn write_config(dir: &Path, json: &str) -> std::io::Result<PathBuf> {
    let path = dir.join("doyline.json");
    std::fs::write(&path, json)?;
    Ok(path)
}
