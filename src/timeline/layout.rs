//! Single- and multi-track timeline layouts.

use chrono::NaiveDate;
use tracing::debug;

use super::axis::{autoscale, nice_ticks};
use super::scene::{
    Arrow, Element, LegendEntry, Point, Scatter, Scene, Segment, Text, Z_BACKGROUND, Z_LINES,
    Z_MARKERS, Z_TEXT,
};
use super::Style;
use crate::dates::month_marks;
use crate::error::{DoylineError, Result};

/// Half height of a month bar on a single track
pub const MONTH_BAR_SIZE: f64 = 0.025;
/// Extra doys the single-track arrow runs past the autoscaled limit
const SINGLE_ARROW_OVERSHOOT: f64 = 15.0;
const ARROW_OVERHANG: f64 = 0.3;
const ARROW_WIDTH: f64 = 1.0;
const MONTH_BAR_WIDTH: f64 = 1.5;
const INTERP_WIDTH: f64 = 0.5;
const INTERP_DASHES: (f64, f64) = (5.0, 10.0);
const FONT_SIZE: f64 = 10.0;
const SINGLE_Y_RANGE: (f64, f64) = (-0.05, 0.15);
const SINGLE_LABEL_Y: f64 = 0.05;
/// Top of the interpolation lines on a single track
const SINGLE_INTERP_TOP: f64 = 0.1;
/// Height of month labels above the top track
const MULTI_LABEL_OFFSET: f64 = 0.15;
const DOY_AXIS_TICKS: usize = 6;

/// Lay out one track of doys at y = 0
pub fn layout_single(
    doys: &[i64],
    names: Option<&[String]>,
    interp: Option<&[i64]>,
    start: NaiveDate,
    style: &Style,
) -> Result<Scene> {
    let (min_doy, max_doy) = doy_extent(doys.iter()).ok_or_else(|| DoylineError::EmptyInput {
        message: "no dates to draw".to_string(),
    })?;
    let label = track_label(names, 0, 1)?;

    // Arrow geometry follows the limits autoscaled from the markers alone
    let (xmin, xmax) = autoscale(min_doy as f64, max_doy as f64);
    let (ymin, ymax) = autoscale(0.0, 0.0);
    let head_width = 0.5 * (ymax - ymin);
    let head_length = (xmax - xmin) / 30.0;

    let mut scene = Scene::new((xmin, xmax), SINGLE_Y_RANGE);
    let colour = style.palette.colour(0, 1);

    scene.push(
        Z_MARKERS,
        Element::Scatter(Scatter {
            points: doys.iter().map(|&d| Point::new(d as f64, 0.0)).collect(),
            colour,
            size: style.marker_size,
        }),
    );
    if let Some(label) = label {
        scene.legend.push(LegendEntry { label, colour });
    }

    scene.push(
        Z_BACKGROUND,
        Element::Arrow(Arrow {
            start: Point::new(xmin, 0.0),
            length: xmax - xmin + SINGLE_ARROW_OVERSHOOT,
            head_width,
            head_length,
            overhang: ARROW_OVERHANG,
            colour: style.arrow_colour,
            width: ARROW_WIDTH,
        }),
    );

    scene.push(Z_LINES, Element::Segment(month_bar(0.0, style)));
    for mark in month_marks(start, max_doy) {
        if mark.label_doy < min_doy || mark.label_doy > max_doy {
            continue;
        }
        scene.push(
            Z_LINES,
            Element::Segment(month_bar(mark.boundary_doy as f64, style)),
        );
        scene.push(
            Z_TEXT,
            Element::Text(Text {
                anchor: Point::new(mark.label_doy as f64, SINGLE_LABEL_Y),
                text: mark.name.to_string(),
                colour: style.month_colour,
                size: FONT_SIZE,
            }),
        );
    }

    for &dd in interp.unwrap_or_default() {
        scene.push(
            Z_BACKGROUND,
            Element::Segment(interp_line(dd as f64, -MONTH_BAR_SIZE, SINGLE_INTERP_TOP, style)),
        );
    }

    scene.x_range = fit_x_range(&scene, (xmin, xmax));

    debug!(
        dates = doys.len(),
        min_doy = min_doy,
        max_doy = max_doy,
        "Laid out single-track timeline"
    );

    Ok(scene)
}

/// Lay out `tracks.len()` tracks, track `i` at y = i / T
pub fn layout_multiple(
    tracks: &[Vec<i64>],
    names: Option<&[String]>,
    interp: Option<&[i64]>,
    start: NaiveDate,
    style: &Style,
) -> Result<Scene> {
    let count = tracks.len();
    let (min_doy, max_doy) =
        doy_extent(tracks.iter().flatten()).ok_or_else(|| DoylineError::EmptyInput {
            message: "no dates to draw in any track".to_string(),
        })?;
    let t = count as f64;
    let top_track = (t - 1.0) / t;

    let (xmin, xmax) = autoscale(min_doy as f64, max_doy as f64);
    let (ymin, ymax) = autoscale(0.0, top_track);
    let head_width = (ymax - ymin) / 10.0;
    let head_length = (xmax - xmin) / 40.0;

    // Keep the month labels above the top track inside the plot
    let y_top = (2.0 / t + MULTI_LABEL_OFFSET).max(top_track + MULTI_LABEL_OFFSET + 0.1);
    let mut scene = Scene::new((xmin, xmax), (-0.1, y_top));

    for (i, track) in tracks.iter().enumerate() {
        let y = i as f64 / t;
        let colour = style.palette.colour(i, count);

        scene.push(
            Z_MARKERS,
            Element::Scatter(Scatter {
                points: track.iter().map(|&d| Point::new(d as f64, y)).collect(),
                colour,
                size: style.marker_size,
            }),
        );
        if let Some(label) = track_label(names, i, count)? {
            scene.legend.push(LegendEntry { label, colour });
        }

        scene.push(
            Z_BACKGROUND,
            Element::Arrow(Arrow {
                start: Point::new(xmin, y),
                length: xmax - xmin,
                head_width,
                head_length,
                overhang: ARROW_OVERHANG,
                colour: style.arrow_colour,
                width: ARROW_WIDTH,
            }),
        );
    }

    for mark in month_marks(start, max_doy) {
        if mark.label_doy < min_doy || mark.label_doy > max_doy {
            continue;
        }
        scene.push(
            Z_TEXT,
            Element::Text(Text {
                anchor: Point::new(mark.label_doy as f64, top_track + MULTI_LABEL_OFFSET),
                text: mark.name.to_string(),
                colour: style.arrow_colour,
                size: FONT_SIZE,
            }),
        );
    }

    for &dd in interp.unwrap_or_default() {
        scene.push(
            Z_BACKGROUND,
            Element::Segment(interp_line(dd as f64, 0.0, top_track, style)),
        );
    }

    scene.x_range = fit_x_range(&scene, (xmin, xmax));
    if style.show_doy_axis {
        scene.x_ticks = nice_ticks(scene.x_range.0, scene.x_range.1, DOY_AXIS_TICKS);
    }

    debug!(
        tracks = count,
        min_doy = min_doy,
        max_doy = max_doy,
        "Laid out multi-track timeline"
    );

    Ok(scene)
}

fn doy_extent<'a>(doys: impl Iterator<Item = &'a i64>) -> Option<(i64, i64)> {
    doys.fold(None, |acc, &d| match acc {
        None => Some((d, d)),
        Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
    })
}

/// Legend label of track `index`; a short name list is an error
fn track_label(names: Option<&[String]>, index: usize, count: usize) -> Result<Option<String>> {
    match names {
        None => Ok(None),
        Some(names) if names.len() < count => Err(DoylineError::InvalidParameter {
            param: "names".to_string(),
            message: format!("{} name(s) given for {} track(s)", names.len(), count),
        }),
        Some(names) => Ok(Some(names[index].clone())),
    }
}

fn month_bar(x: f64, style: &Style) -> Segment {
    Segment {
        from: Point::new(x, -MONTH_BAR_SIZE),
        to: Point::new(x, MONTH_BAR_SIZE),
        colour: style.month_colour,
        width: MONTH_BAR_WIDTH,
        dashes: None,
    }
}

fn interp_line(x: f64, y0: f64, y1: f64, style: &Style) -> Segment {
    Segment {
        from: Point::new(x, y0),
        to: Point::new(x, y1),
        colour: style.interp_colour,
        width: INTERP_WIDTH,
        dashes: Some(INTERP_DASHES),
    }
}

/// Widen the x limits so every marker and line stays inside the plot
fn fit_x_range(scene: &Scene, initial: (f64, f64)) -> (f64, f64) {
    let xs = scene
        .scatters()
        .flat_map(|s| s.points.iter().map(|p| p.x))
        .chain(scene.segments().flat_map(|s| [s.from.x, s.to.x]));

    let (lo, hi) = xs.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
        (lo.min(x), hi.max(x))
    });
    if lo < initial.0 || hi > initial.1 {
        autoscale(lo.min(initial.0), hi.max(initial.1))
    } else {
        initial
    }
}
