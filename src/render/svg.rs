//! SVG rendering of a timeline scene.

use std::fmt::{self, Write};

use super::canvas::{
    marker_radius, pt_to_px, Canvas, LABEL_FONT_PT, LEGEND_MARKER_SPACE, LEGEND_ROW, TICK_LENGTH,
};
use super::font;
use super::RenderOptions;
use crate::colours::Colour;
use crate::error::{DoylineError, Result};
use crate::logging::log_timed_operation;
use crate::timeline::axis::format_tick;
use crate::timeline::{Arrow, Element, Scatter, Scene, Segment, Text};

/// Render `scene` as a standalone SVG document
pub fn render_svg(scene: &Scene, options: &RenderOptions) -> Result<String> {
    log_timed_operation("render_svg", || {
        let mut svg = String::new();
        write_document(&mut svg, scene, options).map_err(|e| DoylineError::ImageGeneration {
            message: format!("Failed to write SVG: {}", e),
        })?;
        Ok(svg)
    })
}

fn write_document(svg: &mut String, scene: &Scene, options: &RenderOptions) -> fmt::Result {
    let canvas = Canvas::new(scene, options);

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.width,
        h = canvas.height
    )?;
    writeln!(
        svg,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        options.background.to_hex()
    )?;

    for element in scene.elements() {
        match element {
            Element::Scatter(s) => write_scatter(svg, &canvas, s)?,
            Element::Segment(s) => write_segment(svg, &canvas, s)?,
            Element::Arrow(a) => write_arrow(svg, &canvas, a)?,
            Element::Text(t) => write_text(svg, &canvas, t)?,
        }
    }

    write_x_axis(svg, &canvas, scene)?;
    write_legend(svg, &canvas, scene)?;

    writeln!(svg, "</svg>")
}

fn fill_attrs(colour: Colour) -> String {
    if colour.a == 255 {
        format!(r#"fill="{}""#, colour.to_hex())
    } else {
        format!(
            r#"fill="{}" fill-opacity="{:.3}""#,
            colour.to_hex(),
            colour.opacity()
        )
    }
}

fn write_scatter(svg: &mut String, canvas: &Canvas, scatter: &Scatter) -> fmt::Result {
    let r = marker_radius(scatter.size);
    writeln!(svg, r#"  <g class="markers" {}>"#, fill_attrs(scatter.colour))?;
    for point in &scatter.points {
        let (x, y) = canvas.to_px(*point);
        writeln!(svg, r#"    <circle cx="{:.2}" cy="{:.2}" r="{:.2}"/>"#, x, y, r)?;
    }
    writeln!(svg, "  </g>")
}

fn write_segment(svg: &mut String, canvas: &Canvas, segment: &Segment) -> fmt::Result {
    let (x1, y1) = canvas.to_px(segment.from);
    let (x2, y2) = canvas.to_px(segment.to);
    let dash = match segment.dashes {
        Some((on, off)) => format!(
            r#" stroke-dasharray="{:.2} {:.2}""#,
            pt_to_px(on),
            pt_to_px(off)
        ),
        None => String::new(),
    };
    writeln!(
        svg,
        r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}"{}/>"#,
        x1,
        y1,
        x2,
        y2,
        segment.colour.to_hex(),
        pt_to_px(segment.width),
        dash
    )
}

fn write_arrow(svg: &mut String, canvas: &Canvas, arrow: &Arrow) -> fmt::Result {
    let (x1, y1) = canvas.to_px(arrow.start);
    let (x2, y2) = canvas.to_px(arrow.shaft_end());
    let colour = arrow.colour.to_hex();

    writeln!(
        svg,
        r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.2}"/>"#,
        x1,
        y1,
        x2,
        y2,
        colour,
        pt_to_px(arrow.width)
    )?;

    let points: Vec<String> = arrow
        .head_polygon()
        .iter()
        .map(|p| {
            let (x, y) = canvas.to_px(*p);
            format!("{:.2},{:.2}", x, y)
        })
        .collect();
    writeln!(
        svg,
        r#"  <polygon points="{}" fill="{c}" stroke="{c}" stroke-width="{:.2}"/>"#,
        points.join(" "),
        pt_to_px(arrow.width),
        c = colour
    )
}

fn write_text(svg: &mut String, canvas: &Canvas, text: &Text) -> fmt::Result {
    let (x, y) = canvas.to_px(text.anchor);
    writeln!(
        svg,
        r#"  <text x="{:.2}" y="{:.2}" {} font-family="sans-serif" font-size="{:.1}">{}</text>"#,
        x,
        y,
        fill_attrs(text.colour),
        pt_to_px(text.size),
        escape(&text.text)
    )
}

fn write_x_axis(svg: &mut String, canvas: &Canvas, scene: &Scene) -> fmt::Result {
    if scene.x_ticks.is_empty() {
        return Ok(());
    }

    let font_px = pt_to_px(LABEL_FONT_PT);
    let base = canvas.plot.bottom;
    writeln!(svg, r#"  <g class="doy-axis" stroke="black" fill="black">"#)?;
    for &tick in &scene.x_ticks {
        let x = canvas.x_to_px(tick);
        writeln!(
            svg,
            r#"    <line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke-width="1"/>"#,
            base,
            base + TICK_LENGTH,
            x = x
        )?;
        writeln!(
            svg,
            r#"    <text x="{:.2}" y="{:.2}" stroke="none" text-anchor="middle" font-family="sans-serif" font-size="{:.1}">{}</text>"#,
            x,
            base + TICK_LENGTH + 4.0 + font::text_height(font_px),
            font_px,
            format_tick(tick)
        )?;
    }
    writeln!(svg, "  </g>")
}

fn write_legend(svg: &mut String, canvas: &Canvas, scene: &Scene) -> fmt::Result {
    if scene.legend.is_empty() {
        return Ok(());
    }

    let font_px = pt_to_px(LABEL_FONT_PT);
    let (x0, y0) = canvas.legend_origin();
    writeln!(svg, r#"  <g class="legend">"#)?;
    for (i, entry) in scene.legend.iter().enumerate() {
        let cy = y0 + LEGEND_ROW * (i as f64 + 0.5);
        writeln!(
            svg,
            r#"    <circle cx="{:.2}" cy="{:.2}" r="{:.2}" {}/>"#,
            x0 + LEGEND_MARKER_SPACE / 2.0,
            cy,
            marker_radius(scene_marker_size(scene)),
            fill_attrs(entry.colour)
        )?;
        writeln!(
            svg,
            r#"    <text x="{:.2}" y="{:.2}" fill="black" dominant-baseline="middle" font-family="sans-serif" font-size="{:.1}">{}</text>"#,
            x0 + LEGEND_MARKER_SPACE,
            cy,
            font_px,
            escape(&entry.label)
        )?;
    }
    writeln!(svg, "  </g>")
}

/// Legend markers use the size of the first marker set
fn scene_marker_size(scene: &Scene) -> f64 {
    scene.scatters().next().map_or(10.0, |s| s.size)
}

/// Escape text for use in SVG character data and attributes
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
