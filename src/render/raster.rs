//! PNG rendering of a timeline scene into an RGBA pixel buffer.

use image::{ImageBuffer, Rgba, RgbaImage};
use std::io::Cursor;
use std::time::Instant;
use tracing::debug;

use super::canvas::{
    marker_radius, pt_to_px, Canvas, LABEL_FONT_PT, LEGEND_MARKER_SPACE, LEGEND_ROW, TICK_LENGTH,
};
use super::font;
use super::RenderOptions;
use crate::colours::Colour;
use crate::error::{DoylineError, Result};
use crate::timeline::axis::format_tick;
use crate::timeline::{Arrow, Element, Scatter, Scene, Segment, Text};

const AXIS_COLOUR: Colour = Colour::from_rgb(0, 0, 0);

/// Draw `scene` into a new image buffer
pub fn rasterize(scene: &Scene, options: &RenderOptions) -> RgbaImage {
    let canvas = Canvas::new(scene, options);
    let mut img: RgbaImage =
        ImageBuffer::from_pixel(canvas.width, canvas.height, options.background.into());

    for element in scene.elements() {
        match element {
            Element::Scatter(s) => draw_scatter(&mut img, &canvas, s),
            Element::Segment(s) => draw_segment(&mut img, &canvas, s),
            Element::Arrow(a) => draw_arrow(&mut img, &canvas, a),
            Element::Text(t) => draw_text_element(&mut img, &canvas, t),
        }
    }

    draw_x_axis(&mut img, &canvas, scene);
    draw_legend(&mut img, &canvas, scene);

    img
}

/// Render `scene` and encode it as PNG
pub fn render_png(scene: &Scene, options: &RenderOptions) -> Result<Vec<u8>> {
    let image_gen_start = Instant::now();
    let img = rasterize(scene, options);
    debug!(
        width = options.width,
        height = options.height,
        duration_ms = image_gen_start.elapsed().as_millis() as u64,
        "Rasterized timeline"
    );

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| DoylineError::ImageGeneration {
            message: format!("Failed to encode PNG: {}", e),
        })?;

    Ok(buffer.into_inner())
}

/// Alpha-blend `colour` onto pixel (x, y) with the given coverage
fn blend(img: &mut RgbaImage, x: i64, y: i64, colour: Colour, coverage: f64) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let alpha = colour.opacity() * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let pixel = img.get_pixel_mut(x as u32, y as u32);
    let Rgba([r, g, b, a]) = *pixel;
    let mix = |dst: u8, src: u8| (src as f64 * alpha + dst as f64 * (1.0 - alpha)).round() as u8;
    *pixel = Rgba([
        mix(r, colour.r),
        mix(g, colour.g),
        mix(b, colour.b),
        (alpha * 255.0 + a as f64 * (1.0 - alpha)).round() as u8,
    ]);
}

/// Pixel bounds covering [lo, hi] clamped to the image
fn pixel_span(lo: f64, hi: f64, limit: u32) -> std::ops::Range<i64> {
    let start = lo.floor().max(0.0) as i64;
    let end = (hi.ceil() + 1.0).min(limit as f64).max(0.0) as i64;
    start..end.max(start)
}

fn fill_circle(img: &mut RgbaImage, cx: f64, cy: f64, radius: f64, colour: Colour) {
    for y in pixel_span(cy - radius - 1.0, cy + radius + 1.0, img.height()) {
        for x in pixel_span(cx - radius - 1.0, cx + radius + 1.0, img.width()) {
            let d = ((x as f64 + 0.5 - cx).powi(2) + (y as f64 + 0.5 - cy).powi(2)).sqrt();
            blend(img, x, y, colour, radius + 0.5 - d);
        }
    }
}

/// Draw a line of `width` pixels; `dashes` are on/off lengths in pixels
fn draw_line(
    img: &mut RgbaImage,
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    width: f64,
    colour: Colour,
    dashes: Option<(f64, f64)>,
) {
    let (dx, dy) = (x2 - x1, y2 - y1);
    let len_sq = dx * dx + dy * dy;
    let half = (width / 2.0).max(0.5);
    let pad = half + 1.0;

    for y in pixel_span(y1.min(y2) - pad, y1.max(y2) + pad, img.height()) {
        for x in pixel_span(x1.min(x2) - pad, x1.max(x2) + pad, img.width()) {
            let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
            let t = if len_sq > 0.0 {
                (((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };

            if let Some((on, off)) = dashes {
                let along = t * len_sq.sqrt();
                if along % (on + off) > on {
                    continue;
                }
            }

            let (cx, cy) = (x1 + t * dx, y1 + t * dy);
            let d = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
            blend(img, x, y, colour, half + 0.5 - d);
        }
    }
}

/// Even-odd point-in-polygon test
fn contains(polygon: &[(f64, f64)], px: f64, py: f64) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn fill_polygon(img: &mut RgbaImage, polygon: &[(f64, f64)], colour: Colour) {
    if polygon.len() < 3 {
        return;
    }
    let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for &(x, y) in polygon {
        x0 = x0.min(x);
        y0 = y0.min(y);
        x1 = x1.max(x);
        y1 = y1.max(y);
    }

    for y in pixel_span(y0, y1, img.height()) {
        for x in pixel_span(x0, x1, img.width()) {
            if contains(polygon, x as f64 + 0.5, y as f64 + 0.5) {
                blend(img, x, y, colour, 1.0);
            }
        }
    }
}

/// Draw `text` with its lower-left corner at (x, baseline)
fn draw_text(
    img: &mut RgbaImage,
    x: f64,
    baseline: f64,
    text: &str,
    size_px: f64,
    colour: Colour,
) {
    let scale = font::scale_for(size_px) as i64;
    let top = baseline.round() as i64 - font::GLYPH_HEIGHT as i64 * scale;
    let mut left = x.round() as i64;

    for c in text.chars() {
        for (col, row) in font::lit_pixels(c) {
            for sy in 0..scale {
                for sx in 0..scale {
                    blend(
                        img,
                        left + col as i64 * scale + sx,
                        top + row as i64 * scale + sy,
                        colour,
                        1.0,
                    );
                }
            }
        }
        left += font::CELL_WIDTH as i64 * scale;
    }
}

fn draw_scatter(img: &mut RgbaImage, canvas: &Canvas, scatter: &Scatter) {
    let radius = marker_radius(scatter.size);
    for point in &scatter.points {
        let (x, y) = canvas.to_px(*point);
        fill_circle(img, x, y, radius, scatter.colour);
    }
}

fn draw_segment(img: &mut RgbaImage, canvas: &Canvas, segment: &Segment) {
    draw_line(
        img,
        canvas.to_px(segment.from),
        canvas.to_px(segment.to),
        pt_to_px(segment.width),
        segment.colour,
        segment.dashes.map(|(on, off)| (pt_to_px(on), pt_to_px(off))),
    );
}

fn draw_arrow(img: &mut RgbaImage, canvas: &Canvas, arrow: &Arrow) {
    draw_line(
        img,
        canvas.to_px(arrow.start),
        canvas.to_px(arrow.shaft_end()),
        pt_to_px(arrow.width),
        arrow.colour,
        None,
    );
    let head: Vec<(f64, f64)> = arrow
        .head_polygon()
        .iter()
        .map(|p| canvas.to_px(*p))
        .collect();
    fill_polygon(img, &head, arrow.colour);
}

fn draw_text_element(img: &mut RgbaImage, canvas: &Canvas, text: &Text) {
    let (x, y) = canvas.to_px(text.anchor);
    draw_text(img, x, y, &text.text, pt_to_px(text.size), text.colour);
}

fn draw_x_axis(img: &mut RgbaImage, canvas: &Canvas, scene: &Scene) {
    let font_px = pt_to_px(LABEL_FONT_PT);
    let base = canvas.plot.bottom;

    for &tick in &scene.x_ticks {
        let x = canvas.x_to_px(tick);
        draw_line(img, (x, base), (x, base + TICK_LENGTH), 1.0, AXIS_COLOUR, None);

        let label = format_tick(tick);
        let label_x = x - font::text_width(&label, font_px) / 2.0;
        let baseline = base + TICK_LENGTH + 4.0 + font::text_height(font_px);
        draw_text(img, label_x, baseline, &label, font_px, AXIS_COLOUR);
    }
}

fn draw_legend(img: &mut RgbaImage, canvas: &Canvas, scene: &Scene) {
    let font_px = pt_to_px(LABEL_FONT_PT);
    let radius = marker_radius(scene.scatters().next().map_or(10.0, |s| s.size));
    let (x0, y0) = canvas.legend_origin();

    for (i, entry) in scene.legend.iter().enumerate() {
        let cy = y0 + LEGEND_ROW * (i as f64 + 0.5);
        fill_circle(img, x0 + LEGEND_MARKER_SPACE / 2.0, cy, radius, entry.colour);
        let baseline = cy + font::text_height(font_px) / 2.0;
        draw_text(
            img,
            x0 + LEGEND_MARKER_SPACE,
            baseline,
            &entry.label,
            font_px,
            AXIS_COLOUR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_date_str;
    use crate::timeline::{draw_timeline, Point, Style, TimelineRequest, Tracks};
    use image::GenericImageView;

    const WHITE: Colour = Colour::from_rgb(255, 255, 255);

    fn options() -> RenderOptions {
        RenderOptions {
            width: 600,
            height: 140,
            margin: 30,
            background: WHITE,
        }
    }

    fn white_image(w: u32, h: u32) -> RgbaImage {
        ImageBuffer::from_pixel(w, h, WHITE.into())
    }

    #[test]
    fn test_blend_full_and_half() {
        let mut img = white_image(2, 1);
        blend(&mut img, 0, 0, Colour::from_rgb(0, 0, 0), 1.0);
        blend(&mut img, 1, 0, Colour::from_rgb(0, 0, 0), 0.5);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 0).0[0], 128);

        // Out of bounds is ignored
        blend(&mut img, -1, 5, Colour::from_rgb(0, 0, 0), 1.0);
    }

    #[test]
    fn test_fill_circle_centre() {
        let mut img = white_image(20, 20);
        fill_circle(&mut img, 10.0, 10.0, 3.0, Colour::from_rgb(255, 0, 0));
        assert_eq!(img.get_pixel(10, 10).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let mut img = white_image(100, 5);
        let red = Colour::from_rgb(255, 0, 0);
        draw_line(&mut img, (0.0, 2.5), (100.0, 2.5), 1.0, red, Some((10.0, 10.0)));

        assert_eq!(img.get_pixel(5, 2).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(15, 2).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(25, 2).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_polygon_contains() {
        let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        assert!(contains(&square, 5.0, 5.0));
        assert!(!contains(&square, 15.0, 5.0));
    }

    #[test]
    fn test_markers_land_on_track() {
        let request = TimelineRequest::new(
            Tracks::Single(vec![25, 100, 200]),
            parse_date_str("20170101").unwrap(),
        );
        let style = Style::default();
        let scene = draw_timeline(&request, &style).unwrap();
        let img = rasterize(&scene, &options());

        let canvas = Canvas::new(&scene, &options());
        let (x, y) = canvas.to_px(Point::new(100.0, 0.0));
        let pixel = img.get_pixel(x as u32, y as u32).0;
        let marker = style.palette.colour(0, 1);
        assert_eq!(pixel, [marker.r, marker.g, marker.b, 255]);
    }

    #[test]
    fn test_render_png_signature() {
        let request = TimelineRequest::new(
            Tracks::Multiple(vec![vec![10, 50], vec![20]]),
            parse_date_str("20170101").unwrap(),
        )
        .with_names(vec!["S2A".to_string(), "S2B".to_string()]);
        let scene = draw_timeline(&request, &Style::default()).unwrap();
        let bytes = render_png(&scene, &options()).unwrap();

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 600);
        assert_eq!(decoded.height(), 140);
    }
}
