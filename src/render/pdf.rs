//! PDF rendering of a timeline scene.
//!
//! The page is sized from the pixel canvas at [`DPI`], and drawing happens in
//! pixel coordinates with y growing downwards, like the other backends. Text is
//! set in the base-14 Helvetica font, so nothing is embedded.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::debug;

use super::canvas::{
    marker_radius, pt_to_px, Canvas, DPI, LABEL_FONT_PT, LEGEND_MARKER_SPACE, LEGEND_ROW,
    TICK_LENGTH,
};
use super::RenderOptions;
use crate::colours::Colour;
use crate::logging::log_timed_operation;
use crate::timeline::axis::format_tick;
use crate::timeline::{Arrow, Element, Scatter, Scene, Segment, Text};

const CATALOG_ID: Ref = Ref::new(1);
const PAGE_TREE_ID: Ref = Ref::new(2);
const PAGE_ID: Ref = Ref::new(3);
const FONT_ID: Ref = Ref::new(4);
const CONTENT_ID: Ref = Ref::new(5);
const INFO_ID: Ref = Ref::new(6);
const FONT_NAME: Name<'static> = Name(b"F1");

/// Bezier control distance for a quarter circle of radius 1
const KAPPA: f32 = 0.552_284_8;
/// Advance width of a Helvetica digit, in ems
const HELVETICA_DIGIT_WIDTH: f64 = 0.556;
/// Cap height of Helvetica, in ems
const HELVETICA_CAP_HEIGHT: f64 = 0.718;

const AXIS_COLOUR: Colour = Colour::from_rgb(0, 0, 0);

/// Render `scene` as a single-page PDF document
pub fn render_pdf(scene: &Scene, options: &RenderOptions) -> Vec<u8> {
    log_timed_operation("render_pdf", || {
        let canvas = Canvas::new(scene, options);
        let content = draw_content(scene, &canvas, options);
        let bytes = write_document(&canvas, &content);
        debug!(
            bytes = bytes.len(),
            content_bytes = content.len(),
            "Wrote PDF document"
        );
        bytes
    })
}

/// Page size in points
fn page_size(canvas: &Canvas) -> (f32, f32) {
    let scale = 72.0 / DPI;
    (
        (canvas.width as f64 * scale) as f32,
        (canvas.height as f64 * scale) as f32,
    )
}

fn write_document(canvas: &Canvas, content: &[u8]) -> Vec<u8> {
    let (width, height) = page_size(canvas);
    let mut pdf = Pdf::new();

    pdf.catalog(CATALOG_ID).pages(PAGE_TREE_ID);
    pdf.pages(PAGE_TREE_ID).kids([PAGE_ID]).count(1);

    let mut page = pdf.page(PAGE_ID);
    page.media_box(Rect::new(0.0, 0.0, width, height));
    page.parent(PAGE_TREE_ID);
    page.contents(CONTENT_ID);
    page.resources().fonts().pair(FONT_NAME, FONT_ID);
    page.finish();

    pdf.type1_font(FONT_ID).base_font(Name(b"Helvetica"));
    pdf.stream(CONTENT_ID, content);
    pdf.document_info(INFO_ID)
        .producer(TextStr(concat!("doyline ", env!("CARGO_PKG_VERSION"))));

    pdf.finish()
}

fn draw_content(scene: &Scene, canvas: &Canvas, options: &RenderOptions) -> Vec<u8> {
    let (_, page_height) = page_size(canvas);
    let scale = (72.0 / DPI) as f32;
    let mut content = Content::new();

    content.transform([scale, 0.0, 0.0, -scale, 0.0, page_height]);

    set_fill(&mut content, options.background);
    content.rect(0.0, 0.0, canvas.width as f32, canvas.height as f32);
    content.fill_nonzero();

    for element in scene.elements() {
        match element {
            Element::Scatter(s) => draw_scatter(&mut content, canvas, s),
            Element::Segment(s) => draw_segment(&mut content, canvas, s),
            Element::Arrow(a) => draw_arrow(&mut content, canvas, a),
            Element::Text(t) => draw_text_element(&mut content, canvas, t),
        }
    }

    draw_x_axis(&mut content, canvas, scene);
    draw_legend(&mut content, canvas, scene);

    content.finish()
}

fn unit(channel: u8) -> f32 {
    channel as f32 / 255.0
}

fn set_fill(content: &mut Content, colour: Colour) {
    content.set_fill_rgb(unit(colour.r), unit(colour.g), unit(colour.b));
}

fn set_stroke(content: &mut Content, colour: Colour) {
    content.set_stroke_rgb(unit(colour.r), unit(colour.g), unit(colour.b));
}

fn circle(content: &mut Content, cx: f32, cy: f32, r: f32) {
    let k = KAPPA * r;
    content.move_to(cx + r, cy);
    content.cubic_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
    content.cubic_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
    content.cubic_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
    content.cubic_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
    content.close_path();
}

fn line(
    content: &mut Content,
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    width: f64,
    colour: Colour,
    dashes: Option<(f64, f64)>,
) {
    content.save_state();
    set_stroke(content, colour);
    content.set_line_width(width as f32);
    if let Some((on, off)) = dashes {
        content.set_dash_pattern([on as f32, off as f32], 0.0);
    }
    content.move_to(x1 as f32, y1 as f32);
    content.line_to(x2 as f32, y2 as f32);
    content.stroke();
    content.restore_state();
}

/// Helvetica only covers Latin-1 through its standard encoding; keep to ASCII
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() {
                c as u8
            } else {
                b'?'
            }
        })
        .collect()
}

/// Show `text` with its baseline starting at (x, baseline)
fn show_text(
    content: &mut Content,
    x: f64,
    baseline: f64,
    text: &str,
    size_px: f64,
    colour: Colour,
) {
    let bytes = encode_text(text);
    set_fill(content, colour);
    content.begin_text();
    content.set_font(FONT_NAME, size_px as f32);
    // Flip glyphs upright again under the y-down page transform
    content.set_text_matrix([1.0, 0.0, 0.0, -1.0, x as f32, baseline as f32]);
    content.show(Str(&bytes));
    content.end_text();
}

fn draw_scatter(content: &mut Content, canvas: &Canvas, scatter: &Scatter) {
    let radius = marker_radius(scatter.size) as f32;
    set_fill(content, scatter.colour);
    for point in &scatter.points {
        let (x, y) = canvas.to_px(*point);
        circle(content, x as f32, y as f32, radius);
    }
    content.fill_nonzero();
}

fn draw_segment(content: &mut Content, canvas: &Canvas, segment: &Segment) {
    line(
        content,
        canvas.to_px(segment.from),
        canvas.to_px(segment.to),
        pt_to_px(segment.width),
        segment.colour,
        segment.dashes.map(|(on, off)| (pt_to_px(on), pt_to_px(off))),
    );
}

fn draw_arrow(content: &mut Content, canvas: &Canvas, arrow: &Arrow) {
    line(
        content,
        canvas.to_px(arrow.start),
        canvas.to_px(arrow.shaft_end()),
        pt_to_px(arrow.width),
        arrow.colour,
        None,
    );

    let head = arrow.head_polygon();
    set_fill(content, arrow.colour);
    for (i, point) in head.iter().enumerate() {
        let (x, y) = canvas.to_px(*point);
        if i == 0 {
            content.move_to(x as f32, y as f32);
        } else {
            content.line_to(x as f32, y as f32);
        }
    }
    content.close_path();
    content.fill_nonzero();
}

fn draw_text_element(content: &mut Content, canvas: &Canvas, text: &Text) {
    let (x, y) = canvas.to_px(text.anchor);
    show_text(content, x, y, &text.text, pt_to_px(text.size), text.colour);
}

fn draw_x_axis(content: &mut Content, canvas: &Canvas, scene: &Scene) {
    let font_px = pt_to_px(LABEL_FONT_PT);
    let base = canvas.plot.bottom;

    for &tick in &scene.x_ticks {
        let x = canvas.x_to_px(tick);
        line(content, (x, base), (x, base + TICK_LENGTH), 1.0, AXIS_COLOUR, None);

        let label = format_tick(tick);
        let label_width = label.len() as f64 * HELVETICA_DIGIT_WIDTH * font_px;
        let baseline = base + TICK_LENGTH + 4.0 + HELVETICA_CAP_HEIGHT * font_px;
        show_text(
            content,
            x - label_width / 2.0,
            baseline,
            &label,
            font_px,
            AXIS_COLOUR,
        );
    }
}

fn draw_legend(content: &mut Content, canvas: &Canvas, scene: &Scene) {
    let font_px = pt_to_px(LABEL_FONT_PT);
    let radius = marker_radius(scene.scatters().next().map_or(10.0, |s| s.size)) as f32;
    let (x0, y0) = canvas.legend_origin();

    for (i, entry) in scene.legend.iter().enumerate() {
        let cy = y0 + LEGEND_ROW * (i as f64 + 0.5);
        set_fill(content, entry.colour);
        circle(
            content,
            (x0 + LEGEND_MARKER_SPACE / 2.0) as f32,
            cy as f32,
            radius,
        );
        content.fill_nonzero();

        let baseline = cy + HELVETICA_CAP_HEIGHT * font_px / 2.0;
        show_text(
            content,
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
    use crate::timeline::{draw_timeline, Style, TimelineRequest, Tracks};

    fn options() -> RenderOptions {
        RenderOptions {
            width: 600,
            height: 140,
            margin: 30,
            background: Colour::from_rgb(255, 255, 255),
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_single_track_document() {
        let request = TimelineRequest::new(
            Tracks::Single(vec![25, 30, 37, 357]),
            parse_date_str("20170101").unwrap(),
        );
        let scene = draw_timeline(&request, &Style::default()).unwrap();
        let bytes = render_pdf(&scene, &options());

        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"/Helvetica"));
        assert!(contains(&bytes, b"(FEB) Tj"));
        assert!(contains(&bytes, b"(DEC) Tj"));
        assert!(!contains(&bytes, b"(JAN) Tj"));
        // 600 x 140 px at 100 dpi
        assert!(contains(&bytes, b"/MediaBox [0 0 432 "));
    }

    #[test]
    fn test_multi_track_legend_and_dashes() {
        let request = TimelineRequest::new(
            Tracks::Multiple(vec![vec![10, 50], vec![20, 90]]),
            parse_date_str("20170101").unwrap(),
        )
        .with_names(vec!["S2A".to_string(), "S2B".to_string()])
        .with_interp(vec![30]);
        let scene = draw_timeline(&request, &Style::default()).unwrap();
        let bytes = render_pdf(&scene, &options());

        assert!(contains(&bytes, b"(S2A) Tj"));
        assert!(contains(&bytes, b"(S2B) Tj"));
        assert!(contains(&bytes, b"] 0 d"));
    }

    #[test]
    fn test_encode_text_keeps_ascii() {
        assert_eq!(encode_text("T31TCJ"), b"T31TCJ".to_vec());
        assert_eq!(encode_text("Zürich"), b"Z?rich".to_vec());
    }
}
