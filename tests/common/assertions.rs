//! Assertion utilities for testing.

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that an SVG document contains `count` occurrences of `<tag`
pub fn assert_svg_element_count(svg: &str, tag: &str, count: usize) {
    let actual = svg.matches(&format!("<{}", tag)).count();
    assert_eq!(
        actual, count,
        "Expected {} <{}> element(s), found {}",
        count, tag, actual
    );
}

/// Text content of every `<text>` element, in document order
pub fn svg_texts(svg: &str) -> Vec<String> {
    svg.lines()
        .filter_map(|line| {
            let line = line.trim();
            if !line.starts_with("<text") {
                return None;
            }
            let start = line.find('>')? + 1;
            let end = line.rfind("</text>")?;
            Some(line[start..end].to_string())
        })
        .collect()
}
