//! Axis limits and tick placement.

/// Relative padding added on each side of autoscaled limits
const AUTOSCALE_MARGIN: f64 = 0.05;

/// Axis limits around `[lo, hi]` with a 5% margin on each side.
///
/// A degenerate range is first widened by 5% of its value (or 0.05 at zero).
pub fn autoscale(lo: f64, hi: f64) -> (f64, f64) {
    let (lo, hi) = if hi - lo == 0.0 {
        let delta = if lo == 0.0 {
            AUTOSCALE_MARGIN
        } else {
            AUTOSCALE_MARGIN * lo.abs()
        };
        (lo - delta, hi + delta)
    } else {
        (lo.min(hi), lo.max(hi))
    };

    let margin = AUTOSCALE_MARGIN * (hi - lo);
    (lo - margin, hi + margin)
}

/// Evenly spaced "round" tick values inside `[lo, hi]`
pub fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    if !(hi > lo) || target == 0 {
        return Vec::new();
    }

    let raw = (hi - lo) / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = match raw / magnitude {
        n if n <= 1.0 => 1.0,
        n if n <= 2.0 => 2.0,
        n if n <= 5.0 => 5.0,
        _ => 10.0,
    } * magnitude;

    let mut ticks = Vec::new();
    let mut k = (lo / step).ceil();
    while k * step <= hi + step * 1e-9 {
        ticks.push(k * step);
        k += 1.0;
    }
    ticks
}

/// Render a tick value without a trailing `.0` for whole numbers
pub fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_autoscale_range() {
        let (lo, hi) = autoscale(0.0, 100.0);
        assert!(approx(lo, -5.0));
        assert!(approx(hi, 105.0));
    }

    #[test]
    fn test_autoscale_degenerate() {
        let (lo, hi) = autoscale(0.0, 0.0);
        assert!(approx(lo, -0.055));
        assert!(approx(hi, 0.055));

        let (lo, hi) = autoscale(100.0, 100.0);
        assert!(approx(lo, 94.5));
        assert!(approx(hi, 105.5));
    }

    #[test]
    fn test_nice_ticks() {
        assert_eq!(nice_ticks(0.0, 100.0, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
        assert_eq!(nice_ticks(-12.0, 370.0, 6), vec![0.0, 100.0, 200.0, 300.0]);
        assert!(nice_ticks(5.0, 5.0, 6).is_empty());
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(100.0), "100");
        assert_eq!(format_tick(-20.0), "-20");
        assert_eq!(format_tick(2.5), "2.50");
    }
}
