//! Date-to-offset conversion.
//!
//! Dates are fixed 8-character `YYYYMMDD` strings. A date's "doy" is its day
//! offset from a reference start date, with the start date itself being 1.

use chrono::{Datelike, Months, NaiveDate};
use std::path::Path;
use tracing::debug;

use crate::error::{DoylineError, Result};

/// Reference start date used when none is configured
pub const DEFAULT_START_DATE: &str = "20170101";

/// Month labels, January first
pub const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Doy at which the first month's label is placed
const FIRST_MONTH_LABEL_DOY: i64 = 4;

/// One calendar month on the timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthMark {
    /// Three-letter month name
    pub name: &'static str,
    /// Where the month label is anchored
    pub label_doy: i64,
    /// Doy of the last day of the month
    pub boundary_doy: i64,
}

/// Convert a `YYYYMMDD` string into a date
pub fn parse_date_str(input: &str) -> Result<NaiveDate> {
    let s = input.trim();

    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DoylineError::InvalidDate {
            input: input.to_string(),
            message: "expected 8 digits in the form YYYYMMDD".to_string(),
        });
    }

    // All ASCII digits, so the slices and integer parses cannot fail
    let year: i32 = s[0..4].parse().unwrap_or_default();
    let month: u32 = s[4..6].parse().unwrap_or_default();
    let day: u32 = s[6..8].parse().unwrap_or_default();

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DoylineError::InvalidDate {
        input: input.to_string(),
        message: format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day),
    })
}

/// Day offset of `date` relative to `start`, where `start` is day 1
pub fn doy_of(date: NaiveDate, start: NaiveDate) -> i64 {
    date.signed_duration_since(start).num_days() + 1
}

/// Return the doy of `cur_date` using `start_date` as the reference
pub fn doa2doy(cur_date: &str, start_date: &str) -> Result<i64> {
    let start = parse_date_str(start_date)?;
    let cur = parse_date_str(cur_date)?;
    Ok(doy_of(cur, start))
}

/// Parse the lines of a date file into doys.
///
/// Lines are trimmed and blank lines skipped. Order is preserved.
pub fn parse_datefile_contents(content: &str, start: NaiveDate) -> Result<Vec<i64>> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| parse_date_str(line).map(|date| doy_of(date, start)))
        .collect()
}

/// Read a date file (one `YYYYMMDD` date per line) and return its doys.
///
/// ```text
/// 20170125        25
/// 20170130   ->   30
/// 20171223        357
/// ```
pub fn read_datefile(path: &Path, start_date: &str) -> Result<Vec<i64>> {
    let start = parse_date_str(start_date)?;
    let content = std::fs::read_to_string(path)?;
    let doys = parse_datefile_contents(&content, start)?;

    debug!(
        file_path = %path.display(),
        date_count = doys.len(),
        start_date = start_date,
        "Parsed date file"
    );

    Ok(doys)
}

/// Number of days in each month of `year`
pub fn month_lengths(year: i32) -> [u32; 12] {
    let mut lengths = [0; 12];
    for (idx, len) in lengths.iter_mut().enumerate() {
        *len = days_in_month(year, idx as u32 + 1);
    }
    lengths
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
        _ => 0,
    }
}

/// Month marks from the month containing `start` until labels pass `max_doy`.
///
/// The first month is always emitted so that a timeline has at least one mark.
pub fn month_marks(start: NaiveDate, max_doy: i64) -> Vec<MonthMark> {
    let mut marks = Vec::new();
    let Some(mut first_of_month) = start.with_day(1) else {
        return marks;
    };

    loop {
        let Some(next_month) = first_of_month.checked_add_months(Months::new(1)) else {
            break;
        };
        let label_doy = if marks.is_empty() {
            FIRST_MONTH_LABEL_DOY
        } else {
            doy_of(first_of_month, start) - 1
        };
        if !marks.is_empty() && label_doy > max_doy {
            break;
        }

        marks.push(MonthMark {
            name: MONTH_NAMES[first_of_month.month0() as usize],
            label_doy,
            boundary_doy: doy_of(next_month, start) - 1,
        });
        first_of_month = next_month;
    }

    marks
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        parse_date_str(s).unwrap()
    }

    #[test]
    fn test_parse_date_str() {
        assert_eq!(date("20170125"), NaiveDate::from_ymd_opt(2017, 1, 25).unwrap());
        assert_eq!(date(" 20171223\n"), NaiveDate::from_ymd_opt(2017, 12, 23).unwrap());

        assert!(parse_date_str("2017012").is_err());
        assert!(parse_date_str("201701255").is_err());
        assert!(parse_date_str("2017-1-25").is_err());
        assert!(parse_date_str("20170230").is_err());
        assert!(parse_date_str("20171301").is_err());
        assert!(parse_date_str("").is_err());
    }

    #[test]
    fn test_doa2doy() {
        assert_eq!(doa2doy("20170101", DEFAULT_START_DATE).unwrap(), 1);
        assert_eq!(doa2doy("20170125", DEFAULT_START_DATE).unwrap(), 25);
        assert_eq!(doa2doy("20170206", DEFAULT_START_DATE).unwrap(), 37);
        assert_eq!(doa2doy("20171223", DEFAULT_START_DATE).unwrap(), 357);
        assert_eq!(doa2doy("20180101", DEFAULT_START_DATE).unwrap(), 366);
    }

    #[test]
    fn test_doa2doy_before_start() {
        assert_eq!(doa2doy("20161231", DEFAULT_START_DATE).unwrap(), 0);
        assert_eq!(doa2doy("20161230", DEFAULT_START_DATE).unwrap(), -1);
    }

    #[test]
    fn test_doa2doy_leap_year() {
        assert_eq!(doa2doy("20160301", "20160101").unwrap(), 61);
        assert_eq!(doa2doy("20170301", "20170101").unwrap(), 60);
    }

    #[test]
    fn test_parse_datefile_contents() {
        let content = "20170125\n20170130\n\n  20170206  \n20171223\n";
        let doys = parse_datefile_contents(content, date(DEFAULT_START_DATE)).unwrap();
        assert_eq!(doys, vec![25, 30, 37, 357]);
    }

    #[test]
    fn test_parse_datefile_contents_uses_start() {
        let doys = parse_datefile_contents("20170125\n", date("20170120")).unwrap();
        assert_eq!(doys, vec![6]);
    }

    #[test]
    fn test_parse_datefile_contents_bad_line() {
        let err = parse_datefile_contents("20170125\nnot-a-date\n", date(DEFAULT_START_DATE))
            .unwrap_err();
        assert!(matches!(err, DoylineError::InvalidDate { .. }));
    }

    #[test]
    fn test_month_lengths() {
        assert_eq!(
            month_lengths(2017),
            [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
        );
        assert_eq!(month_lengths(2016)[1], 29);
        assert_eq!(month_lengths(2016).iter().sum::<u32>(), 366);
    }

    #[test]
    fn test_month_marks_calendar_year() {
        let marks = month_marks(date("20170101"), 357);
        assert_eq!(marks.len(), 12);

        // Labels sit at the cumulative month-length sums, boundaries one month later
        let mut cumsum = 0i64;
        for (idx, (mark, len)) in marks.iter().zip(month_lengths(2017)).enumerate() {
            assert_eq!(mark.name, MONTH_NAMES[idx]);
            if idx == 0 {
                assert_eq!(mark.label_doy, 4);
            } else {
                assert_eq!(mark.label_doy, cumsum);
            }
            cumsum += len as i64;
            assert_eq!(mark.boundary_doy, cumsum);
        }
    }

    #[test]
    fn test_month_marks_short_range() {
        let marks = month_marks(date("20170101"), 40);
        let names: Vec<_> = marks.iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["JAN", "FEB"]);
        assert_eq!(marks[1].label_doy, 31);
        assert_eq!(marks[1].boundary_doy, 59);
    }

    #[test]
    fn test_month_marks_mid_year_start() {
        let marks = month_marks(date("20170715"), 60);
        assert_eq!(marks[0].name, "JUL");
        assert_eq!(marks[0].boundary_doy, 17);
        assert_eq!(marks[1].name, "AUG");
        assert_eq!(marks[1].label_doy, 17);
    }

    #[test]
    fn test_month_marks_span_years() {
        let marks = month_marks(date("20171101"), 100);
        let names: Vec<_> = marks.iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["NOV", "DEC", "JAN", "FEB"]);
    }
}
