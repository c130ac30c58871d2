//! Release date parsing and ordering

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

use super::Release;

const DATE_PATTERN: &str = r"(\d+)[-/](\d+)[-/](\d+)";

static DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DATE_PATTERN).expect("release date pattern compiles"));

/// Parse the first `M/D/Y` (or `M-D-Y`) date found in `text`.
///
/// Two-digit years are read as 20xx. Text with no date, or a date that does not
/// exist on the calendar, is a freeform release date and yields `None`.
pub fn parse_release_date(text: &str) -> Option<NaiveDate> {
    let captures = DATE_REGEX.captures(text)?;
    let month: u32 = captures[1].parse().ok()?;
    let day: u32 = captures[2].parse().ok()?;
    let mut year: i32 = captures[3].parse().ok()?;

    if year < 100 {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// `Q<quarter><year>`, e.g. `Q32025`, as `(year, quarter)`
pub fn parse_quarter(text: &str) -> Option<(u32, u32)> {
    let digits = text.strip_prefix('Q')?;
    if digits.len() != 5 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let quarter = digits[..1].parse().ok()?;
    let year = digits[1..].parse().ok()?;
    Some((year, quarter))
}

/// Release list ordering.
///
/// Dated releases come first by date, then quarter releases by year, quarter and
/// name, then everything else by name.
pub fn compare_releases(a: &Release, b: &Release) -> Ordering {
    match (a.parsed_date, b.parsed_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => match (
            parse_quarter(&a.release_date),
            parse_quarter(&b.release_date),
        ) {
            (Some(qa), Some(qb)) => (qa, &a.name).cmp(&(qb, &b.name)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        },
    }
}

/// Stable sort of a channel's releases
pub fn sort_releases(releases: &mut [Release]) {
    releases.sort_by(compare_releases);
}
