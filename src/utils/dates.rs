//! Archive coverage window, `YYYY[/MM]` parsing and quarter arithmetic.

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::error::DateError;

/// First month with an XBRL index feed.
pub const XML_START_YEAR: i32 = 2005;
pub const XML_START_MONTH: u32 = 4;

/// Parse `2021`, `2021/6` or `2021/06` into (year, month); month 0 means
/// the whole year.
pub fn parse_year_month(s: &str) -> Result<(i32, u32), DateError> {
    let s = s.trim();
    let (year, month) = match s.split_once('/') {
        None if s.len() == 4 => (s, None),
        Some((y, m)) if y.len() == 4 && (m.len() == 1 || m.len() == 2) => (y, Some(m)),
        _ => return Err(DateError::Invalid),
    };

    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateError::Invalid);
    }
    let year: i32 = year.parse().map_err(|_| DateError::Invalid)?;

    let month = match month {
        None => 0,
        Some(m) => {
            if !m.bytes().all(|b| b.is_ascii_digit()) {
                return Err(DateError::Invalid);
            }
            let m: u32 = m.parse().map_err(|_| DateError::Invalid)?;
            if !(1..=12).contains(&m) {
                return Err(DateError::Invalid);
            }
            m
        }
    };

    Ok((year, month))
}

/// Where a requested (year, month) falls relative to the coverage window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    TooEarly,
    TooLate,
}

/// Classify a request and log the boundary when it falls outside.
/// `month == 0` asks about the year as a whole.
pub fn check_availability(year: i32, month: u32, today: NaiveDate) -> Availability {
    let too_early = year < XML_START_YEAR
        || (year == XML_START_YEAR && month > 0 && month < XML_START_MONTH);
    if too_early {
        info!(
            "the earliest available XML is {}/{}",
            XML_START_YEAR, XML_START_MONTH
        );
        return Availability::TooEarly;
    }

    let too_late = year > today.year()
        || month > 12
        || (year == today.year() && month > today.month());
    if too_late {
        info!(
            "the latest available XML is {}/{}",
            today.year(),
            today.month()
        );
        return Availability::TooLate;
    }

    Availability::Available
}

/// Whether the archive has an index feed for this month.
pub fn is_month_available(year: i32, month: u32, today: NaiveDate) -> bool {
    if !(1..=12).contains(&month) {
        return false;
    }
    if year < XML_START_YEAR || (year == XML_START_YEAR && month < XML_START_MONTH) {
        return false;
    }
    if year > today.year() || (year == today.year() && month > today.month()) {
        return false;
    }
    true
}

/// Months of `year` inside the coverage window.
pub fn available_months(year: i32, today: NaiveDate) -> Vec<u32> {
    (1..=12)
        .filter(|&m| is_month_available(year, m, today))
        .collect()
}

/// 1-3 → 1, 4-6 → 2, 7-9 → 3, 10-12 → 4, anything else → 0.
pub fn quarter_from_month(month: u32) -> u32 {
    match month {
        1..=3 => 1,
        4..=6 => 2,
        7..=9 => 3,
        10..=12 => 4,
        _ => 0,
    }
}

/// A quarter's dataset is published only after the quarter closes.
pub fn is_quarter_complete(year: i32, quarter: u32, today: NaiveDate) -> bool {
    if !(1..=4).contains(&quarter) || year > today.year() {
        return false;
    }
    if year < today.year() {
        return true;
    }
    today.month() > quarter * 3
}

/// `2021q3` style key used in bulk dataset file names.
pub fn year_quarter(year: i32, quarter: u32) -> String {
    format!("{}q{}", year, quarter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(parse_year_month("2021"), Ok((2021, 0)));
        assert_eq!(parse_year_month("2021/6"), Ok((2021, 6)));
        assert_eq!(parse_year_month("2021/06"), Ok((2021, 6)));
        assert_eq!(parse_year_month("2021/12"), Ok((2021, 12)));
    }

    #[test]
    fn test_parse_year_month_rejects_garbage() {
        for input in ["21", "2021/", "2021/123", "2021-06", "abcd", "2021/ab", "2021/13", "2021/0", ""] {
            assert_eq!(parse_year_month(input), Err(DateError::Invalid), "{input}");
        }
        assert_eq!(
            DateError::Invalid.to_string(),
            "please enter a valid date ('2021' or '2021/05')"
        );
    }

    #[test]
    fn test_availability_window() {
        let today = day(2024, 8, 15);
        assert_eq!(check_availability(2004, 0, today), Availability::TooEarly);
        assert_eq!(check_availability(2005, 3, today), Availability::TooEarly);
        assert_eq!(check_availability(2005, 4, today), Availability::Available);
        assert_eq!(check_availability(2005, 0, today), Availability::Available);
        assert_eq!(check_availability(2024, 8, today), Availability::Available);
        assert_eq!(check_availability(2024, 9, today), Availability::TooLate);
        assert_eq!(check_availability(2025, 0, today), Availability::TooLate);
    }

    #[test]
    fn test_available_months_clamps_to_window() {
        let today = day(2024, 8, 15);
        assert_eq!(available_months(2005, today), (4..=12).collect::<Vec<_>>());
        assert_eq!(available_months(2024, today), (1..=8).collect::<Vec<_>>());
        assert_eq!(available_months(2010, today).len(), 12);
        assert!(available_months(2003, today).is_empty());
        assert!(available_months(2025, today).is_empty());
    }

    #[test]
    fn test_quarter_from_month() {
        let quarters: Vec<u32> = (0..=13).map(quarter_from_month).collect();
        assert_eq!(quarters, vec![0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 0]);
    }

    #[test]
    fn test_quarter_gating() {
        let today = day(2024, 8, 15);
        assert!(is_quarter_complete(2023, 4, today));
        assert!(is_quarter_complete(2024, 1, today));
        assert!(is_quarter_complete(2024, 2, today));
        assert!(!is_quarter_complete(2024, 3, today));
        assert!(!is_quarter_complete(2024, 4, today));
        assert!(!is_quarter_complete(2025, 1, today));
        assert!(!is_quarter_complete(2023, 0, today));

        // Q2 closes at the end of June.
        assert!(!is_quarter_complete(2024, 2, day(2024, 6, 30)));
        assert!(is_quarter_complete(2024, 2, day(2024, 7, 1)));
    }

    #[test]
    fn test_year_quarter() {
        assert_eq!(year_quarter(2021, 3), "2021q3");
    }
}
