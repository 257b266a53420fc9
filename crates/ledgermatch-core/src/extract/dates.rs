//! Date extraction and ISO normalization.

use chrono::NaiveDate;

use super::patterns::{DATE_ISO, DATE_LONG, DATE_MDY, LABELED_DATE};

/// Parse a single date token in any supported format (ISO `YYYY-MM-DD`,
/// US `MM/DD/YYYY`, or `Month DD, YYYY`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    extract_all_dates(s).into_iter().next()
}

/// All normalizable dates in the text, in source order, duplicates removed.
pub fn extract_all_dates(text: &str) -> Vec<NaiveDate> {
    let mut found: Vec<(usize, NaiveDate)> = Vec::new();

    for caps in DATE_ISO.captures_iter(text) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let day: u32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            found.push((caps.get(0).unwrap().start(), date));
        }
    }

    for caps in DATE_MDY.captures_iter(text) {
        let first: u32 = caps[1].parse().unwrap_or(0);
        let second: u32 = caps[2].parse().unwrap_or(0);
        let year = parse_year(&caps[3]);

        // Month-first by default; retry day-first only when the month
        // field is out of range.
        let date = NaiveDate::from_ymd_opt(year, first, second)
            .or_else(|| NaiveDate::from_ymd_opt(year, second, first));
        if let Some(date) = date {
            found.push((caps.get(0).unwrap().start(), date));
        }
    }

    for caps in DATE_LONG.captures_iter(text) {
        let month = month_name_to_number(&caps[1]);
        let day: u32 = caps[2].parse().unwrap_or(0);
        let year: i32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            found.push((caps.get(0).unwrap().start(), date));
        }
    }

    found.sort_by_key(|(pos, _)| *pos);

    let mut out = Vec::new();
    for (_, date) in found {
        if !out.contains(&date) {
            out.push(date);
        }
    }
    out
}

/// Most recent normalizable date in the text.
///
/// Fallback policy for the transaction date when no labeled date is found:
/// receipts often print several dates (order, ship, delivery), and the most
/// recent one is taken.
pub fn most_recent_date(text: &str) -> Option<NaiveDate> {
    extract_all_dates(text).into_iter().max()
}

/// First labeled transaction date (e.g. "Order Date: 11/23/2025").
pub fn labeled_date(text: &str) -> Option<NaiveDate> {
    LABELED_DATE
        .captures_iter(text)
        .find_map(|caps| parse_date(&caps[1]))
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

fn month_name_to_number(name: &str) -> u32 {
    match name.to_lowercase().as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => 0,
    }
}
