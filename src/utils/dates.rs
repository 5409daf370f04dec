use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static KANJI_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})年(\d{1,2})月(\d{1,2})日$").unwrap());

static ERA_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(令和|平成|昭和)(元|\d{1,2})年(\d{1,2})月(\d{1,2})日$").unwrap());

/// Gregorian year preceding year 1 of each era.
fn era_base(era: &str) -> Option<i32> {
    match era {
        "令和" => Some(2018),
        "平成" => Some(1988),
        "昭和" => Some(1925),
        _ => None,
    }
}

/// Parse the date notations used in TDNET documents: ISO `2023-05-12`,
/// `2023年5月12日`, and era dates such as `令和5年5月12日`.
/// Full-width digits are accepted.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let text: String = raw.nfkc().filter(|c| !c.is_whitespace()).collect();
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        return Some(date);
    }

    if let Some(caps) = KANJI_DATE.captures(&text) {
        return ymd(caps[1].parse().ok()?, &caps[2], &caps[3]);
    }

    if let Some(caps) = ERA_DATE.captures(&text) {
        let base = era_base(&caps[1])?;
        let year: i32 = match &caps[2] {
            "元" => 1,
            n => n.parse().ok()?,
        };
        return ymd(base + year, &caps[3], &caps[4]);
    }

    None
}

fn ymd(year: i32, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}
