use std::ops::Index;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

fn to_int<T: std::str::FromStr>(num_str: &str, date_str: &str) -> Result<T, String> {
    match num_str.parse::<T>() {
        Ok(x) => Ok(x),
        Err(_) => Err(format!("Error parsing {} from the date {}", num_str, date_str)),
    }
}

/// Parses a publishedAt value. The time component is optional: a bare
/// date is completed to midnight, which is what the site has always done
/// for front matter written without a time.
pub fn parse_published_at(buf: &str) -> Result<NaiveDateTime, String> {
    lazy_static! {
        static ref DATE_REGEX: Regex = Regex::new(
            r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{1,2})(?::(\d{1,2})(?:\.\d{1,3})?)?)?$"
        ).unwrap();
    }

    let buf = buf.trim();
    let Some(caps) = DATE_REGEX.captures(buf) else {
        return Err(format!("Unable to parse date {}", buf));
    };

    let to_i32 = |num_str: &str| to_int::<i32>(num_str, buf);
    let to_u32 = |num_str: &str| to_int::<u32>(num_str, buf);

    let y: i32 = to_i32(caps.index(1))?;
    let m: u32 = to_u32(caps.index(2))?;
    let d: u32 = to_u32(caps.index(3))?;

    let (h, mn, s) = match caps.get(4) {
        None => (0, 0, 0),
        Some(hour) => {
            let h: u32 = to_u32(hour.as_str())?;
            let mn: u32 = to_u32(caps.index(5))?;
            let s: u32 = match caps.get(6) {
                None => 0,
                Some(sec) => to_u32(sec.as_str())?,
            };
            (h, mn, s)
        }
    };

    let date = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or(format!("Date {} is out of range", buf))?;
    let time = NaiveTime::from_hms_opt(h, mn, s)
        .ok_or(format!("Time in {} is out of range", buf))?;

    Ok(NaiveDateTime::new(date, time))
}

/// Formats a publishedAt value for display: the full date followed by a
/// coarse age, e.g. "January 5, 2024 (3mo ago)".
///
/// The age is the difference of the calendar components, checked in
/// year/month/day order. January 31 reads as "1mo ago" on February 1 even
/// though a single day has passed; the site has always displayed it this
/// way.
///
/// `today` is the reference date, passed in by the caller so the same
/// post formats the same way for the whole of one request.
pub fn format_published_at(date_str: &str, today: NaiveDate) -> Result<String, String> {
    let target = parse_published_at(date_str)?.date();

    let years_ago = today.year() - target.year();
    let months_ago = today.month() as i32 - target.month() as i32;
    let days_ago = today.day() as i32 - target.day() as i32;

    let age = if years_ago > 0 {
        format!("{}y ago", years_ago)
    } else if months_ago > 0 {
        format!("{}mo ago", months_ago)
    } else if days_ago > 0 {
        format!("{}d ago", days_ago)
    } else {
        "Today".to_string()
    };

    let full_date = target.format("%B %-d, %Y").to_string();

    Ok(format!("{} ({})", full_date, age))
}
