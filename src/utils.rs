use crate::error::{LedgerError, Result};
use chrono::{
    DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, TimeZone, Utc,
};

const MONTH_NAMES_FR: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

const SHORT_MONTH_NAMES_FR: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

pub fn first_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        LedgerError::DateError(format!("No calendar month {:04}-{:02}", year, month))
    })
}

/// Last calendar day of the month: day zero of the following month.
pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    first_day_of_month(year, month)?
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| {
            LedgerError::DateError(format!(
                "Cannot compute end of month {:04}-{:02}",
                year, month
            ))
        })
}

/// First day of the calendar month preceding the month of `date`.
pub fn first_day_of_previous_month(date: NaiveDate) -> Result<NaiveDate> {
    first_day_of_month(date.year(), date.month())?
        .checked_sub_months(Months::new(1))
        .ok_or_else(|| LedgerError::DateError(format!("No month before {}", date)))
}

pub fn start_of_day(date: NaiveDate) -> Result<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
        .ok_or_else(|| LedgerError::DateError(format!("Invalid start of day for {}", date)))
}

pub fn end_of_day(date: NaiveDate) -> Result<NaiveDateTime> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .ok_or_else(|| LedgerError::DateError(format!("Invalid end of day for {}", date)))
}

/// Anchors a wall-clock time in `tz` and returns the matching instant.
///
/// Ambiguous times (clocks going back) resolve to the earliest instant.
/// Times skipped by a clock change resolve to the first valid minute after them.
pub fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let mut candidate = naive;
            for _ in 0..(24 * 60) {
                candidate += Duration::minutes(1);
                if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
                    return dt.with_timezone(&Utc);
                }
            }
            tz.from_utc_datetime(&naive).with_timezone(&Utc)
        }
    }
}

/// Local calendar date of an instant.
pub fn local_date<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

pub fn day_label(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", MONTH_NAMES_FR[date.month0() as usize], date.year())
}

pub fn short_month_label(date: NaiveDate) -> String {
    SHORT_MONTH_NAMES_FR[date.month0() as usize].to_string()
}

pub fn year_label(date: NaiveDate) -> String {
    date.year().to_string()
}

/// Rounds half up, so `0.5 -> 1` and `-0.5 -> 0`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Parses a typed amount the forgiving way a form field does.
///
/// Reads the longest numeric prefix (`,` accepted as decimal separator) and
/// ignores whatever follows, so `"12,50 €"` gives `12.5`. Empty or
/// unparseable input gives `0.0`.
pub fn parse_amount(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_separator = false;

    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '+' | '-' if idx == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' | ',' if !seen_separator => seen_separator = true,
            _ => break,
        }
        end = idx + ch.len_utf8();
    }

    if !seen_digit {
        return 0.0;
    }

    trimmed[..end]
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
