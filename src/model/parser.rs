// File: src/model/parser.rs
use crate::error::{DateError, LineError};
use crate::model::item::{RawEvent, TermEvent};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<day>[0-9]{1,2})(?i:st|nd|rd|th)?\s+(?P<month>[A-Za-z]+)\s+(?P<year>[0-9]{4})",
    )
    .expect("date token pattern is valid")
});

static BARE_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([0-9]{1,2})(?i:st|nd|rd|th)?\b").expect("day pattern is valid"));

const RANGE_SEPARATORS: [char; 2] = ['-', '–'];

/// One `<day><suffix> <month> <year>` match inside a line.
///
/// Only the shape has been checked; `date()` does the calendar validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateToken {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub day: u32,
    pub month_name: String,
    pub year: i32,
}

impl DateToken {
    pub fn date(&self) -> Result<NaiveDate, DateError> {
        let month = month_from_name(&self.month_name).ok_or_else(|| DateError::UnknownMonth {
            month: self.month_name.clone(),
            text: self.text.clone(),
        })?;
        NaiveDate::from_ymd_opt(self.year, month, self.day).ok_or_else(|| {
            DateError::InvalidDate {
                text: self.text.clone(),
            }
        })
    }
}

pub fn month_from_name(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|idx| idx as u32 + 1)
}

fn mentions_month(text: &str) -> bool {
    let lower = text.to_lowercase();
    MONTH_NAMES.iter().any(|m| lower.contains(m))
}

pub fn find_date_tokens(line: &str) -> Vec<DateToken> {
    DATE_RE
        .captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(DateToken {
                start: whole.start(),
                end: whole.end(),
                text: whole.as_str().to_string(),
                // At most two digits and four digits; these always fit.
                day: caps["day"].parse().ok()?,
                month_name: caps["month"].to_string(),
                year: caps["year"].parse().ok()?,
            })
        })
        .collect()
}

/// Parses the first date token found in `text`.
///
/// `Ok(None)` means there is no date-shaped text at all, which is not an error.
pub fn parse_date(text: &str) -> Result<Option<NaiveDate>, DateError> {
    match find_date_tokens(text).first() {
        Some(token) => token.date().map(Some),
        None => Ok(None),
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Renders a date the way the term-date page writes them, e.g. "17th February 2025".
pub fn format_date_token(date: NaiveDate) -> String {
    let month = date.format("%B");
    format!(
        "{}{} {} {:04}",
        date.day(),
        ordinal_suffix(date.day()),
        month,
        date.year()
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape {
    NoDate,
    /// One date, one day.
    SingleDate,
    /// One full date preceded by a bare day: "3rd - 5th January 2024".
    DayRange { start_day: u32 },
    /// Two full dates joined by " & ", each its own day.
    DateList,
    /// Two or more full dates spanning first..last.
    DateRange,
}

/// The bare day left of a range separator, when the text before `token` has one.
///
/// The part left of the first separator must not name a month, otherwise the
/// line is a "<full date> - <full date>" shape the caller handles elsewhere.
fn bare_start_day(line: &str, token: &DateToken) -> Option<u32> {
    let before = &line[..token.start];
    if !before.contains(RANGE_SEPARATORS) {
        return None;
    }
    let left = before.split(RANGE_SEPARATORS).next().unwrap_or_default();
    if mentions_month(left) {
        return None;
    }
    let caps = BARE_DAY_RE.captures(left)?;
    caps[1].parse().ok()
}

pub fn classify_line(line: &str, tokens: &[DateToken]) -> LineShape {
    match tokens {
        [] => LineShape::NoDate,
        [only] => match bare_start_day(line, only) {
            Some(start_day) => LineShape::DayRange { start_day },
            None => LineShape::SingleDate,
        },
        [_, _] if line.contains(" & ") => LineShape::DateList,
        _ => LineShape::DateRange,
    }
}

pub fn clean_label(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || RANGE_SEPARATORS.contains(&c))
}

/// Text after the last date; falls back to the text before the first date
/// when nothing follows ("Half Term Begins 17th February 2025").
fn line_label(line: &str, tokens: &[DateToken], shape: LineShape) -> String {
    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return String::new();
    };
    let trailing = clean_label(&line[last.end..]);
    if !trailing.is_empty() || matches!(shape, LineShape::DayRange { .. }) {
        return trailing.to_string();
    }
    strip_weekday(clean_label(&line[..first.start])).to_string()
}

/// Drops a weekday name directly in front of the date ("... Monday").
fn strip_weekday(text: &str) -> &str {
    let (rest, last) = text.rsplit_once(char::is_whitespace).unwrap_or(("", text));
    if WEEKDAY_NAMES.iter().any(|d| d.eq_ignore_ascii_case(last)) {
        clean_label(rest)
    } else {
        text
    }
}

fn resolve(line: &str, token: &DateToken) -> Result<NaiveDate, LineError> {
    token.date().map_err(|source| LineError::Date {
        line: line.to_string(),
        source,
    })
}

fn span(line: &str, start: NaiveDate, end: NaiveDate, label: &str) -> Result<RawEvent, LineError> {
    let event = TermEvent::scraped(start, end, label).ok_or_else(|| LineError::InvertedRange {
        line: line.to_string(),
        start,
        end,
    })?;
    Ok(RawEvent {
        event,
        line: line.to_string(),
    })
}

/// Turns one line of the term-date page into zero or more raw events.
///
/// A single bad date anywhere in the chosen shape rejects the whole line.
pub fn parse_event_line(line: &str) -> Result<Vec<RawEvent>, LineError> {
    let tokens = find_date_tokens(line);
    let shape = classify_line(line, &tokens);
    let label = line_label(line, &tokens, shape);

    match shape {
        LineShape::NoDate => Ok(Vec::new()),
        LineShape::SingleDate => {
            let date = resolve(line, &tokens[0])?;
            Ok(vec![span(line, date, date, &label)?])
        }
        LineShape::DayRange { start_day } => {
            let end = resolve(line, &tokens[0])?;
            let start = NaiveDate::from_ymd_opt(end.year(), end.month(), start_day).ok_or_else(
                || LineError::InvalidStartDay {
                    line: line.to_string(),
                    day: start_day,
                },
            )?;
            Ok(vec![span(line, start, end, &label)?])
        }
        LineShape::DateList => tokens
            .iter()
            .map(|token| {
                let date = resolve(line, token)?;
                span(line, date, date, &label)
            })
            .collect(),
        LineShape::DateRange => {
            if tokens.len() > 2 {
                log::warn!(
                    "{} dates in one line, using the first and last as a range: {}",
                    tokens.len(),
                    line
                );
            }
            let dates = tokens
                .iter()
                .map(|token| resolve(line, token))
                .collect::<Result<Vec<_>, _>>()?;
            let (Some(&start), Some(&end)) = (dates.first(), dates.last()) else {
                return Ok(Vec::new());
            };
            Ok(vec![span(line, start, end, &label)?])
        }
    }
}
