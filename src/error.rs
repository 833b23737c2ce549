// File: ./src/error.rs
//! Error kinds the pipeline reports.
//!
//! `DateError` and `LineError` are recoverable: the offending line is dropped
//! and parsing goes on. `ScrapeError` is fatal for the run and is what the
//! binary turns into a user-facing message.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The token matched the date shape but the month word is not an English month.
    UnknownMonth { month: String, text: String },
    /// Day, month and year do not form a real calendar date.
    InvalidDate { text: String },
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::UnknownMonth { month, text } => {
                write!(f, "Unrecognised month '{}' in: {}", month, text)
            }
            DateError::InvalidDate { text } => write!(f, "Invalid date detected in: {}", text),
        }
    }
}

impl std::error::Error for DateError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    Date { line: String, source: DateError },
    /// A bare start day ("3rd - 5th January 2024") that does not exist in the matched month.
    InvalidStartDay { line: String, day: u32 },
    InvertedRange {
        line: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl LineError {
    pub fn line(&self) -> &str {
        match self {
            LineError::Date { line, .. }
            | LineError::InvalidStartDay { line, .. }
            | LineError::InvertedRange { line, .. } => line,
        }
    }
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineError::Date { line, source } => {
                write!(f, "Could not parse date from line '{}': {}", line, source)
            }
            LineError::InvalidStartDay { line, day } => {
                write!(f, "Invalid start day {} in line: {}", day, line)
            }
            LineError::InvertedRange { line, start, end } => write!(
                f,
                "Range starts after it ends ({} > {}) in line: {}",
                start, end, line
            ),
        }
    }
}

impl std::error::Error for LineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LineError::Date { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    Fetch {
        url: String,
        attempts: u32,
        reason: String,
    },
    /// No content section on the page, or it yielded no usable lines.
    NoContent(String),
    NoEvents { lines: usize },
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeError::Fetch {
                url,
                attempts,
                reason,
            } => write!(
                f,
                "Failed to fetch {} after {} attempt(s): {}",
                url, attempts, reason
            ),
            ScrapeError::NoContent(detail) => write!(f, "No term date content found: {}", detail),
            ScrapeError::NoEvents { lines } => {
                write!(f, "No events parsed from {} extracted line(s)", lines)
            }
        }
    }
}

impl std::error::Error for ScrapeError {}
