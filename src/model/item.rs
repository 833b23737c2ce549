// File: src/model/item.rs
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    /// Parsed from a line of the term-date page.
    Scraped,
    /// Derived from the gap between an "End of Term" and the next "Term Begins".
    Inferred,
}

/// One all-day span with a human readable label.
///
/// `start <= end` always holds: the constructors refuse inverted spans and
/// `set_span` leaves the record untouched when given one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEvent {
    start: NaiveDate,
    end: NaiveDate,
    label: String,
    origin: EventOrigin,
}

impl TermEvent {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        label: impl Into<String>,
        origin: EventOrigin,
    ) -> Option<Self> {
        if start > end {
            return None;
        }
        Some(Self {
            start,
            end,
            label: label.into(),
            origin,
        })
    }

    pub fn scraped(start: NaiveDate, end: NaiveDate, label: impl Into<String>) -> Option<Self> {
        Self::new(start, end, label, EventOrigin::Scraped)
    }

    pub fn inferred(start: NaiveDate, end: NaiveDate, label: impl Into<String>) -> Option<Self> {
        Self::new(start, end, label, EventOrigin::Inferred)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn origin(&self) -> EventOrigin {
        self.origin
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    pub fn start_month(&self) -> u32 {
        self.start.month()
    }

    /// Number of days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// The day after `end`, as used by DTEND on all-day events.
    pub fn exclusive_end(&self) -> NaiveDate {
        self.end.succ_opt().unwrap_or(self.end)
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn with_label(&self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self.clone()
        }
    }

    /// Returns false (and changes nothing) if `start > end`.
    pub fn set_span(&mut self, start: NaiveDate, end: NaiveDate) -> bool {
        if start > end {
            return false;
        }
        self.start = start;
        self.end = end;
        true
    }
}

/// A scraped event before label normalization, with the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub event: TermEvent,
    pub line: String,
}
