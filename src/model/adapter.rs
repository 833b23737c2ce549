// File: src/model/adapter.rs
use crate::model::item::TermEvent;
use icalendar::{Calendar, CalendarComponent, Component};

pub const ICS_DATE_FORMAT: &str = "%Y%m%d";

impl TermEvent {
    /// All-day VEVENT with an exclusive DTEND, no UID or DTSTAMP.
    pub fn to_vevent(&self) -> String {
        format!(
            "BEGIN:VEVENT\r\nDTSTART;VALUE=DATE:{}\r\nDTEND;VALUE=DATE:{}\r\nSUMMARY:{}\r\nEND:VEVENT\r\n",
            self.start().format(ICS_DATE_FORMAT),
            self.exclusive_end().format(ICS_DATE_FORMAT),
            self.label()
        )
    }
}

/// Wraps the events, in the given order, in a VCALENDAR envelope.
pub fn render_calendar<'a, I>(prodid: &str, events: I) -> String
where
    I: IntoIterator<Item = &'a TermEvent>,
{
    let mut output = format!(
        "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:{}\r\nCALSCALE:GREGORIAN\r\n",
        prodid
    );
    for event in events {
        output.push_str(&event.to_vevent());
    }
    output.push_str("END:VCALENDAR\r\n");
    output
}

/// Parses a rendered document back and returns the summaries of its events.
pub fn read_summaries(raw_ics: &str) -> Result<Vec<String>, String> {
    let calendar: Calendar = raw_ics.parse().map_err(|e| format!("Parse: {}", e))?;
    Ok(calendar
        .components
        .iter()
        .filter_map(|component| match component {
            CalendarComponent::Event(e) => Some(e.get_summary().unwrap_or_default().to_string()),
            _ => None,
        })
        .collect())
}
