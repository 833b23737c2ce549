// File: src/model/holiday.rs
use crate::model::item::TermEvent;
use crate::model::season::holiday_name;
use chrono::Datelike;

pub const END_OF_TERM: &str = "End of Term";
pub const TERM_BEGINS: &str = "Term Begins";

/// Derives the breaks between each "End of Term" and the next "Term Begins".
///
/// Events are ordered by start date (stable) and only later events are
/// considered as the following term start. Empty gaps are dropped, and a
/// span found twice is returned once.
pub fn infer_holidays(events: &[TermEvent]) -> Vec<TermEvent> {
    let mut sorted: Vec<&TermEvent> = events.iter().collect();
    sorted.sort_by_key(|e| e.start());

    let mut holidays: Vec<TermEvent> = Vec::new();
    for (i, term_end) in sorted.iter().enumerate() {
        if !term_end.label().contains(END_OF_TERM) {
            continue;
        }
        let Some(next_term) = sorted[i + 1..]
            .iter()
            .find(|e| e.label().contains(TERM_BEGINS))
        else {
            log::debug!("No term start after '{}'", term_end.label());
            continue;
        };

        let (Some(start), Some(end)) = (term_end.end().succ_opt(), next_term.start().pred_opt())
        else {
            continue;
        };
        let Some(holiday) = TermEvent::inferred(start, end, holiday_name(start.month()).to_string())
        else {
            log::debug!(
                "No gap between '{}' ({}) and '{}' ({})",
                term_end.label(),
                term_end.end(),
                next_term.label(),
                next_term.start()
            );
            continue;
        };
        if !holidays.contains(&holiday) {
            holidays.push(holiday);
        }
    }
    holidays
}
