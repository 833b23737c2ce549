// File: tests/holiday_inference.rs
use chrono::NaiveDate;
use termdates::model::season::{HolidayName, holiday_name};
use termdates::model::{EventOrigin, TermEvent, infer_holidays};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn day(d: NaiveDate, label: &str) -> TermEvent {
    TermEvent::scraped(d, d, label).unwrap()
}

fn spans(holidays: &[TermEvent]) -> Vec<(NaiveDate, NaiveDate, &str)> {
    holidays
        .iter()
        .map(|h| (h.start(), h.end(), h.label()))
        .collect()
}

#[test]
fn test_summer_gap() {
    let events = vec![
        day(date(2024, 7, 19), "Penrice End of Term"),
        day(date(2024, 9, 4), "Penrice Term Begins"),
    ];
    let holidays = infer_holidays(&events);
    assert_eq!(
        spans(&holidays),
        vec![(date(2024, 7, 20), date(2024, 9, 3), "Summer Holidays")]
    );
    assert_eq!(holidays[0].origin(), EventOrigin::Inferred);
}

#[test]
fn test_name_follows_first_day_of_break() {
    assert_eq!(holiday_name(12), HolidayName::Christmas);
    assert_eq!(holiday_name(1), HolidayName::Christmas);
    assert_eq!(holiday_name(2), HolidayName::SpringHalfTerm);
    assert_eq!(holiday_name(3), HolidayName::Easter);
    assert_eq!(holiday_name(4), HolidayName::Easter);
    assert_eq!(holiday_name(5), HolidayName::SummerHalfTerm);
    assert_eq!(holiday_name(6), HolidayName::SummerHalfTerm);
    assert_eq!(holiday_name(7), HolidayName::Summer);
    assert_eq!(holiday_name(8), HolidayName::Summer);
    assert_eq!(holiday_name(9).to_string(), "Holiday");
    assert_eq!(holiday_name(10).to_string(), "Autumn Half Term");
    assert_eq!(holiday_name(11), HolidayName::AutumnHalfTerm);
}

#[test]
fn test_full_year_in_any_input_order() {
    let events = vec![
        day(date(2025, 4, 22), "Term Begins"),
        day(date(2024, 12, 20), "End of Term"),
        day(date(2024, 10, 25), "End of Term"),
        day(date(2024, 11, 4), "Term Begins"),
        day(date(2025, 1, 6), "Term Begins"),
        day(date(2025, 2, 14), "End of Term"),
        day(date(2025, 2, 24), "Term Begins"),
        day(date(2025, 4, 4), "End of Term"),
    ];
    let holidays = infer_holidays(&events);
    assert_eq!(
        spans(&holidays),
        vec![
            (date(2024, 10, 26), date(2024, 11, 3), "Autumn Half Term"),
            (date(2024, 12, 21), date(2025, 1, 5), "Christmas Holidays"),
            (date(2025, 2, 15), date(2025, 2, 23), "Spring Half Term"),
            (date(2025, 4, 5), date(2025, 4, 21), "Easter Holiday"),
        ]
    );
}

#[test]
fn test_term_begins_before_end_is_ignored() {
    // The only "Term Begins" is earlier than the "End of Term".
    let events = vec![
        day(date(2025, 7, 18), "End of Term"),
        day(date(2024, 9, 4), "Term Begins"),
    ];
    assert!(infer_holidays(&events).is_empty());
}

#[test]
fn test_no_gap_means_no_holiday() {
    let events = vec![
        day(date(2024, 10, 25), "End of Term"),
        day(date(2024, 10, 26), "Term Begins"),
    ];
    assert!(infer_holidays(&events).is_empty());
}

#[test]
fn test_overlapping_markers_do_not_invert() {
    let events = vec![
        TermEvent::scraped(date(2024, 10, 21), date(2024, 10, 25), "End of Term").unwrap(),
        day(date(2024, 10, 23), "Term Begins"),
    ];
    assert!(infer_holidays(&events).is_empty());
}

#[test]
fn test_nearest_term_start_wins() {
    let events = vec![
        day(date(2024, 7, 19), "End of Term"),
        day(date(2024, 9, 3), "INSET Day"),
        day(date(2024, 9, 4), "Term Begins"),
        day(date(2024, 11, 4), "Term Begins"),
    ];
    let holidays = infer_holidays(&events);
    assert_eq!(
        spans(&holidays),
        vec![(date(2024, 7, 20), date(2024, 9, 3), "Summer Holidays")]
    );
}

#[test]
fn test_repeated_lines_yield_one_holiday() {
    let events = vec![
        day(date(2024, 12, 20), "End of Term"),
        day(date(2024, 12, 20), "Penrice End of Term"),
        day(date(2025, 1, 6), "Term Begins"),
    ];
    let holidays = infer_holidays(&events);
    assert_eq!(holidays.len(), 1);
    assert_eq!(holidays[0].label(), "Christmas Holidays");
}

#[test]
fn test_unrelated_labels_produce_nothing() {
    let events = vec![
        day(date(2024, 9, 2), "INSET Day"),
        day(date(2024, 12, 20), "Carol Service"),
    ];
    assert!(infer_holidays(&events).is_empty());
    assert!(infer_holidays(&[]).is_empty());
}
