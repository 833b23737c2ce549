// Integration tests for the lines -> calendar pipeline and the full run.
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use termdates::config::Config;
use termdates::context::{AppContext, TestContext};
use termdates::controller::{self, PageSource, build_calendar};
use termdates::error::ScrapeError;
use termdates::model::adapter::read_summaries;
use termdates::storage::OutputTarget;

const SAMPLE_LINES: [&str; 10] = [
    "Autumn Term 2024",
    "Monday 2nd September 2024 - INSET Day",
    "Tuesday 3rd September 2024 Term Begins",
    "Friday 25th October 2024 End of Term",
    "Monday 4th November 2024 Term Begins",
    "Friday 20th December 2024 End of Term",
    "Spring Term 2025",
    "Monday 6th January 2025 Term Begins",
    "Monday 17th February 2025 Half Term",
    "31st April 2025 INSET Day",
];

const SAMPLE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Term Dates</title></head>
<body>
<nav><p>Home<br>Privacy Policy</p></nav>
<section class="user-content">
<p>Autumn Term 2024<br>
Monday 2nd September 2024 - INSET Day<br>
Tuesday 3rd September 2024 Term Begins<br>
Friday 25th October 2024 End of Term<br>
Monday 4th November 2024 Term Begins<br>
Friday 20th December 2024 End of Term</p>
<p>Spring Term 2025<br>
Monday 6th January 2025 Term Begins<br>
Monday 17th February 2025 Half Term<br>
31st April 2025 INSET Day</p>
<p>Page last updated 1st July 2024</p>
</section>
</body>
</html>"#;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_sample_term_produces_events_and_holidays() {
    let doc = build_calendar(&SAMPLE_LINES, &Config::default()).unwrap();

    assert_eq!(doc.scraped.len(), 7);
    assert_eq!(doc.holidays.len(), 2);
    assert_eq!(doc.rejected.len(), 1);
    assert_eq!(doc.rejected[0].line(), "31st April 2025 INSET Day");
    assert_eq!(doc.event_count(), 9);

    let labels: Vec<&str> = doc.scraped.iter().map(|e| e.label()).collect();
    assert_eq!(
        labels,
        vec![
            "Penrice Inset Day",
            "Penrice Term Begins",
            "Penrice End of Term",
            "Penrice Term Begins",
            "Penrice End of Term",
            "Penrice Term Begins",
            "Penrice Spring Half Term",
        ]
    );

    let holidays: Vec<(NaiveDate, NaiveDate, &str)> = doc
        .holidays
        .iter()
        .map(|h| (h.start(), h.end(), h.label()))
        .collect();
    assert_eq!(
        holidays,
        vec![
            (
                date(2024, 10, 26),
                date(2024, 11, 3),
                "Penrice Autumn Half Term"
            ),
            (
                date(2024, 12, 21),
                date(2025, 1, 5),
                "Penrice Christmas Holidays"
            ),
        ]
    );

    assert!(doc.ics.contains("DTSTART;VALUE=DATE:20250217\r\nDTEND;VALUE=DATE:20250222\r\n"));
    assert!(doc.ics.contains("PRODID:-//Penrice Academy//EN\r\n"));
}

#[test]
fn test_scraped_events_come_before_holidays() {
    let doc = build_calendar(&SAMPLE_LINES, &Config::default()).unwrap();
    let summaries = read_summaries(&doc.ics).unwrap();
    assert_eq!(summaries.len(), 9);
    assert_eq!(summaries[6], "Penrice Spring Half Term");
    assert_eq!(summaries[7], "Penrice Autumn Half Term");
    assert_eq!(summaries[8], "Penrice Christmas Holidays");
}

#[test]
fn test_scraped_events_are_sorted_by_start() {
    let lines = [
        "Monday 6th January 2025 Term Begins",
        "Friday 20th December 2024 End of Term",
    ];
    let doc = build_calendar(&lines, &Config::default()).unwrap();
    assert_eq!(doc.scraped[0].start(), date(2024, 12, 20));
    assert_eq!(doc.scraped[1].start(), date(2025, 1, 6));
    assert_eq!(doc.holidays.len(), 1);
}

#[test]
fn test_toggles() {
    let holidays_only = Config {
        create_scraped_events: false,
        ..Config::default()
    };
    let doc = build_calendar(&SAMPLE_LINES, &holidays_only).unwrap();
    assert!(doc.scraped.is_empty());
    assert_eq!(doc.holidays.len(), 2);
    assert_eq!(doc.ics.matches("BEGIN:VEVENT").count(), 2);

    let scraped_only = Config {
        create_holiday_events: false,
        ..Config::default()
    };
    let doc = build_calendar(&SAMPLE_LINES, &scraped_only).unwrap();
    assert_eq!(doc.scraped.len(), 7);
    assert!(doc.holidays.is_empty());

    let neither = Config {
        create_scraped_events: false,
        create_holiday_events: false,
        ..Config::default()
    };
    let doc = build_calendar(&SAMPLE_LINES, &neither).unwrap();
    assert_eq!(doc.event_count(), 0);
    assert!(doc.ics.contains("BEGIN:VCALENDAR"));
    assert!(!doc.ics.contains("BEGIN:VEVENT"));
}

#[test]
fn test_custom_prefix_and_words() {
    let config = Config {
        calendar_prefix: "Hilltop".to_string(),
        titlecase_words: vec![],
        ..Config::default()
    };
    let doc = build_calendar(&["Monday 2nd September 2024 INSET day"], &config).unwrap();
    assert_eq!(doc.scraped[0].label(), "Hilltop INSET day");
}

#[test]
fn test_no_lines_is_no_content() {
    let empty: [&str; 0] = [];
    let err = build_calendar(&empty, &Config::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScrapeError>(),
        Some(ScrapeError::NoContent(_))
    ));
}

#[test]
fn test_no_dated_lines_is_no_events() {
    let lines = ["Autumn Term 2024", "31st April 2025 INSET Day"];
    let err = build_calendar(&lines, &Config::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScrapeError>(),
        Some(ScrapeError::NoEvents { lines: 2 })
    ));
}

#[test]
fn test_user_messages_name_the_log() {
    let log = Path::new("log.txt");
    let fetch: anyhow::Error = ScrapeError::Fetch {
        url: "http://x".to_string(),
        attempts: 3,
        reason: "HTTP 500".to_string(),
    }
    .into();
    assert_eq!(
        controller::user_message(&fetch, log),
        "Error: Failed to fetch term dates. Check log.txt for details."
    );

    let no_content: anyhow::Error = ScrapeError::NoContent("x".to_string()).into();
    assert_eq!(
        controller::user_message(&no_content, log),
        "Error: No term dates found on website. Check log.txt for details."
    );

    let no_events: anyhow::Error = ScrapeError::NoEvents { lines: 4 }.into();
    assert_eq!(
        controller::user_message(&no_events, log),
        "Error: No events parsed. Check log.txt for details."
    );

    let other = anyhow::anyhow!("disk full");
    assert_eq!(
        controller::user_message(&other, log),
        "Error: An unexpected error occurred. Check log.txt for details."
    );
}

#[tokio::test]
async fn test_run_from_saved_page_writes_calendar() {
    let ctx = TestContext::new();
    let page = ctx.root.join("term-dates.html");
    fs::write(&page, SAMPLE_PAGE).unwrap();

    let config = Config::default();
    let target = OutputTarget::File(config.output_path.clone());
    let summary = controller::run(&ctx, &config, &PageSource::File(page), &target)
        .await
        .unwrap();

    assert_eq!(summary.events, 9);
    assert_eq!(summary.rejected_lines, 1);

    let written = ctx.get_data_dir().unwrap().join("penrice.ics");
    assert_eq!(summary.destination, written.display().to_string());
    let ics = fs::read_to_string(written).unwrap();
    assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(!ics.contains("Privacy"));
    assert!(!ics.contains("updated"));
}

#[tokio::test]
async fn test_run_without_content_section_fails_cleanly() {
    let ctx = TestContext::new();
    let page = ctx.root.join("moved.html");
    fs::write(&page, "<html><body><p>This page has moved</p></body></html>").unwrap();

    let config = Config::default();
    let target = OutputTarget::File(PathBuf::from("penrice.ics"));
    let err = controller::run(&ctx, &config, &PageSource::File(page), &target)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ScrapeError>(),
        Some(ScrapeError::NoContent(_))
    ));
    assert!(!ctx.get_data_dir().unwrap().join("penrice.ics").exists());
}

#[tokio::test]
async fn test_missing_saved_page_is_unexpected() {
    let ctx = TestContext::new();
    let config = Config::default();
    let err = controller::run(
        &ctx,
        &config,
        &PageSource::File(ctx.root.join("nope.html")),
        &OutputTarget::File(PathBuf::from("penrice.ics")),
    )
    .await
    .unwrap_err();
    assert!(err.downcast_ref::<ScrapeError>().is_none());
    assert!(
        controller::user_message(&err, Path::new("log.txt")).contains("unexpected error")
    );
}

#[test]
fn test_config_save_then_load() {
    let ctx = TestContext::new();
    let config = Config {
        calendar_prefix: "Hilltop".to_string(),
        create_holiday_events: false,
        skip_words: vec!["newsletter".to_string()],
        ..Config::default()
    };
    let path = config.save(&ctx).unwrap();
    assert_eq!(path, ctx.get_config_file_path().unwrap());

    let loaded = Config::load(&ctx).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_missing_config_falls_back_to_defaults() {
    let ctx = TestContext::new();
    let err = Config::load(&ctx).unwrap_err();
    assert!(Config::is_missing_config_error(&err));
    assert_eq!(Config::load_or_default(&ctx).unwrap(), Config::default());
}

#[test]
fn test_broken_config_is_reported() {
    let ctx = TestContext::new();
    fs::write(ctx.get_config_file_path().unwrap(), "retries = \"many\"").unwrap();
    let err = Config::load_or_default(&ctx).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));

    fs::write(ctx.get_config_file_path().unwrap(), "retries = 0").unwrap();
    assert!(Config::load(&ctx).is_err());
}
