// File: ./src/controller.rs
//! Pipeline entry point: lines in, calendar document out.
//!
//! `build_calendar` is the pure part (no IO) and is what the tests drive.
//! `run` adds the page source and the output target around it.
use crate::client::{PageClient, RetryPolicy, extract_lines};
use crate::config::Config;
use crate::context::AppContext;
use crate::error::{LineError, ScrapeError};
use crate::model::label::apply_prefix;
use crate::model::{LabelNormalizer, TermEvent, infer_holidays, parse_event_line, render_calendar};
use crate::storage::{CalendarStorage, OutputTarget};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
    Url(String),
    File(PathBuf),
}

/// Normalized events from all lines, plus the lines that were rejected.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub events: Vec<TermEvent>,
    pub rejected: Vec<LineError>,
}

pub fn extract_events<S: AsRef<str>>(lines: &[S], normalizer: &LabelNormalizer) -> Extraction {
    let mut extraction = Extraction::default();
    for line in lines {
        match parse_event_line(line.as_ref()) {
            Ok(raw_events) => extraction
                .events
                .extend(raw_events.into_iter().map(|raw| normalizer.normalize(raw))),
            Err(e) => {
                log::error!("{}", e);
                extraction.rejected.push(e);
            }
        }
    }
    extraction
}

#[derive(Debug, Clone)]
pub struct CalendarDocument {
    pub ics: String,
    /// Scraped events in output order (empty when disabled).
    pub scraped: Vec<TermEvent>,
    /// Inferred holidays in output order, already prefixed (empty when disabled).
    pub holidays: Vec<TermEvent>,
    pub rejected: Vec<LineError>,
}

impl CalendarDocument {
    pub fn event_count(&self) -> usize {
        self.scraped.len() + self.holidays.len()
    }
}

/// Runs the parsing pipeline over already-extracted lines.
///
/// Zero lines is the "no content" condition; lines that yield zero events
/// is the "no events" condition. Both come back as `ScrapeError`.
pub fn build_calendar<S: AsRef<str>>(lines: &[S], config: &Config) -> Result<CalendarDocument> {
    if lines.is_empty() {
        return Err(ScrapeError::NoContent("zero lines extracted".to_string()).into());
    }

    let normalizer = LabelNormalizer::new(&config.titlecase_words, &config.calendar_prefix)
        .context("Invalid titlecase_words")?;
    let Extraction {
        mut events,
        rejected,
    } = extract_events(lines, &normalizer);

    if events.is_empty() {
        return Err(ScrapeError::NoEvents { lines: lines.len() }.into());
    }
    events.sort_by_key(|e| e.start());

    let holidays: Vec<TermEvent> = if config.create_holiday_events {
        infer_holidays(&events)
            .iter()
            .map(|h| h.with_label(apply_prefix(normalizer.prefix(), h.label())))
            .collect()
    } else {
        Vec::new()
    };
    let scraped = if config.create_scraped_events {
        events
    } else {
        Vec::new()
    };

    log::info!(
        "Parsed {} event(s), inferred {} holiday(s), rejected {} line(s)",
        scraped.len(),
        holidays.len(),
        rejected.len()
    );

    let ics = render_calendar(&config.prodid, scraped.iter().chain(holidays.iter()));
    Ok(CalendarDocument {
        ics,
        scraped,
        holidays,
        rejected,
    })
}

pub async fn load_page(source: &PageSource, config: &Config) -> Result<String> {
    match source {
        PageSource::Url(url) => {
            let client = PageClient::new(RetryPolicy::from_config(config))
                .map_err(|e| anyhow::anyhow!("Failed to set up HTTP client: {}", e))?;
            Ok(client.fetch(url).await?)
        }
        PageSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read page from {}", path.display())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub destination: String,
    pub events: usize,
    pub rejected_lines: usize,
}

/// Fetch (or read), extract, build, write.
pub async fn run(
    ctx: &dyn AppContext,
    config: &Config,
    source: &PageSource,
    target: &OutputTarget,
) -> Result<RunSummary> {
    let html = load_page(source, config).await?;
    let lines = extract_lines(&html, &config.content_selectors, &config.skip_words)?;
    let document = build_calendar(&lines, config)?;
    let (destination, events) = CalendarStorage::write(ctx, target, &document.ics)?;
    Ok(RunSummary {
        destination,
        events,
        rejected_lines: document.rejected.len(),
    })
}

/// Short message for the terminal; the details are in the log file.
pub fn user_message(err: &anyhow::Error, log_path: &Path) -> String {
    let log = log_path.display();
    match err.downcast_ref::<ScrapeError>() {
        Some(ScrapeError::Fetch { .. }) => {
            format!("Error: Failed to fetch term dates. Check {} for details.", log)
        }
        Some(ScrapeError::NoContent(_)) => format!(
            "Error: No term dates found on website. Check {} for details.",
            log
        ),
        Some(ScrapeError::NoEvents { .. }) => {
            format!("Error: No events parsed. Check {} for details.", log)
        }
        None if Config::is_invalid_config_error(err) => format!(
            "Error: Invalid configuration. Check {} for details.",
            log
        ),
        None => format!(
            "Error: An unexpected error occurred. Check {} for details.",
            log
        ),
    }
}
