// File: src/model/label.rs
//! Label clean-up applied to every scraped event before it is emitted.
use crate::model::item::{RawEvent, TermEvent};
use crate::model::parser::clean_label;
use crate::model::season::half_term_season;
use chrono::{Datelike, Duration};
use once_cell::sync::Lazy;
use regex::Regex;

pub const HALF_TERM: &str = "Half Term";
pub const HALF_TERM_WEEKDAYS: i64 = 5;

// "Begins at 3:00pm" marks an early finish on the day before a break.
static EARLY_FINISH_TAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*Begins at 3:00pm\.?$").expect("marker pattern is valid"));
static EARLY_FINISH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Begins at 3:00pm").expect("marker pattern is valid"));

pub fn has_early_finish(line: &str) -> bool {
    EARLY_FINISH_RE.is_match(line)
}

pub fn strip_early_finish(label: &str) -> String {
    let stripped = EARLY_FINISH_TAIL_RE.replace(label, "");
    clean_label(&stripped).to_string()
}

fn title_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Title-cases whole-word, case-insensitive matches of a fixed word list.
#[derive(Debug, Clone)]
pub struct TitleCaser {
    pattern: Option<Regex>,
}

impl TitleCaser {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = words
            .iter()
            .map(|w| w.as_ref().trim())
            .filter(|w| !w.is_empty())
            .map(regex::escape)
            .collect();
        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }
        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|")))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn apply(&self, text: &str) -> String {
        match &self.pattern {
            Some(re) => re
                .replace_all(text, |caps: &regex::Captures| title_word(&caps[0]))
                .into_owned(),
            None => text.to_string(),
        }
    }
}

/// Stretches a one-day "Half Term" marker to Monday..Friday of its week.
///
/// Lines carrying the early-finish marker describe the last school day before
/// the break, so they keep their single day.
pub fn expand_half_term(event: &mut TermEvent, early_finish: bool) -> bool {
    if !event.label().contains(HALF_TERM) || !event.is_single_day() || early_finish {
        return false;
    }
    let day = event.start();
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    let friday = monday + Duration::days(HALF_TERM_WEEKDAYS - 1);
    event.set_span(monday, friday)
}

/// "Half Term" → "<Season> Half Term" by start month. Months with no season
/// and labels that already carry one are returned unchanged.
pub fn qualify_half_term(label: &str, month: u32) -> String {
    if !label.contains(HALF_TERM) {
        return label.to_string();
    }
    let Some(season) = half_term_season(month) else {
        return label.to_string();
    };
    let qualified = format!("{} {}", season, HALF_TERM);
    if label.contains(&qualified) {
        return label.to_string();
    }
    label.replace(HALF_TERM, &qualified)
}

pub fn apply_prefix(prefix: &str, label: &str) -> String {
    format!("{} {}", prefix, label).trim().to_string()
}

#[derive(Debug, Clone)]
pub struct LabelNormalizer {
    titlecase: TitleCaser,
    prefix: String,
}

impl LabelNormalizer {
    pub fn new<S: AsRef<str>>(titlecase_words: &[S], prefix: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            titlecase: TitleCaser::new(titlecase_words)?,
            prefix: prefix.trim().to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn normalize(&self, raw: RawEvent) -> TermEvent {
        let RawEvent { mut event, line } = raw;

        let label = strip_early_finish(event.label());
        event.set_label(self.titlecase.apply(&label));

        if expand_half_term(&mut event, has_early_finish(&line)) {
            log::debug!(
                "Expanded half term to {}..{}: {}",
                event.start(),
                event.end(),
                line
            );
        }

        let qualified = qualify_half_term(event.label(), event.start_month());
        event.set_label(apply_prefix(&self.prefix, &qualified));
        event
    }
}
