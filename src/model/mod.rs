// File: ./src/model/mod.rs
pub mod adapter;
pub mod holiday;
pub mod item;
pub mod label;
pub mod parser;
pub mod season;

pub use adapter::render_calendar;
pub use holiday::infer_holidays;
pub use item::{EventOrigin, RawEvent, TermEvent};
pub use label::LabelNormalizer;
pub use parser::{parse_date, parse_event_line};
