// File: src/model/season.rs
//! Month lookup tables for half-term seasons and inferred holiday names.
//!
//! Both tables are evaluated top-down and the first row containing the month
//! wins, so rows may overlap without ambiguity.
use strum::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum HolidayName {
    #[strum(to_string = "Christmas Holidays")]
    Christmas,
    #[strum(to_string = "Spring Half Term")]
    SpringHalfTerm,
    #[strum(to_string = "Easter Holiday")]
    Easter,
    #[strum(to_string = "Summer Half Term")]
    SummerHalfTerm,
    #[strum(to_string = "Summer Holidays")]
    Summer,
    #[strum(to_string = "Autumn Half Term")]
    AutumnHalfTerm,
    #[strum(to_string = "Holiday")]
    Generic,
}

pub const HALF_TERM_SEASONS: &[(&[u32], Season)] = &[
    (&[2], Season::Spring),
    (&[5, 6], Season::Summer),
    (&[10, 11], Season::Autumn),
];

pub const HOLIDAY_NAMES: &[(&[u32], HolidayName)] = &[
    (&[12, 1], HolidayName::Christmas),
    (&[2], HolidayName::SpringHalfTerm),
    (&[3, 4], HolidayName::Easter),
    (&[5, 6], HolidayName::SummerHalfTerm),
    (&[7, 8], HolidayName::Summer),
    (&[10, 11], HolidayName::AutumnHalfTerm),
];

pub fn lookup_month<T: Copy>(table: &[(&[u32], T)], month: u32) -> Option<T> {
    table
        .iter()
        .find(|(months, _)| months.contains(&month))
        .map(|(_, value)| *value)
}

pub fn half_term_season(month: u32) -> Option<Season> {
    lookup_month(HALF_TERM_SEASONS, month)
}

pub fn holiday_name(month: u32) -> HolidayName {
    lookup_month(HOLIDAY_NAMES, month).unwrap_or(HolidayName::Generic)
}
