//! Card expiry (`MM/YY`) checks.

use chrono::{Local, NaiveDate};

/// Source of "today" for date-dependent rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// Local wall-clock date.
    #[default]
    System,
    /// A pinned date.
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// Parse `MM/YY` into (year, month). Two-digit years are in the 2000s.
pub fn parse_expiry(value: &str) -> Option<(i32, u32)> {
    let (mm, yy) = value.trim().split_once('/')?;
    let is_two_digits = |s: &str| s.len() == 2 && s.chars().all(|c| c.is_ascii_digit());
    if !is_two_digits(mm) || !is_two_digits(yy) {
        return None;
    }
    let month: u32 = mm.parse().ok()?;
    let year: i32 = yy.parse().ok()?;
    Some((2000 + year, month))
}

/// The card is valid only if the first day of its expiry month lies strictly
/// after `today`.
pub fn check_expiry(value: &str, today: NaiveDate) -> Result<(), &'static str> {
    let (year, month) = parse_expiry(value).ok_or("Expiry date must be in MM/YY format.")?;
    if !(1..=12).contains(&month) {
        return Err("Expiry month must be between 01 and 12.");
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or("Expiry date is invalid.")?;
    if first > today {
        Ok(())
    } else {
        Err("Card has expired.")
    }
}
