//! Simulation calendar.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Day` counter, zero-based
//! within a single calendar year held by `Horizon`:
//!
//!   Day(0) = January 1, Day(num_days - 1) = December 31
//!
//! Using an integer day as the canonical time unit keeps all horizon
//! arithmetic exact and comparisons O(1).  Calendar conversion (leap years,
//! `YYYY-MM-DD` formatting and parsing) is implemented here directly — the
//! Gregorian rules for one year are a dozen lines and don't justify a
//! datetime dependency.

use std::fmt;

use crate::error::BlError;

// ── Day ───────────────────────────────────────────────────────────────────────

/// A zero-based day index within the planning horizon.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Day(pub u16);

impl Day {
    pub const ZERO: Day = Day(0);

    /// Cast to `usize` for direct use as a ledger / table index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The following day.
    #[inline]
    pub fn next(self) -> Day {
        Day(self.0 + 1)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

// ── Horizon ───────────────────────────────────────────────────────────────────

/// Cumulative days before the start of each month in a non-leap year.
const MONTH_START: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Days in each month in a non-leap year.
const MONTH_LEN: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A one-calendar-year planning horizon.
///
/// Maps [`Day`] indices to and from Gregorian dates of the configured year.
/// `Horizon` is cheap to copy and intentionally holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Horizon {
    pub year: i32,
}

impl Horizon {
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    /// Gregorian leap-year rule.
    #[inline]
    pub fn is_leap(&self) -> bool {
        (self.year % 4 == 0 && self.year % 100 != 0) || self.year % 400 == 0
    }

    /// Number of days in the horizon: 365, or 366 in a leap year.
    #[inline]
    pub fn num_days(&self) -> u16 {
        if self.is_leap() { 366 } else { 365 }
    }

    /// `true` if `day` falls within the horizon.
    #[inline]
    pub fn contains(&self, day: Day) -> bool {
        day.0 < self.num_days()
    }

    /// Iterate every day of the horizon in order.
    pub fn days(&self) -> impl Iterator<Item = Day> + use<> {
        (0..self.num_days()).map(Day)
    }

    /// Split `day` into a 1-based `(month, day_of_month)` pair.
    ///
    /// # Panics
    /// Panics in debug mode if `day` is outside the horizon.
    pub fn month_day(&self, day: Day) -> (u8, u8) {
        debug_assert!(self.contains(day), "{day} outside horizon {}", self.year);

        let leap = self.is_leap() as u16;
        let ordinal = day.0;

        for month in (0..12).rev() {
            // February onward shifts by one in a leap year.
            let start = MONTH_START[month] + if month >= 2 { leap } else { 0 };
            if ordinal >= start {
                return (month as u8 + 1, (ordinal - start) as u8 + 1);
            }
        }
        unreachable!("month lookup covers every ordinal")
    }

    /// Format `day` as an ISO-8601 `YYYY-MM-DD` date string.
    pub fn date_string(&self, day: Day) -> String {
        let (m, d) = self.month_day(day);
        format!("{:04}-{:02}-{:02}", self.year, m, d)
    }

    /// Parse a `YYYY-MM-DD` date string into a [`Day`] of this horizon.
    ///
    /// # Errors
    /// Returns [`BlError::Parse`] if the string is malformed, names a
    /// different year, or is not a valid calendar date.
    pub fn parse_date(&self, s: &str) -> Result<Day, BlError> {
        let bad = || BlError::Parse(format!("invalid date {s:?}: expected YYYY-MM-DD in {}", self.year));

        let mut parts = s.trim().splitn(3, '-');
        let year:  i32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
        let month: u8  = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
        let dom:   u8  = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;

        if year != self.year || month == 0 || month > 12 || dom == 0 {
            return Err(bad());
        }

        let mi = (month - 1) as usize;
        let leap = self.is_leap();
        let month_len = MONTH_LEN[mi] + (mi == 1 && leap) as u8;
        if dom > month_len {
            return Err(bad());
        }

        let start = MONTH_START[mi] + if mi >= 2 && leap { 1 } else { 0 };
        Ok(Day(start + (dom - 1) as u16))
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "year {} ({} days)", self.year, self.num_days())
    }
}
