//! Local calendar day resolution.
//!
//! Every event is bucketed by the calendar day it occurred in the user's
//! local timezone. The key is derived by converting the UTC timestamp into
//! the local zone first and taking the date from there; slicing the first
//! ten characters off an RFC3339 string buckets late-evening events into the
//! wrong day and is deliberately not offered.

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar day in the user's local timezone, keyed as `YYYY-MM-DD`.
///
/// Stable: the same instant always resolves to the same `LocalDay` on the
/// same device, no matter when the resolution happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocalDay(pub NaiveDate);

impl LocalDay {
    /// Resolve the local calendar day an instant belongs to.
    pub fn of(ts: DateTime<Utc>) -> Self {
        Self::of_in(ts, &Local)
    }

    /// Resolve the calendar day of `ts` in an explicit timezone.
    ///
    /// Used by tests to pin the zone; production code goes through [`of`].
    ///
    /// [`of`]: LocalDay::of
    pub fn of_in<Tz: TimeZone>(ts: DateTime<Utc>, tz: &Tz) -> Self {
        LocalDay(ts.with_timezone(tz).date_naive())
    }

    /// Today's local calendar day.
    pub fn today() -> Self {
        LocalDay(Local::now().date_naive())
    }

    /// The `YYYY-MM-DD` storage key.
    pub fn key(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// The previous calendar day.
    pub fn pred(&self) -> Self {
        LocalDay(
            self.0
                .checked_sub_days(Days::new(1))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// The `n` calendar days ending at `end` inclusive, oldest first.
    pub fn trailing_window(end: LocalDay, n: usize) -> Vec<LocalDay> {
        (0..n)
            .rev()
            .map(|back| {
                LocalDay(
                    end.0
                        .checked_sub_days(Days::new(back as u64))
                        .unwrap_or(NaiveDate::MIN),
                )
            })
            .collect()
    }
}

impl fmt::Display for LocalDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for LocalDay {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(LocalDay)
    }
}
