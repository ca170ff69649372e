// SPDX-License-Identifier: Apache-2.0

//! Date-window parsing and small display helpers.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::error::TriageError;

/// Modification window for the updated-bug listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    /// Inclusive lower bound, sent to the tracker as `modified_since`.
    pub since: DateTime<Utc>,
    /// Exclusive upper bound, applied locally.
    pub until: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// Parses a window relative to `today`.
    ///
    /// Accepts:
    /// - a number of days back (`3` -> midnight UTC three days before `today`)
    /// - a single date `YYYY-MM-DD` (open-ended)
    /// - an inclusive range `YYYY-MM-DD..YYYY-MM-DD`
    pub fn parse(input: &str, today: NaiveDate) -> Result<Self, TriageError> {
        let input = input.trim();
        let invalid = || TriageError::InvalidDate {
            input: input.to_string(),
        };

        if let Ok(days) = input.parse::<u64>() {
            let start = today.checked_sub_days(Days::new(days)).ok_or_else(invalid)?;
            return Ok(Self {
                since: midnight(start),
                until: None,
            });
        }

        if let Some((start, end)) = input.split_once("..") {
            let start = parse_day(start).ok_or_else(invalid)?;
            let end = parse_day(end).ok_or_else(invalid)?;
            if end < start {
                return Err(invalid());
            }
            let after_end = end.checked_add_days(Days::new(1)).ok_or_else(invalid)?;
            return Ok(Self {
                since: midnight(start),
                until: Some(midnight(after_end)),
            });
        }

        let start = parse_day(input).ok_or_else(invalid)?;
        Ok(Self {
            since: midnight(start),
            until: None,
        })
    }

    /// Returns `true` if `ts` is before the upper bound (or there is none).
    #[must_use]
    pub fn admits(&self, ts: DateTime<Utc>) -> bool {
        self.until.is_none_or(|until| ts < until)
    }
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Truncates a string to `max_chars`, appending an ellipsis when cut.
#[must_use]
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}
