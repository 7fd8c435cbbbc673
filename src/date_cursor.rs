//! The calendar day currently shown on the page.
//!
//! Keys are local calendar dates: "today" comes from the local clock, never a
//! UTC-shifted timestamp, so late-evening entries land on the right day.

#[cfg(test)]
#[path = "date_cursor_test.rs"]
mod date_cursor_test;

use chrono::{Days, Local, NaiveDate};

use crate::DateKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCursor {
    current: NaiveDate,
}

impl DateCursor {
    /// A cursor on today's local date.
    #[must_use]
    pub fn today() -> Self {
        Self { current: local_today() }
    }

    /// A cursor on a specific day.
    #[must_use]
    pub fn at(key: DateKey) -> Self {
        Self { current: key.date() }
    }

    /// Canonical key of the displayed day.
    #[must_use]
    pub fn current(&self) -> DateKey {
        DateKey::new(self.current)
    }

    /// Move by whole days and return the new key.
    ///
    /// Moving outside years 0001..=9999 leaves the cursor where it is.
    pub fn advance(&mut self, delta_days: i64) -> DateKey {
        let magnitude = Days::new(delta_days.unsigned_abs());
        let next = if delta_days >= 0 {
            self.current.checked_add_days(magnitude)
        } else {
            self.current.checked_sub_days(magnitude)
        };
        if let Some(date) = next.filter(|d| DateKey::in_range(*d)) {
            self.current = date;
        }
        self.current()
    }

    /// Jump back to today's local date and return its key.
    pub fn reset_to_today(&mut self) -> DateKey {
        self.current = local_today();
        self.current()
    }
}

impl Default for DateCursor {
    fn default() -> Self {
        Self::today()
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
