//! Enrollment windows - the date range in which a school year accepts applications.
//!
//! All comparisons are on calendar dates; the caller decides what "today" is (see
//! [`crate::config::settings::SchoolCalendar::today`]). Only `end_date` decides whether a
//! window is open. The early/regular/late deadlines are carried as informational dates.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;

/// Where a window stands relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowStatus {
    /// `today < start_date`
    Upcoming,
    /// `start_date <= today <= end_date`
    Open,
    /// `today > end_date`
    Closed,
}

impl WindowStatus {
    /// Lowercase name used in the `school_years.status` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for WindowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of applicant a window may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentKind {
    /// First-time applicant
    New,
    /// Student continuing from a previous year
    Returning,
}

/// Which of the staged deadlines a date belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineTier {
    /// Early registration
    Early,
    /// Regular registration
    Regular,
    /// Late registration
    Late,
}

const fn default_allowed() -> bool {
    true
}

/// Raw window dates as entered by an administrator or read from config.
///
/// Nothing is checked here; turn it into an [`EnrollmentWindow`] to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WindowDates {
    /// First day applications are accepted
    pub start_date: NaiveDate,
    /// Last day applications are accepted
    pub end_date: NaiveDate,
    /// Optional early registration deadline
    #[serde(default)]
    pub early_deadline: Option<NaiveDate>,
    /// Regular registration deadline
    pub regular_deadline: NaiveDate,
    /// Optional late registration deadline
    #[serde(default)]
    pub late_deadline: Option<NaiveDate>,
    /// Whether first-time students may apply
    #[serde(default = "default_allowed")]
    pub allow_new_students: bool,
    /// Whether returning students may re-enroll
    #[serde(default = "default_allowed")]
    pub allow_returning_students: bool,
}

/// A validated enrollment window.
///
/// Invariants: `start_date <= end_date`, and every deadline lies within
/// `[start_date, end_date]`. Both are enforced on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentWindow {
    dates: WindowDates,
}

impl EnrollmentWindow {
    /// Validates `dates`, failing with [`Error::InvalidWindow`] on any ordering violation.
    pub fn new(dates: WindowDates) -> Result<Self> {
        if dates.end_date < dates.start_date {
            return Err(Error::InvalidWindow {
                message: format!(
                    "end date {} is before start date {}",
                    dates.end_date, dates.start_date
                ),
            });
        }

        let deadlines = [
            ("early", dates.early_deadline),
            ("regular", Some(dates.regular_deadline)),
            ("late", dates.late_deadline),
        ];
        for (label, deadline) in deadlines {
            let Some(deadline) = deadline else { continue };
            if !(dates.start_date..=dates.end_date).contains(&deadline) {
                return Err(Error::InvalidWindow {
                    message: format!(
                        "{label} deadline {deadline} is outside {} to {}",
                        dates.start_date, dates.end_date
                    ),
                });
            }
        }

        Ok(Self { dates })
    }

    /// The validated dates and flags.
    #[must_use]
    pub const fn dates(&self) -> &WindowDates {
        &self.dates
    }

    /// First day of the window.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.dates.start_date
    }

    /// Last day of the window; decides when it closes.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.dates.end_date
    }

    /// Early registration deadline, if any.
    #[must_use]
    pub const fn early_deadline(&self) -> Option<NaiveDate> {
        self.dates.early_deadline
    }

    /// Regular registration deadline.
    #[must_use]
    pub const fn regular_deadline(&self) -> NaiveDate {
        self.dates.regular_deadline
    }

    /// Late registration deadline, if any.
    #[must_use]
    pub const fn late_deadline(&self) -> Option<NaiveDate> {
        self.dates.late_deadline
    }

    /// Whether first-time students may apply.
    #[must_use]
    pub const fn allows_new_students(&self) -> bool {
        self.dates.allow_new_students
    }

    /// Whether returning students may re-enroll.
    #[must_use]
    pub const fn allows_returning_students(&self) -> bool {
        self.dates.allow_returning_students
    }

    /// True while `start_date <= today <= end_date`. Deadlines play no part.
    #[must_use]
    pub fn is_open(&self, today: NaiveDate) -> bool {
        self.dates.start_date <= today && today <= self.dates.end_date
    }

    /// Whole days from `today` until `end_date`, never negative.
    ///
    /// Before the window starts this still counts down to the close date.
    #[must_use]
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        self.dates
            .end_date
            .signed_duration_since(today)
            .num_days()
            .max(0)
    }

    /// Classifies the window as upcoming, open or closed on `today`.
    #[must_use]
    pub fn status(&self, today: NaiveDate) -> WindowStatus {
        if today < self.dates.start_date {
            WindowStatus::Upcoming
        } else if today <= self.dates.end_date {
            WindowStatus::Open
        } else {
            WindowStatus::Closed
        }
    }

    /// Whether an applicant of `kind` can enroll today: the window is open and
    /// the matching eligibility flag is set.
    #[must_use]
    pub fn accepts(&self, kind: StudentKind, today: NaiveDate) -> bool {
        let allowed = match kind {
            StudentKind::New => self.dates.allow_new_students,
            StudentKind::Returning => self.dates.allow_returning_students,
        };
        allowed && self.is_open(today)
    }

    /// The earliest deadline falling on or after `today`, if any.
    #[must_use]
    pub fn next_deadline(&self, today: NaiveDate) -> Option<(DeadlineTier, NaiveDate)> {
        [
            (DeadlineTier::Early, self.dates.early_deadline),
            (DeadlineTier::Regular, Some(self.dates.regular_deadline)),
            (DeadlineTier::Late, self.dates.late_deadline),
        ]
        .into_iter()
        .filter_map(|(tier, deadline)| deadline.map(|date| (tier, date)))
        .filter(|(_, date)| *date >= today)
        .min_by_key(|(_, date)| *date)
    }
}

impl TryFrom<WindowDates> for EnrollmentWindow {
    type Error = Error;

    fn try_from(dates: WindowDates) -> Result<Self> {
        Self::new(dates)
    }
}
