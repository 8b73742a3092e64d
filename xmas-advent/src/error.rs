//! This module contains the error type for building a calendar.

use thiserror::Error;

/// An error from building a [`Calendar`](crate::Calendar).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[allow(missing_docs, reason = "the #[error] attributes document the variants")]
pub enum AdventError {
    #[error("Day {0} has more than one decoration")]
    DuplicateDay(u32),

    #[error("Day {0} is not a valid day of the month")]
    InvalidDay(u32),
}
