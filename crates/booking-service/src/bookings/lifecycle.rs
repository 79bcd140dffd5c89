use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::BookingStatus;

/// Mutating intents a caller can apply to an existing booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    Confirm,
    Reject,
    Cancel,
    UpdateDates,
}

impl BookingAction {
    pub const fn label(self) -> &'static str {
        match self {
            BookingAction::Confirm => "confirm",
            BookingAction::Reject => "reject",
            BookingAction::Cancel => "cancel",
            BookingAction::UpdateDates => "update dates for",
        }
    }
}

impl fmt::Display for BookingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a requested transition is not in the legal table; names the
/// current state and the attempted action for diagnosability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} a booking in the {from} state")]
pub struct InvalidTransition {
    pub from: BookingStatus,
    pub action: BookingAction,
}

/// Resolve the next status for `action` applied in state `from`.
///
/// The legal set is closed: `Pending` may be confirmed, rejected, cancelled,
/// or re-windowed; `Accepted` may be cancelled or re-windowed; the terminal
/// states refuse everything.
pub fn transition(
    from: BookingStatus,
    action: BookingAction,
) -> Result<BookingStatus, InvalidTransition> {
    match (from, action) {
        (BookingStatus::Pending, BookingAction::Confirm) => Ok(BookingStatus::Accepted),
        (BookingStatus::Pending, BookingAction::Reject) => Ok(BookingStatus::Rejected),
        (BookingStatus::Pending, BookingAction::Cancel)
        | (BookingStatus::Accepted, BookingAction::Cancel) => Ok(BookingStatus::Cancelled),
        (BookingStatus::Pending, BookingAction::UpdateDates) => Ok(BookingStatus::Pending),
        (BookingStatus::Accepted, BookingAction::UpdateDates) => Ok(BookingStatus::Accepted),
        (from, action) => Err(InvalidTransition { from, action }),
    }
}
