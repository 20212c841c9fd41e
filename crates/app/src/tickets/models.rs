//! Ticket Models

use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicI64, Ordering},
};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique, immutable ticket identifier.
///
/// Generated from the current time in milliseconds since the epoch, with a
/// process-wide high-water mark so two tickets created in the same
/// millisecond still receive distinct numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(String);

static LAST_TICKET_MILLIS: AtomicI64 = AtomicI64::new(0);

impl TicketNumber {
    /// Generates a fresh ticket number.
    #[must_use]
    pub fn generate() -> Self {
        let now = Timestamp::now().as_millisecond();
        let mut prev = LAST_TICKET_MILLIS.load(Ordering::Relaxed);

        loop {
            let next = now.max(prev + 1);

            match LAST_TICKET_MILLIS.compare_exchange_weak(
                prev,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(next.to_string()),
                Err(observed) => prev = observed,
            }
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for TicketNumber {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TicketNumber {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ticket workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Open,
    #[serde(rename = "In-progress")]
    InProgress,
    Closed,
}

impl Status {
    /// Storage and wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In-progress",
            Self::Closed => "Closed",
        }
    }
}

/// Raised when a string is not one of the recognised status values.
#[derive(Debug, Error)]
#[error("invalid status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(Self::Open),
            "In-progress" => Ok(Self::InProgress),
            "Closed" => Ok(Self::Closed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Storage and wire representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Raised when a string is not one of the recognised priority values.
#[derive(Debug, Error)]
#[error("invalid priority: {0}")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Critical" => Ok(Self::Critical),
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            "Low" => Ok(Self::Low),
            other => Err(ParsePriorityError(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket Model
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    /// Unique ticket identifier, immutable once created.
    pub ticket_number: TicketNumber,

    /// Brief issue summary, at most 100 characters.
    pub issue_title: String,

    /// Detailed issue description.
    pub issue_description: String,

    /// Workflow status.
    pub status: Status,

    /// Priority level.
    pub priority: Priority,

    /// Contact email address.
    pub email: String,

    /// Contact phone number.
    pub phone_number: String,

    /// Agent notes, empty when unset.
    pub notes: String,

    /// Creation timestamp, never mutated after insert.
    pub created: Timestamp,

    /// Last modification timestamp.
    pub changed: Timestamp,
}

/// New Ticket input, before the service synthesises the number, defaults and
/// timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    /// Optional title; derived from the description when absent.
    pub issue_title: Option<String>,

    /// Issue description.
    pub issue_description: String,

    /// Optional status; defaults to [`Status::Open`] when absent.
    pub status: Option<Status>,

    /// Priority level.
    pub priority: Priority,

    /// Contact email address.
    pub email: String,

    /// Contact phone number.
    pub phone_number: String,

    /// Optional agent notes.
    pub notes: Option<String>,
}

/// Partial ticket update.
///
/// Only the mutable attributes are representable here; the ticket number and
/// creation timestamp have no corresponding fields, so an update can never
/// touch them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketPatch {
    pub issue_title: Option<String>,
    pub issue_description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn generated_ticket_numbers_are_unique() {
        let numbers: HashSet<TicketNumber> =
            (0..64).map(|_| TicketNumber::generate()).collect();

        assert_eq!(numbers.len(), 64, "expected 64 distinct ticket numbers");
    }

    #[test]
    fn generated_ticket_numbers_increase() {
        let first = TicketNumber::generate();
        let second = TicketNumber::generate();

        let first: i64 = first.as_str().parse().unwrap();
        let second: i64 = second.as_str().parse().unwrap();

        assert!(second > first, "expected {second} > {first}");
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [Status::Open, Status::InProgress, Status::Closed] {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
    }

    #[test]
    fn status_rejects_unknown_value() {
        assert!("open".parse::<Status>().is_err());
        assert!("Resolved".parse::<Status>().is_err());
    }

    #[test]
    fn priority_round_trips_through_strings() {
        for priority in [
            Priority::Critical,
            Priority::High,
            Priority::Medium,
            Priority::Low,
        ] {
            assert_eq!(priority.as_str().parse::<Priority>().unwrap(), priority);
        }
    }

    #[test]
    fn in_progress_serialises_with_hyphen() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();

        assert_eq!(json, "\"In-progress\"");
    }
}
