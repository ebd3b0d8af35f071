//! Publication status lifecycle.
//!
//! The transition table is public so collaborators outside this core
//! (review queues, public listings) validate reviewer actions against
//! the same rules the submission path uses.

use crate::error::{DraftError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a draft sits in the review lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Draft,
    Pending,
    Published,
    Rejected,
    Archived,
}

/// Every transition the lifecycle permits.
///
/// `Draft -> Pending` is owned by the submission orchestrator; the
/// `Pending -> Published/Rejected` edges are reviewer actions applied
/// outside this core, and `Rejected -> Draft` reopens a draft for
/// re-editing. Anything else is rejected.
pub const ALLOWED_TRANSITIONS: &[(Status, Status)] = &[
    (Status::Draft, Status::Pending),
    (Status::Pending, Status::Published),
    (Status::Pending, Status::Rejected),
    (Status::Published, Status::Archived),
    (Status::Rejected, Status::Draft),
];

impl Status {
    /// Whether the lifecycle permits moving from `self` to `to`.
    pub fn can_transition(self, to: Status) -> bool {
        ALLOWED_TRANSITIONS.contains(&(self, to))
    }

    /// Fail-closed transition check: returns the target status or an
    /// `IllegalTransition` error, never silently succeeds.
    pub fn checked_transition(self, to: Status) -> Result<Status> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(DraftError::IllegalTransition { from: self, to })
        }
    }

    /// The lowercase wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Pending => "pending",
            Status::Published => "published",
            Status::Rejected => "rejected",
            Status::Archived => "archived",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(Status::Draft),
            "pending" => Ok(Status::Pending),
            "published" => Ok(Status::Published),
            "rejected" => Ok(Status::Rejected),
            "archived" => Ok(Status::Archived),
            other => Err(DraftError::UnknownStatus(other.to_string())),
        }
    }
}
