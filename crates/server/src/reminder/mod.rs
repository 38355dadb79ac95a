//! Reminder due-date computation and email-history reconciliation.
//!
//! Everything in here is pure and synchronous: callers hand in snapshots of
//! clients and sent emails together with an explicit `now`, and get back the
//! derived history and due classification. Nothing is cached between calls.
//!
//! ## Submodules
//!
//! - `cadence` - Reminder frequency and its month count
//! - `duration` - Rounding and humanized durations (30-day months)
//! - `due` - Next due date using calendar-month arithmetic
//! - `history` - Joins clients with their emails into an ordered history

pub mod cadence;
pub mod due;
pub mod duration;
pub mod history;

use serde::Serialize;
use time::OffsetDateTime;

pub use cadence::{Cadence, is_reminder_month};
pub use due::{DueStatus, add_calendar_months, due_status};
pub use duration::{approximate_months, humanize, round_half_away_from_zero};
pub use history::{HistoryEntry, ReminderOverview, build_history, never_reminded, overview, pending};

/// Read-only snapshot of a client as handed to the reconciler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Client {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cadence: Cadence,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

/// A reminder email that was sent to a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmailRecord {
    pub id: i32,
    pub client_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub sent_at: OffsetDateTime,
}
