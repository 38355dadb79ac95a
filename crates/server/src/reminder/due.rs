use super::cadence::Cadence;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime};

/// Outcome of the due-date computation for one client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DueStatus {
    pub next_due_at: OffsetDateTime,
    /// `now - next_due_at`; positive once the reminder is overdue.
    pub pending_since: Duration,
}

impl DueStatus {
    /// Strictly past the due instant. The due instant itself is not pending.
    pub fn is_due(&self) -> bool {
        self.pending_since > Duration::ZERO
    }
}

/// Advance `at` by whole calendar months, keeping day-of-month and time of day.
///
/// A day that does not exist in the target month rolls over into the next one
/// (Aug 31 + 6 months is Mar 3, or Mar 2 in a leap year). Saturates at the
/// largest representable timestamp.
pub fn add_calendar_months(at: OffsetDateTime, months: u32) -> OffsetDateTime {
    checked_add_calendar_months(at, months)
        .unwrap_or_else(|| PrimitiveDateTime::MAX.assume_offset(at.offset()))
}

fn checked_add_calendar_months(at: OffsetDateTime, months: u32) -> Option<OffsetDateTime> {
    let index = i64::from(at.year()) * 12 + i64::from(u8::from(at.month())) - 1 + i64::from(months);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let date = first.checked_add(Duration::days(i64::from(at.day()) - 1))?;
    Some(at.replace_date(date))
}

/// Compute when the next reminder is due and how long it has been pending.
pub fn due_status(last_sent_at: OffsetDateTime, cadence: Cadence, now: OffsetDateTime) -> DueStatus {
    let next_due_at = add_calendar_months(last_sent_at, u32::from(cadence.months()));
    DueStatus {
        next_due_at,
        pending_since: now - next_due_at,
    }
}
