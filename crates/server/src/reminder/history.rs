//! Reconciles clients with the emails sent to them.
//!
//! The history holds one entry per client that was reminded at least once,
//! most recently reminded first. It is rebuilt on every call since the due
//! classification depends on `now`.

use super::cadence::Cadence;
use super::due::due_status;
use super::{Client, EmailRecord};
use std::collections::{HashMap, HashSet};
use time::{Duration, OffsetDateTime};

/// One client together with its latest reminder and due state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub client_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cadence: Cadence,
    pub last_email_time: OffsetDateTime,
    pub next_email_time: OffsetDateTime,
    pub pending_since: Duration,
}

impl HistoryEntry {
    pub fn is_pending(&self) -> bool {
        self.pending_since > Duration::ZERO
    }
}

/// Everything derived from one snapshot at one instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReminderOverview {
    pub history: Vec<HistoryEntry>,
    pub pending: Vec<HistoryEntry>,
    /// Clients without any recorded email. They have no due date at all.
    pub never_reminded: Vec<Client>,
}

/// Build the reminder history as of `now`.
///
/// Emails are joined to their client, ordered by `sent_at` descending (ties
/// keep the order of `emails`) and reduced to the latest email per client.
/// Emails whose client is not in `clients` are skipped.
pub fn build_history(
    clients: &[Client],
    emails: &[EmailRecord],
    now: OffsetDateTime,
) -> Vec<HistoryEntry> {
    let by_id: HashMap<i32, &Client> = clients.iter().map(|c| (c.id, c)).collect();

    let mut joined: Vec<(&EmailRecord, &Client)> = Vec::with_capacity(emails.len());
    for email in emails {
        match by_id.get(&email.client_id) {
            Some(client) => joined.push((email, client)),
            None => {
                tracing::warn!(
                    name = "reminder.history.orphaned_email",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    message = "Skipping email record without matching client",
                    email_id = email.id,
                    client_id = email.client_id,
                );
            }
        }
    }

    // Stable, so equal timestamps keep their input order.
    joined.sort_by(|(a, _), (b, _)| b.sent_at.cmp(&a.sent_at));

    let mut seen = HashSet::new();
    joined
        .into_iter()
        .filter(|(_, client)| seen.insert(client.id))
        .map(|(email, client)| {
            let status = due_status(email.sent_at, client.cadence, now);
            HistoryEntry {
                client_id: client.id,
                first_name: client.first_name.clone(),
                last_name: client.last_name.clone(),
                email: client.email.clone(),
                cadence: client.cadence,
                last_email_time: email.sent_at,
                next_email_time: status.next_due_at,
                pending_since: status.pending_since,
            }
        })
        .collect()
}

/// Entries whose reminder is overdue, in history order.
pub fn pending(history: &[HistoryEntry]) -> Vec<&HistoryEntry> {
    history.iter().filter(|e| e.is_pending()).collect()
}

/// Clients that never received an email, in input order.
pub fn never_reminded<'a>(clients: &'a [Client], emails: &[EmailRecord]) -> Vec<&'a Client> {
    let reminded: HashSet<i32> = emails.iter().map(|e| e.client_id).collect();
    clients.iter().filter(|c| !reminded.contains(&c.id)).collect()
}

pub fn overview(
    clients: &[Client],
    emails: &[EmailRecord],
    now: OffsetDateTime,
) -> ReminderOverview {
    let history = build_history(clients, emails, now);
    let pending = pending(&history).into_iter().cloned().collect();
    let never_reminded = never_reminded(clients, emails).into_iter().cloned().collect();
    ReminderOverview {
        history,
        pending,
        never_reminded,
    }
}
