//! Reminder overview endpoint.
//!
//! Serves the pending reminders, the full history and the clients that were
//! never reminded, computed from one storage snapshot.

use crate::AppResources;
use crate::error::ApiError;
use crate::reminder::{self, Cadence, Client, HistoryEntry};
use crate::store;
use axum::{Extension, Json, Router, extract::Query, routing::get};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Default, Deserialize)]
pub struct OverviewParams {
    /// Evaluate as of this RFC 3339 instant instead of the current time.
    pub at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntryView {
    pub client_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cadence: Cadence,
    pub cadence_label: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub last_email_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub next_email_time: OffsetDateTime,
    pub pending: bool,
    pub pending_since_seconds: i64,
    pub pending_months: i64,
    pub pending_since_text: String,
}

impl From<HistoryEntry> for HistoryEntryView {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            pending: entry.is_pending(),
            pending_since_seconds: entry.pending_since.whole_seconds(),
            pending_months: reminder::approximate_months(entry.pending_since),
            pending_since_text: reminder::humanize(entry.pending_since),
            cadence_label: entry.cadence.display_name(),
            client_id: entry.client_id,
            first_name: entry.first_name,
            last_name: entry.last_name,
            email: entry.email,
            cadence: entry.cadence,
            last_email_time: entry.last_email_time,
            next_email_time: entry.next_email_time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OverviewView {
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
    pub pending: Vec<HistoryEntryView>,
    pub history: Vec<HistoryEntryView>,
    pub never_reminded: Vec<Client>,
}

pub fn router() -> Router {
    Router::new().route("/", get(overview))
}

fn resolve_now(params: &OverviewParams) -> Result<OffsetDateTime, ApiError> {
    match params.at.as_deref() {
        Some(at) => OffsetDateTime::parse(at, &Rfc3339)
            .map_err(|e| ApiError::bad_request(format!("Invalid 'at' timestamp: {e}"))),
        None => Ok(OffsetDateTime::now_utc()),
    }
}

#[tracing::instrument(skip(resources))]
async fn overview(
    Extension(resources): Extension<AppResources>,
    Query(params): Query<OverviewParams>,
) -> Result<Json<OverviewView>, ApiError> {
    let now = resolve_now(&params)?;
    let snapshot = store::load_snapshot(&resources.db).await?;
    let overview = reminder::overview(&snapshot.clients, &snapshot.emails, now);

    tracing::debug!(
        name = "api.emails.overview",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        message = "Computed reminder overview",
        history = overview.history.len(),
        pending = overview.pending.len(),
        never_reminded = overview.never_reminded.len(),
    );

    Ok(Json(OverviewView {
        at: now,
        pending: overview.pending.into_iter().map(Into::into).collect(),
        history: overview.history.into_iter().map(Into::into).collect(),
        never_reminded: overview.never_reminded,
    }))
}
