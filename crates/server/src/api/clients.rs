//! Client management endpoints.
//!
//! - `/` - List and create clients
//! - `/{id}` - Fetch, update or delete one client
//! - `/{id}/emails` - List a client's reminders or record a new one

use crate::AppResources;
use crate::error::ApiError;
use crate::reminder::{Cadence, Client, EmailRecord, is_reminder_month};
use crate::store::{self, ClientUpdate, NewClient};
use axum::{
    Extension, Json, Router,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::{Date, Month, OffsetDateTime, Time};

/// Client as shown in listings, with its latest reminder.
#[derive(Debug, Serialize)]
pub struct ClientView {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cadence: Cadence,
    pub cadence_label: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_email_at: Option<OffsetDateTime>,
    /// The current month is a reminder month relative to the last email.
    pub due_this_month: bool,
}

impl ClientView {
    fn new(client: Client, last_email_at: Option<OffsetDateTime>, now: OffsetDateTime) -> Self {
        let due_this_month = last_email_at
            .is_some_and(|last| is_reminder_month(now.month(), last.month(), client.cadence));
        Self {
            id: client.id,
            first_name: client.first_name,
            last_name: client.last_name,
            email: client.email,
            cadence: client.cadence,
            cadence_label: client.cadence.display_name(),
            registered_at: client.registered_at,
            last_email_at,
            due_this_month,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateClient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cadence: String,
    /// Month of the last reminder sent before registration, `YYYY-MM`.
    #[serde(default)]
    pub last_reminder: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cadence: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RecordEmail {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub sent_at: Option<OffsetDateTime>,
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route(
            "/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/{id}/emails", get(list_emails).post(record_email))
}

/// Parse a `YYYY-MM` month into midnight UTC on its first day.
pub fn parse_year_month(input: &str) -> Result<OffsetDateTime, ApiError> {
    let invalid = || ApiError::bad_request(format!("Invalid month '{input}', expected YYYY-MM"));
    let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u8 = month.parse().map_err(|_| invalid())?;
    let month = Month::try_from(month).map_err(|_| invalid())?;
    let date = Date::from_calendar_date(year, month, 1).map_err(|_| invalid())?;
    Ok(date.with_time(Time::MIDNIGHT).assume_utc())
}

#[tracing::instrument(skip(resources))]
async fn list_clients(
    Extension(resources): Extension<AppResources>,
) -> Result<Json<Vec<ClientView>>, ApiError> {
    let snapshot = store::load_snapshot(&resources.db).await?;
    let now = OffsetDateTime::now_utc();

    let mut latest: HashMap<i32, OffsetDateTime> = HashMap::new();
    for email in &snapshot.emails {
        latest
            .entry(email.client_id)
            .and_modify(|t| *t = (*t).max(email.sent_at))
            .or_insert(email.sent_at);
    }

    let views = snapshot
        .clients
        .into_iter()
        .map(|c| {
            let last = latest.get(&c.id).copied();
            ClientView::new(c, last, now)
        })
        .collect();
    Ok(Json(views))
}

#[tracing::instrument(skip(resources, payload), fields(cadence = %payload.cadence))]
async fn create_client(
    Extension(resources): Extension<AppResources>,
    Json(payload): Json<CreateClient>,
) -> Result<impl IntoResponse, ApiError> {
    let cadence: Cadence = payload.cadence.parse()?;
    let last_reminder = payload
        .last_reminder
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_year_month)
        .transpose()?;

    let client = store::add_client(
        &resources.db,
        NewClient {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            cadence,
            last_reminder,
        },
    )
    .await?;

    let view = ClientView::new(client, last_reminder, OffsetDateTime::now_utc());
    Ok((StatusCode::CREATED, Json(view)))
}

#[tracing::instrument(skip(resources))]
async fn get_client(
    Extension(resources): Extension<AppResources>,
    Path(id): Path<i32>,
) -> Result<Json<ClientView>, ApiError> {
    let client = store::get_client(&resources.db, id).await?;
    let last = store::last_email(&resources.db, id).await?;
    Ok(Json(ClientView::new(
        client,
        last.map(|e| e.sent_at),
        OffsetDateTime::now_utc(),
    )))
}

#[tracing::instrument(skip(resources, payload))]
async fn update_client(
    Extension(resources): Extension<AppResources>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateClient>,
) -> Result<Json<ClientView>, ApiError> {
    let cadence: Cadence = payload.cadence.parse()?;
    let client = store::update_client(
        &resources.db,
        id,
        ClientUpdate {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            cadence,
        },
    )
    .await?;
    let last = store::last_email(&resources.db, id).await?;
    Ok(Json(ClientView::new(
        client,
        last.map(|e| e.sent_at),
        OffsetDateTime::now_utc(),
    )))
}

#[tracing::instrument(skip(resources))]
async fn delete_client(
    Extension(resources): Extension<AppResources>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    store::delete_client(&resources.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(resources))]
async fn list_emails(
    Extension(resources): Extension<AppResources>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<EmailRecord>>, ApiError> {
    Ok(Json(store::emails_for_client(&resources.db, id).await?))
}

#[tracing::instrument(skip(resources, payload))]
async fn record_email(
    Extension(resources): Extension<AppResources>,
    Path(id): Path<i32>,
    Json(payload): Json<RecordEmail>,
) -> Result<impl IntoResponse, ApiError> {
    let record = store::record_email(&resources.db, id, payload.sent_at).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_year_month() {
        assert_eq!(
            parse_year_month("2024-05").unwrap(),
            datetime!(2024-05-01 00:00 UTC)
        );
        assert_eq!(
            parse_year_month(" 1999-12 ").unwrap(),
            datetime!(1999-12-01 00:00 UTC)
        );
    }

    #[test]
    fn rejects_malformed_year_month() {
        for input in ["2024-13", "2024-00", "2024", "24-05", "2024-5", "2024-05-01", "abcd-ef"] {
            let err = parse_year_month(input).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{input}");
        }
    }

    #[test]
    fn due_this_month_follows_last_email_month() {
        let client = Client {
            id: 1,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.org".into(),
            cadence: Cadence::HalfYear,
            registered_at: datetime!(2023-01-01 00:00 UTC),
        };
        let view = ClientView::new(
            client.clone(),
            Some(datetime!(2023-06-10 00:00 UTC)),
            datetime!(2023-12-02 00:00 UTC),
        );
        assert!(view.due_this_month);
        assert_eq!(view.cadence_label, "halbjährlich");

        let never = ClientView::new(client, None, datetime!(2023-12-02 00:00 UTC));
        assert!(!never.due_this_month);
    }
}
