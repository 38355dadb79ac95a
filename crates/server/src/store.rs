//! sea-orm backed storage for clients and sent reminder emails.
//!
//! Converts rows into the read-only snapshots consumed by [`crate::reminder`].
//! All timestamps are written in UTC.

use crate::entity::{client, email};
use crate::error::StoreError;
use crate::reminder::{Cadence, Client, EmailRecord};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use time::{OffsetDateTime, UtcOffset};

/// Clients and emails read at one point in time.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub clients: Vec<Client>,
    pub emails: Vec<EmailRecord>,
}

#[derive(Clone, Debug)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cadence: Cadence,
    /// Date of the last reminder sent before the client was registered here.
    pub last_reminder: Option<OffsetDateTime>,
}

#[derive(Clone, Debug)]
pub struct ClientUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cadence: Cadence,
}

fn to_client(model: client::Model) -> Result<Client, StoreError> {
    let cadence = model
        .reminder_frequency
        .parse()
        .map_err(|source| StoreError::InvalidCadence {
            client_id: model.id,
            source,
        })?;
    Ok(Client {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        cadence,
        registered_at: model.created_at,
    })
}

fn to_email(model: email::Model) -> EmailRecord {
    EmailRecord {
        id: model.id,
        client_id: model.client_id,
        sent_at: model.sent_at,
    }
}

async fn fetch_clients<C: ConnectionTrait>(conn: &C) -> Result<Vec<Client>, StoreError> {
    client::Entity::find()
        .order_by_asc(client::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(to_client)
        .collect()
}

async fn fetch_emails<C: ConnectionTrait>(conn: &C) -> Result<Vec<EmailRecord>, StoreError> {
    Ok(email::Entity::find()
        .order_by_asc(email::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(to_email)
        .collect())
}

async fn ensure_client<C: ConnectionTrait>(conn: &C, id: i32) -> Result<client::Model, StoreError> {
    client::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(StoreError::NotFound(id))
}

async fn insert_email<C: ConnectionTrait>(
    conn: &C,
    client_id: i32,
    sent_at: OffsetDateTime,
) -> Result<EmailRecord, StoreError> {
    let model = email::ActiveModel {
        client_id: Set(client_id),
        sent_at: Set(sent_at.to_offset(UtcOffset::UTC)),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(to_email(model))
}

/// All clients, ordered by id.
#[tracing::instrument(skip(db))]
pub async fn list_clients(db: &DatabaseConnection) -> Result<Vec<Client>, StoreError> {
    fetch_clients(db).await
}

#[tracing::instrument(skip(db))]
pub async fn get_client(db: &DatabaseConnection, id: i32) -> Result<Client, StoreError> {
    to_client(ensure_client(db, id).await?)
}

/// Insert a client and, when given, its last reminder as the first email record.
#[tracing::instrument(skip(db, new_client), fields(cadence = %new_client.cadence))]
pub async fn add_client(db: &DatabaseConnection, new_client: NewClient) -> Result<Client, StoreError> {
    let txn = db.begin().await?;
    let model = client::ActiveModel {
        first_name: Set(new_client.first_name),
        last_name: Set(new_client.last_name),
        email: Set(new_client.email),
        reminder_frequency: Set(new_client.cadence.as_token().to_string()),
        created_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if let Some(last_reminder) = new_client.last_reminder {
        insert_email(&txn, model.id, last_reminder).await?;
    }
    txn.commit().await?;

    tracing::info!(
        name = "store.client.created",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        message = "Client created",
        client_id = model.id,
        backfilled = new_client.last_reminder.is_some(),
    );
    to_client(model)
}

#[tracing::instrument(skip(db, update))]
pub async fn update_client(
    db: &DatabaseConnection,
    id: i32,
    update: ClientUpdate,
) -> Result<Client, StoreError> {
    let mut active: client::ActiveModel = ensure_client(db, id).await?.into();
    active.first_name = Set(update.first_name);
    active.last_name = Set(update.last_name);
    active.email = Set(update.email);
    active.reminder_frequency = Set(update.cadence.as_token().to_string());
    to_client(active.update(db).await?)
}

/// Remove a client together with its email history.
#[tracing::instrument(skip(db))]
pub async fn delete_client(db: &DatabaseConnection, id: i32) -> Result<(), StoreError> {
    let txn = db.begin().await?;
    let emails = email::Entity::delete_many()
        .filter(email::Column::ClientId.eq(id))
        .exec(&txn)
        .await?;
    let deleted = client::Entity::delete_by_id(id).exec(&txn).await?;
    if deleted.rows_affected == 0 {
        txn.rollback().await?;
        return Err(StoreError::NotFound(id));
    }
    txn.commit().await?;

    tracing::info!(
        name = "store.client.deleted",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        message = "Client deleted",
        client_id = id,
        emails_removed = emails.rows_affected,
    );
    Ok(())
}

/// Every email record, in insertion order.
#[tracing::instrument(skip(db))]
pub async fn list_emails(db: &DatabaseConnection) -> Result<Vec<EmailRecord>, StoreError> {
    fetch_emails(db).await
}

/// Emails of one client, oldest first.
#[tracing::instrument(skip(db))]
pub async fn emails_for_client(
    db: &DatabaseConnection,
    client_id: i32,
) -> Result<Vec<EmailRecord>, StoreError> {
    ensure_client(db, client_id).await?;
    Ok(email::Entity::find()
        .filter(email::Column::ClientId.eq(client_id))
        .order_by_asc(email::Column::SentAt)
        .order_by_asc(email::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(to_email)
        .collect())
}

/// Latest email sent to a client, if any.
#[tracing::instrument(skip(db))]
pub async fn last_email(
    db: &DatabaseConnection,
    client_id: i32,
) -> Result<Option<EmailRecord>, StoreError> {
    Ok(email::Entity::find()
        .filter(email::Column::ClientId.eq(client_id))
        .order_by_desc(email::Column::SentAt)
        .order_by_desc(email::Column::Id)
        .one(db)
        .await?
        .map(to_email))
}

/// Record that a reminder was sent, at `sent_at` or now.
#[tracing::instrument(skip(db))]
pub async fn record_email(
    db: &DatabaseConnection,
    client_id: i32,
    sent_at: Option<OffsetDateTime>,
) -> Result<EmailRecord, StoreError> {
    ensure_client(db, client_id).await?;
    let record = insert_email(db, client_id, sent_at.unwrap_or_else(OffsetDateTime::now_utc)).await?;
    tracing::info!(
        name = "store.email.recorded",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        message = "Reminder email recorded",
        client_id = client_id,
        email_id = record.id,
    );
    Ok(record)
}

/// Read clients and emails in one transaction.
#[tracing::instrument(skip(db))]
pub async fn load_snapshot(db: &DatabaseConnection) -> Result<Snapshot, StoreError> {
    let txn = db.begin().await?;
    let clients = fetch_clients(&txn).await?;
    let emails = fetch_emails(&txn).await?;
    txn.commit().await?;
    Ok(Snapshot { clients, emails })
}
