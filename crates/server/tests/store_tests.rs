//! Storage tests against an in-memory SQLite database.

use client_reminder::error::StoreError;
use client_reminder::reminder::{self, Cadence};
use client_reminder::store::{self, ClientUpdate, NewClient};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement};
use time::macros::datetime;
use time::OffsetDateTime;

/// Create an in-memory SQLite database with required tables.
async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        r#"CREATE TABLE client (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL,
            reminder_frequency TEXT NOT NULL,
            created_at TEXT NOT NULL
        );"#,
    ))
    .await
    .expect("Failed to create client table");

    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        r#"CREATE TABLE email (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id INTEGER NOT NULL,
            sent_at TEXT NOT NULL
        );"#,
    ))
    .await
    .expect("Failed to create email table");

    db
}

fn new_client(last_name: &str, cadence: Cadence, last_reminder: Option<OffsetDateTime>) -> NewClient {
    NewClient {
        first_name: "Test".into(),
        last_name: last_name.into(),
        email: format!("{}@client.com", last_name.to_lowercase()),
        cadence,
        last_reminder,
    }
}

#[tokio::test]
async fn test_add_and_get_client() {
    let db = setup_test_db().await;

    let created = store::add_client(&db, new_client("Client", Cadence::Year, None))
        .await
        .expect("add client");
    let fetched = store::get_client(&db, created.id).await.expect("get client");

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.first_name, "Test");
    assert_eq!(fetched.last_name, "Client");
    assert_eq!(fetched.email, "client@client.com");
    assert_eq!(fetched.cadence, Cadence::Year);
    assert!(store::last_email(&db, created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_add_client_backfills_last_reminder() {
    let db = setup_test_db().await;
    let last = datetime!(2024-03-01 00:00 UTC);

    let created = store::add_client(&db, new_client("Backfill", Cadence::HalfYear, Some(last)))
        .await
        .expect("add client");

    let emails = store::emails_for_client(&db, created.id).await.unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].sent_at, last);
}

#[tokio::test]
async fn test_record_email_and_last_email() {
    let db = setup_test_db().await;
    let c = store::add_client(&db, new_client("Mail", Cadence::Year, None))
        .await
        .unwrap();

    store::record_email(&db, c.id, Some(datetime!(2023-05-01 10:00 UTC)))
        .await
        .unwrap();
    store::record_email(&db, c.id, Some(datetime!(2024-05-01 10:00 UTC)))
        .await
        .unwrap();
    store::record_email(&db, c.id, Some(datetime!(2023-11-01 10:00 UTC)))
        .await
        .unwrap();

    let last = store::last_email(&db, c.id).await.unwrap().expect("last email");
    assert_eq!(last.sent_at, datetime!(2024-05-01 10:00 UTC));

    let emails = store::emails_for_client(&db, c.id).await.unwrap();
    let times: Vec<_> = emails.iter().map(|e| e.sent_at).collect();
    assert_eq!(
        times,
        vec![
            datetime!(2023-05-01 10:00 UTC),
            datetime!(2023-11-01 10:00 UTC),
            datetime!(2024-05-01 10:00 UTC),
        ]
    );
}

#[tokio::test]
async fn test_record_email_normalises_to_utc() {
    let db = setup_test_db().await;
    let c = store::add_client(&db, new_client("Offset", Cadence::Year, None))
        .await
        .unwrap();

    let record = store::record_email(&db, c.id, Some(datetime!(2024-01-01 02:00 +02:00)))
        .await
        .unwrap();
    assert_eq!(record.sent_at, datetime!(2024-01-01 00:00 UTC));
    assert!(record.sent_at.offset().is_utc());
}

#[tokio::test]
async fn test_record_email_defaults_to_now() {
    let db = setup_test_db().await;
    let c = store::add_client(&db, new_client("Now", Cadence::Year, None))
        .await
        .unwrap();

    let before = OffsetDateTime::now_utc();
    let record = store::record_email(&db, c.id, None).await.unwrap();
    let after = OffsetDateTime::now_utc();
    assert!(record.sent_at >= before && record.sent_at <= after);
}

#[tokio::test]
async fn test_unknown_client_is_not_found() {
    let db = setup_test_db().await;

    assert!(matches!(
        store::get_client(&db, 42).await,
        Err(StoreError::NotFound(42))
    ));
    assert!(matches!(
        store::record_email(&db, 42, None).await,
        Err(StoreError::NotFound(42))
    ));
    assert!(matches!(
        store::delete_client(&db, 42).await,
        Err(StoreError::NotFound(42))
    ));
    assert!(store::list_emails(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_client_changes_cadence() {
    let db = setup_test_db().await;
    let c = store::add_client(&db, new_client("Update", Cadence::Year, None))
        .await
        .unwrap();

    let updated = store::update_client(
        &db,
        c.id,
        ClientUpdate {
            first_name: "Changed".into(),
            last_name: "Name".into(),
            email: "changed@client.com".into(),
            cadence: Cadence::HalfYear,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.cadence, Cadence::HalfYear);
    assert_eq!(store::get_client(&db, c.id).await.unwrap(), updated);
}

#[tokio::test]
async fn test_delete_client_removes_emails() {
    let db = setup_test_db().await;
    let keep = store::add_client(&db, new_client("Keep", Cadence::Year, Some(datetime!(2024-01-01 00:00 UTC))))
        .await
        .unwrap();
    let gone = store::add_client(&db, new_client("Gone", Cadence::Year, Some(datetime!(2024-02-01 00:00 UTC))))
        .await
        .unwrap();

    store::delete_client(&db, gone.id).await.unwrap();

    let snapshot = store::load_snapshot(&db).await.unwrap();
    assert_eq!(snapshot.clients.len(), 1);
    assert_eq!(snapshot.clients[0].id, keep.id);
    assert!(snapshot.emails.iter().all(|e| e.client_id == keep.id));
}

#[tokio::test]
async fn test_invalid_stored_cadence_is_reported() {
    let db = setup_test_db().await;
    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        r#"INSERT INTO client (first_name, last_name, email, reminder_frequency, created_at)
           VALUES ('Bad', 'Row', 'bad@client.com', 'MONTHLY', '2024-01-01T00:00:00+00:00');"#,
    ))
    .await
    .expect("insert raw row");

    match store::list_clients(&db).await {
        Err(StoreError::InvalidCadence { source, .. }) => assert_eq!(source.0, "MONTHLY"),
        other => panic!("expected invalid cadence, got {other:?}"),
    }
}

#[tokio::test]
async fn test_snapshot_feeds_history() {
    let db = setup_test_db().await;
    let a = store::add_client(&db, new_client("A", Cadence::Year, Some(datetime!(2023-01-01 00:00 UTC))))
        .await
        .unwrap();
    let b = store::add_client(&db, new_client("B", Cadence::HalfYear, Some(datetime!(2024-01-01 00:00 UTC))))
        .await
        .unwrap();
    let c = store::add_client(&db, new_client("C", Cadence::Year, None))
        .await
        .unwrap();

    let snapshot = store::load_snapshot(&db).await.unwrap();
    let ov = reminder::overview(&snapshot.clients, &snapshot.emails, datetime!(2024-03-01 00:00 UTC));

    let history: Vec<i32> = ov.history.iter().map(|e| e.client_id).collect();
    assert_eq!(history, vec![b.id, a.id]);
    let pending: Vec<i32> = ov.pending.iter().map(|e| e.client_id).collect();
    assert_eq!(pending, vec![a.id]);
    let never: Vec<i32> = ov.never_reminded.iter().map(|c| c.id).collect();
    assert_eq!(never, vec![c.id]);
}
