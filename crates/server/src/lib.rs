//! Tracks clients that receive a reminder email every six or twelve months
//! and works out which of them are due.
//!
//! The due-date and history logic lives in [`reminder`] and is pure; storage
//! and HTTP live in [`store`] and [`api`] and only feed it snapshots.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

pub mod api;
pub mod config;
pub mod entity;
pub mod error;
pub mod reminder;
pub mod store;

#[derive(Clone, Debug)]
pub struct AppResources {
    pub db: Arc<DatabaseConnection>,
    pub config: Arc<AppConfig>,
}
