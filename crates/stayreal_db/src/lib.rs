//! Persistent state for the StayReal notifier
//!
//! This crate owns the two pieces of state the notifier keeps across restarts:
//!
//! - the last moment id seen per region (`last_events`)
//! - the APNs device registrations (`device_registrations`)
//!
//! It uses SQLx's `Any` driver, so the backend is chosen by the database URL.
//! SQLite is enabled by default; PostgreSQL is available behind the
//! `postgres` feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use stayreal_db::{init_schema, DbClient, RepositoryFactory, SqlRepositoryFactory};
//! use stayreal_db::SqlDeviceRegistrationRepository;
//!
//! async fn setup_db() -> Result<SqlDeviceRegistrationRepository, Box<dyn std::error::Error>> {
//!     let db_client = DbClient::from_url("sqlite://database.db").await?;
//!     init_schema(&db_client).await?;
//!     Ok(SqlRepositoryFactory::new().create_repository(db_client))
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;
pub mod repository;

pub use client::DbClient;
pub use error::DbError;
pub use repository::RepositoryFactory;

pub use repositories::{
    init_schema, SqlDeviceRegistrationRepository, SqlLastEventRepository, SqlRepositoryFactory,
};
