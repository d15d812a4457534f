//! Repositories for the two tables owned by the notifier.

pub mod device_registration_sql;
pub mod last_event_sql;
pub mod schema;

pub use device_registration_sql::SqlDeviceRegistrationRepository;
pub use last_event_sql::SqlLastEventRepository;
pub use schema::init_schema;

use crate::{DbClient, RepositoryFactory};

/// Factory building the SQL repositories on top of a shared [`DbClient`].
#[derive(Debug, Clone, Default)]
pub struct SqlRepositoryFactory;

impl SqlRepositoryFactory {
    pub fn new() -> Self {
        Self
    }
}

impl RepositoryFactory<SqlDeviceRegistrationRepository, DbClient> for SqlRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> SqlDeviceRegistrationRepository {
        SqlDeviceRegistrationRepository::new(db_client)
    }
}

impl RepositoryFactory<SqlLastEventRepository, DbClient> for SqlRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> SqlLastEventRepository {
        SqlLastEventRepository::new(db_client)
    }
}
