//! Store operations, grouped by resource. Every method that touches more
//! than one collection runs inside a single transaction.

mod access;
mod courses;
mod progress;
mod stats;
mod users;

use learnhub_config::{LearnhubConfig, PasswordConfig};
use sea_orm::{DatabaseConnection, DbErr};

use crate::connect::{connect, in_memory_config};
use crate::error::StoreError;
use crate::password::Argon2Hasher;
use crate::schema::create_tables;

#[derive(Debug, Clone)]
pub struct Store {
    db: DatabaseConnection,
    hasher: Argon2Hasher,
}

impl Store {
    pub fn new(db: DatabaseConnection, hasher: Argon2Hasher) -> Self {
        Self { db, hasher }
    }

    /// Connect with `config` and create any missing tables.
    pub async fn open(config: &LearnhubConfig) -> Result<Self, StoreError> {
        let db = connect(config.database()).await?;
        create_tables(&db).await?;
        Ok(Self::new(db, Argon2Hasher::new(config.password())?))
    }

    /// Fresh, empty store backed by in-memory SQLite with cheap hashing.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let db = connect(&in_memory_config()).await?;
        create_tables(&db).await?;
        Ok(Self::new(db, Argon2Hasher::new(PasswordConfig::minimal())?))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.db.ping().await?;
        Ok(())
    }

    pub async fn close(self) -> Result<(), StoreError> {
        self.db.close().await.map_err(StoreError::from)
    }
}

/// Outcome of an insert-on-conflict-do-nothing: whether a row was written.
pub(crate) fn inserted(result: Result<u64, DbErr>) -> Result<bool, DbErr> {
    match result {
        Ok(rows) => Ok(rows > 0),
        Err(DbErr::RecordNotInserted) => Ok(false),
        Err(e) => Err(e),
    }
}
