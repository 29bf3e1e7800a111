use std::{ops::Deref, time::Duration};

use migration::Migrator;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbErr,
    Statement, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;

use crate::error::AppResult;

pub async fn connect_and_migrate(
    database_url: &str,
    max_connections: u32,
) -> AppResult<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url.to_string());
    // Every pooled connection to `:memory:` would see its own empty database.
    let max_connections = if database_url.contains(":memory:") { 1 } else { max_connections.max(1) };
    opt.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA journal_mode=WAL".to_string(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA synchronous=NORMAL".to_string(),
    ))
    .await?;

    Migrator::up(&db, None).await?;

    tracing::info!(max_connections, "database connected and schema ensured");
    Ok(db)
}

/// A storage transaction scoped to one request.
///
/// Dropping the session without calling [`Session::commit`] rolls back every
/// write made through it, so an early return on error leaves storage untouched.
pub struct Session {
    txn: DatabaseTransaction,
}

impl Session {
    pub async fn open(db: &DatabaseConnection) -> Result<Self, DbErr> {
        Ok(Self { txn: db.begin().await? })
    }

    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }
}

impl Deref for Session {
    type Target = DatabaseTransaction;

    fn deref(&self) -> &Self::Target {
        &self.txn
    }
}
