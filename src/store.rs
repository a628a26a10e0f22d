use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::config::StoreConfig;
use crate::error::{AppError, AppResult};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Handle to the embedded database. One connection, opened lazily on first
/// use and handed to operations one at a time, so multi-step operations
/// never interleave their statements.
pub struct Datastore {
    path: String,
    conn: Mutex<Option<SqliteConnection>>,
}

impl Datastore {
    pub fn new(config: &StoreConfig) -> Datastore {
        Datastore::from_path(config.database_path.clone())
    }

    pub fn from_path(path: impl Into<String>) -> Datastore {
        Datastore {
            path: path.into(),
            conn: Mutex::new(None),
        }
    }

    /// Private throwaway database. The connection is still lazy, so two
    /// in-memory stores never share data.
    pub fn in_memory() -> Datastore {
        Datastore::from_path(":memory:")
    }

    /// Drops the current connection, if any. The next operation reopens.
    pub async fn close(&self) {
        if self.conn.lock().await.take().is_some() {
            info!("database connection closed");
        }
    }

    /// Close-then-reopen, for login/logout boundaries. In-flight state is
    /// whatever the last committed transaction left on disk.
    pub async fn reset_connection(&self) -> AppResult<()> {
        let mut guard = self.conn.lock().await;
        if guard.take().is_some() {
            info!("database connection closed");
        }
        *guard = Some(open_connection(&self.path)?);
        Ok(())
    }

    pub(crate) async fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut guard = self.conn.lock().await;
        let conn = match guard.as_mut() {
            Some(conn) => conn,
            None => guard.insert(open_connection(&self.path)?),
        };
        let result = f(conn);
        if let Err(AppError::Persistence(e)) = &result {
            error!("datastore operation failed: {e:#}");
        }
        result
    }
}

fn open_connection(path: &str) -> AppResult<SqliteConnection> {
    let mut conn = SqliteConnection::establish(path)?;
    conn.batch_execute("PRAGMA foreign_keys = ON;")?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| AppError::Persistence(anyhow::anyhow!("failed to run migrations: {e}")))?;
    info!(path, "database opened");
    Ok(conn)
}
