use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::collection::Collection;
use crate::error::Result;

/// Handle to the SQLite database backing every collection.
///
/// Holds no connection itself: each unit of work opens its own via
/// [`Store::connect`], so concurrent webhook deliveries never queue behind an
/// in-process lock. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<StoreOptions>,
}

#[derive(Debug)]
struct StoreOptions {
    path: PathBuf,
    busy_timeout: Duration,
}

impl Store {
    /// Open the database at `path`, switch it to WAL and run schema
    /// migrations. Safe to call on every startup.
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self> {
        let store = Self {
            inner: Arc::new(StoreOptions {
                path: path.as_ref().to_path_buf(),
                busy_timeout,
            }),
        };
        let conn = store.connect()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        init_db(&conn)?;
        info!(path = %store.inner.path.display(), "store ready");
        Ok(store)
    }

    /// Open a fresh connection for one unit of work.
    pub fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.inner.path)?;
        conn.busy_timeout(self.inner.busy_timeout)?;
        debug!(path = %self.inner.path.display(), "connection opened");
        Ok(conn)
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

/// Create every collection table. Idempotent.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    for collection in Collection::ALL {
        create_collection_table(conn, collection)?;
    }
    Ok(())
}

/// Every collection shares one layout: the identity key is UNIQUE so that a
/// lost check-then-insert race is rejected by SQLite itself.
fn create_collection_table(conn: &Connection, collection: Collection) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            record_key  TEXT NOT NULL UNIQUE,
            document    TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );",
        table = collection.table(),
    ))
}
