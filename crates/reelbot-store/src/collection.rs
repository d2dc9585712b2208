//! Generic keyed collection: insert-if-absent, point lookup and uniform
//! random sampling over one table.

use std::fmt;
use std::marker::PhantomData;

use rusqlite::{Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::db::Store;
use crate::error::{Result, StoreError};

/// The collections this store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Artifacts,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Users, Collection::Artifacts];

    /// Backing table. Only these literals are ever interpolated into SQL.
    pub fn table(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Artifacts => "artifacts",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A document type stored in exactly one collection under a unique key.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;

    /// Dedup key. Two records with the same key are the same record.
    fn key(&self) -> String;
}

/// Result of [`KeyedCollection::insert_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

impl InsertOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            InsertOutcome::Inserted => "inserted",
            InsertOutcome::AlreadyExists => "already_exists",
        }
    }
}

/// Typed view over one collection. Methods block; call them from
/// `spawn_blocking` (see [`run_blocking`]) inside async code.
pub struct KeyedCollection<R> {
    store: Store,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for KeyedCollection<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> KeyedCollection<R> {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    pub fn collection(&self) -> Collection {
        R::COLLECTION
    }

    /// Store `record` unless one with the same key exists.
    ///
    /// The lookup is only a fast path. Two callers can both miss it; the
    /// UNIQUE constraint then rejects the second INSERT and that rejection is
    /// reported as `AlreadyExists`.
    pub fn insert_if_absent(&self, record: &R) -> Result<InsertOutcome> {
        let key = record.key();
        let conn = self.store.connect()?;

        if lookup_document(&conn, R::COLLECTION, &key)?.is_some() {
            debug!(collection = %R::COLLECTION, key = %key, "record already exists");
            return Ok(InsertOutcome::AlreadyExists);
        }

        self.try_insert(&conn, &key, record)
    }

    /// Single-statement INSERT with the constraint violation normalised.
    fn try_insert(&self, conn: &Connection, key: &str, record: &R) -> Result<InsertOutcome> {
        let document = serde_json::to_string(record).map_err(|source| {
            StoreError::Serialization {
                collection: R::COLLECTION.table(),
                source,
            }
        })?;
        let now = chrono::Utc::now().to_rfc3339();

        let sql = format!(
            "INSERT INTO {} (record_key, document, created_at) VALUES (?1, ?2, ?3)",
            R::COLLECTION.table()
        );
        match conn.execute(&sql, rusqlite::params![key, document, now]) {
            Ok(_) => {
                debug!(collection = %R::COLLECTION, key = %key, "record inserted");
                Ok(InsertOutcome::Inserted)
            }
            Err(e) if is_unique_violation(&e) => {
                debug!(collection = %R::COLLECTION, key = %key, "lost insert race");
                Ok(InsertOutcome::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Point lookup by key.
    pub fn find_one(&self, key: &str) -> Result<Option<R>> {
        let conn = self.store.connect()?;
        lookup_document(&conn, R::COLLECTION, key)?
            .map(|doc| decode::<R>(&doc))
            .transpose()
    }

    /// One record chosen uniformly at random, or `None` when empty.
    pub fn sample_one(&self) -> Result<Option<R>> {
        let conn = self.store.connect()?;
        let sql = format!(
            "SELECT document FROM {} ORDER BY RANDOM() LIMIT 1",
            R::COLLECTION.table()
        );
        conn.query_row(&sql, [], |row| row.get::<_, String>(0))
            .optional()?
            .map(|doc| decode::<R>(&doc))
            .transpose()
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.store.connect()?;
        let sql = format!("SELECT COUNT(*) FROM {}", R::COLLECTION.table());
        let n: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }
}

fn lookup_document(conn: &Connection, collection: Collection, key: &str) -> Result<Option<String>> {
    let sql = format!(
        "SELECT document FROM {} WHERE record_key = ?1",
        collection.table()
    );
    Ok(conn
        .query_row(&sql, rusqlite::params![key], |row| row.get(0))
        .optional()?)
}

fn decode<R: Record>(document: &str) -> Result<R> {
    serde_json::from_str(document).map_err(|source| StoreError::Serialization {
        collection: R::COLLECTION.table(),
        source,
    })
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
                && (err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}

/// Run a blocking store call on Tokio's blocking pool.
///
/// The closure owns everything it touches, so dropping the awaiting future
/// does not abort a write that is already in flight.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: String,
    }

    impl Record for Note {
        const COLLECTION: Collection = Collection::Artifacts;
        fn key(&self) -> String {
            self.id.clone()
        }
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: id.to_string(),
            body: body.to_string(),
        }
    }

    fn collection() -> (tempfile::TempDir, KeyedCollection<Note>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("reel.db"), Duration::from_secs(1)).unwrap();
        (dir, KeyedCollection::new(store))
    }

    #[test]
    fn first_insert_wins_and_is_not_overwritten() {
        let (_dir, notes) = collection();
        assert_eq!(
            notes.insert_if_absent(&note("a", "first")).unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            notes.insert_if_absent(&note("a", "second")).unwrap(),
            InsertOutcome::AlreadyExists
        );
        assert_eq!(notes.find_one("a").unwrap(), Some(note("a", "first")));
        assert_eq!(notes.count().unwrap(), 1);
    }

    #[test]
    fn constraint_violation_is_already_exists() {
        // Skips the lookup, as a racing caller that lost would.
        let (_dir, notes) = collection();
        let conn = notes.store.connect().unwrap();
        let n = note("k", "x");
        assert_eq!(
            notes.try_insert(&conn, "k", &n).unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            notes.try_insert(&conn, "k", &n).unwrap(),
            InsertOutcome::AlreadyExists
        );
        assert_eq!(notes.count().unwrap(), 1);
    }

    #[test]
    fn find_one_missing_is_none() {
        let (_dir, notes) = collection();
        assert_eq!(notes.find_one("nope").unwrap(), None);
    }

    #[test]
    fn sample_one_empty_is_none() {
        let (_dir, notes) = collection();
        assert_eq!(notes.sample_one().unwrap(), None);
    }

    #[test]
    fn corrupt_document_is_serialization_error() {
        let (_dir, notes) = collection();
        let conn = notes.store.connect().unwrap();
        conn.execute(
            "INSERT INTO artifacts (record_key, document, created_at) VALUES ('bad', '{', 'now')",
            [],
        )
        .unwrap();
        assert!(matches!(
            notes.find_one("bad"),
            Err(StoreError::Serialization { collection: "artifacts", .. })
        ));
    }
}
