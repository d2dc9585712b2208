use reelbot_core::types::UserRecord;

use crate::collection::{run_blocking, Collection, InsertOutcome, KeyedCollection, Record};
use crate::db::Store;
use crate::error::Result;

impl Record for UserRecord {
    const COLLECTION: Collection = Collection::Users;

    fn key(&self) -> String {
        self.sender_id.to_string()
    }
}

/// Users who have sent the start command, keyed by sender id.
#[derive(Clone)]
pub struct UserRepo {
    users: KeyedCollection<UserRecord>,
}

impl UserRepo {
    pub fn new(store: Store) -> Self {
        Self {
            users: KeyedCollection::new(store),
        }
    }

    /// Record a sender once. Repeated registrations are `AlreadyExists`.
    pub async fn register(&self, record: UserRecord) -> Result<InsertOutcome> {
        let users = self.users.clone();
        run_blocking(move || users.insert_if_absent(&record)).await
    }

    pub async fn find(&self, sender_id: i64) -> Result<Option<UserRecord>> {
        let users = self.users.clone();
        run_blocking(move || users.find_one(&sender_id.to_string())).await
    }

    pub async fn count(&self) -> Result<u64> {
        let users = self.users.clone();
        run_blocking(move || users.count()).await
    }
}
