use reelbot_core::types::ArtifactRecord;

use crate::collection::{run_blocking, Collection, InsertOutcome, KeyedCollection, Record};
use crate::db::Store;
use crate::error::Result;

impl Record for ArtifactRecord {
    const COLLECTION: Collection = Collection::Artifacts;

    fn key(&self) -> String {
        self.content_id.clone()
    }
}

/// Channel videos, keyed by the platform's unique content id.
#[derive(Clone)]
pub struct ArtifactRepo {
    artifacts: KeyedCollection<ArtifactRecord>,
}

impl ArtifactRepo {
    pub fn new(store: Store) -> Self {
        Self {
            artifacts: KeyedCollection::new(store),
        }
    }

    /// Store a video once per content id; reposts are `AlreadyExists`.
    pub async fn ingest(&self, record: ArtifactRecord) -> Result<InsertOutcome> {
        let artifacts = self.artifacts.clone();
        run_blocking(move || artifacts.insert_if_absent(&record)).await
    }

    /// A uniformly random stored video, or `None` if nothing has been posted.
    pub async fn sample(&self) -> Result<Option<ArtifactRecord>> {
        let artifacts = self.artifacts.clone();
        run_blocking(move || artifacts.sample_one()).await
    }

    pub async fn find(&self, content_id: &str) -> Result<Option<ArtifactRecord>> {
        let artifacts = self.artifacts.clone();
        let content_id = content_id.to_string();
        run_blocking(move || artifacts.find_one(&content_id)).await
    }

    pub async fn count(&self) -> Result<u64> {
        let artifacts = self.artifacts.clone();
        run_blocking(move || artifacts.count()).await
    }
}
