//! Shared harness: a temp-file store and a transport that records sends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reelbot_core::config::MessagesConfig;
use reelbot_pipeline::PipelineContext;
use reelbot_store::{ArtifactRepo, Store, UserRepo};
use reelbot_telegram::{DeliveryError, ReplyKeyboard, Transport};

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: i64,
        text: String,
        buttons: Vec<String>,
    },
    Artifact {
        chat_id: i64,
        artifact_ref: String,
    },
}

#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<Sent>>,
    pub fail: AtomicBool,
    pub attempts: Mutex<usize>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    fn attempt(&self, sent: Sent) -> Result<(), DeliveryError> {
        *self.attempts.lock().unwrap() += 1;
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeliveryError::Rejected {
                method: "sendMessage",
                status: 502,
                description: "Bad Gateway".to_string(),
            });
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&ReplyKeyboard>,
    ) -> Result<(), DeliveryError> {
        let buttons = keyboard
            .map(|kb| kb.labels().map(String::from).collect())
            .unwrap_or_default();
        self.attempt(Sent::Text {
            chat_id,
            text: text.to_string(),
            buttons,
        })
    }

    async fn send_artifact(&self, chat_id: i64, artifact_ref: &str) -> Result<(), DeliveryError> {
        self.attempt(Sent::Artifact {
            chat_id,
            artifact_ref: artifact_ref.to_string(),
        })
    }
}

pub struct TestContext {
    pub dir: tempfile::TempDir,
    pub store: Store,
    pub users: UserRepo,
    pub artifacts: ArtifactRepo,
    pub transport: RecordingTransport,
    pub messages: MessagesConfig,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("reel.db"), Duration::from_secs(5)).unwrap();
        Self {
            users: UserRepo::new(store.clone()),
            artifacts: ArtifactRepo::new(store.clone()),
            store,
            transport: RecordingTransport::default(),
            messages: MessagesConfig::default(),
            dir,
        }
    }

    /// Store a document that no longer decodes as an artifact.
    pub fn corrupt_artifact(&self, key: &str) {
        self.store
            .connect()
            .unwrap()
            .execute(
                "INSERT INTO artifacts (record_key, document, created_at) VALUES (?1, '{', '')",
                [key],
            )
            .unwrap();
    }

    /// Make every subsequent store call fail to open its connection.
    pub fn break_store(&self) {
        std::fs::remove_dir_all(self.dir.path()).unwrap();
    }
}

impl PipelineContext for TestContext {
    fn users(&self) -> &UserRepo {
        &self.users
    }
    fn artifacts(&self) -> &ArtifactRepo {
        &self.artifacts
    }
    fn transport(&self) -> &dyn Transport {
        &self.transport
    }
    fn messages(&self) -> &MessagesConfig {
        &self.messages
    }
}
