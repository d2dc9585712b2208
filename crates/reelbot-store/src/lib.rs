pub mod artifacts;
pub mod collection;
pub mod db;
pub mod error;
pub mod users;

pub use artifacts::ArtifactRepo;
pub use collection::{Collection, InsertOutcome, KeyedCollection, Record};
pub use db::Store;
pub use error::StoreError;
pub use users::UserRepo;
