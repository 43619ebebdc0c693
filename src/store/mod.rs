//! Persistence for creations
//!
//! Records are written once by the pipeline and afterwards only touched by
//! journal updates. Backed by an S3-compatible bucket in production and by an
//! in-memory map for dry runs and tests.

pub mod memory;
pub mod object;

pub use memory::MemoryCreationStore;
pub use object::ObjectCreationStore;

use crate::models::Creation;
use crate::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait CreationStore: Send + Sync {
    /// Persist a complete record in a single write.
    async fn insert(&self, creation: &Creation) -> Result<()>;

    async fn find_by_id_and_owner(&self, id: Uuid, owner: &str) -> Result<Option<Creation>>;

    /// Set the journal entry and bump `updated_at`. Returns `false` when no
    /// record with this id belongs to `owner`.
    async fn update_journal(&self, id: Uuid, owner: &str, text: &str) -> Result<bool>;

    /// All records of `owner`, newest first.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Creation>>;
}

/// Order records newest first; ties keep their incoming order.
pub(crate) fn sort_newest_first(creations: &mut [Creation]) {
    creations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
