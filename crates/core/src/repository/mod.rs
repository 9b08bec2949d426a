//! Storage contract for villas.
//!
//! The service only ever talks to `dyn VillaRepository`, so swapping the
//! in-memory backend for PostgreSQL never changes call-site behaviour.

pub mod memory;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::DbId;
use crate::villa::Villa;

pub use memory::InMemoryVillaRepo;

/// Capability set every villa storage backend implements.
///
/// Each method is atomic with respect to the others: backends either hold a
/// single lock for the whole call or run a single SQL statement.
#[async_trait]
pub trait VillaRepository: Send + Sync + 'static {
    /// All stored villas, ordered by id.
    async fn list_all(&self) -> Result<Vec<Villa>, CoreError>;

    /// Look up a villa by id. `None` if absent.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Villa>, CoreError>;

    /// Look up a villa by name, optionally ignoring case.
    async fn find_by_name(
        &self,
        name: &str,
        case_insensitive: bool,
    ) -> Result<Option<Villa>, CoreError>;

    /// Store a new villa and return the id assigned to it.
    ///
    /// The `id` on the input is ignored. Assigned ids are always positive
    /// and unused at the time of insertion.
    async fn insert(&self, villa: &Villa) -> Result<DbId, CoreError>;

    /// Overwrite every mutable field of the villa with `villa.id`.
    ///
    /// Fails with [`CoreError::NotFound`] if no such villa exists.
    async fn replace(&self, villa: &Villa) -> Result<(), CoreError>;

    /// Delete the villa with `id`. Returns `true` if a row was removed.
    async fn remove(&self, id: DbId) -> Result<bool, CoreError>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> Result<(), CoreError>;

    /// Short backend label for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}
