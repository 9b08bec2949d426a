//! Process-lifetime villa store.
//!
//! All state lives behind one `RwLock`, so the read-max-then-insert id
//! assignment and every mutation are atomic with respect to each other.
//! Name uniqueness is re-checked under the write guard, matching the unique
//! index the PostgreSQL backend relies on.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::repository::VillaRepository;
use crate::types::DbId;
use crate::villa::{names_match, Villa, ENTITY_NAME};

/// Volatile [`VillaRepository`] backed by an ordered map.
///
/// Designed to be wrapped in `Arc` and shared for the life of the process.
pub struct InMemoryVillaRepo {
    villas: RwLock<BTreeMap<DbId, Villa>>,
}

impl InMemoryVillaRepo {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            villas: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a store pre-populated with `villas`, keyed by their ids.
    pub fn with_villas(villas: impl IntoIterator<Item = Villa>) -> Self {
        Self {
            villas: RwLock::new(villas.into_iter().map(|v| (v.id, v)).collect()),
        }
    }

    /// Number of stored villas.
    pub async fn len(&self) -> usize {
        self.villas.read().await.len()
    }

    /// Whether the store holds no villas.
    pub async fn is_empty(&self) -> bool {
        self.villas.read().await.is_empty()
    }
}

impl Default for InMemoryVillaRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn name_taken(villas: &BTreeMap<DbId, Villa>, name: &str, except: DbId) -> bool {
    villas
        .values()
        .any(|v| v.id != except && names_match(&v.name, name))
}

#[async_trait]
impl VillaRepository for InMemoryVillaRepo {
    async fn list_all(&self) -> Result<Vec<Villa>, CoreError> {
        Ok(self.villas.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Villa>, CoreError> {
        Ok(self.villas.read().await.get(&id).cloned())
    }

    async fn find_by_name(
        &self,
        name: &str,
        case_insensitive: bool,
    ) -> Result<Option<Villa>, CoreError> {
        let villas = self.villas.read().await;
        let found = villas.values().find(|v| {
            if case_insensitive {
                names_match(&v.name, name)
            } else {
                v.name == name
            }
        });
        Ok(found.cloned())
    }

    async fn insert(&self, villa: &Villa) -> Result<DbId, CoreError> {
        let mut villas = self.villas.write().await;

        if name_taken(&villas, &villa.name, 0) {
            return Err(CoreError::Conflict(format!(
                "Villa with name '{}' already exists",
                villa.name
            )));
        }

        let id = villas.keys().next_back().map_or(1, |max| max + 1);
        villas.insert(
            id,
            Villa {
                id,
                ..villa.clone()
            },
        );
        tracing::debug!(villa_id = id, "Inserted villa into memory store");
        Ok(id)
    }

    async fn replace(&self, villa: &Villa) -> Result<(), CoreError> {
        let mut villas = self.villas.write().await;

        if !villas.contains_key(&villa.id) {
            return Err(CoreError::NotFound {
                entity: ENTITY_NAME,
                id: villa.id,
            });
        }
        if name_taken(&villas, &villa.name, villa.id) {
            return Err(CoreError::Conflict(format!(
                "Villa with name '{}' already exists",
                villa.name
            )));
        }

        villas.insert(villa.id, villa.clone());
        Ok(())
    }

    async fn remove(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.villas.write().await.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
