//! Villa resource service.
//!
//! Owns the request contract for every CRUD operation: input validation,
//! the name-uniqueness rule, identity assignment through the repository,
//! and stage-then-commit partial updates. Storage is reached only through
//! [`VillaRepository`], so the same service runs over either backend.

use std::sync::Arc;

use crate::error::CoreError;
use crate::patch::{apply_patch, PatchOperation};
use crate::repository::VillaRepository;
use crate::types::DbId;
use crate::villa::{Villa, VillaDto, ENTITY_NAME};

/// CRUD orchestration over a shared [`VillaRepository`].
///
/// Cheap to clone; clones share the same backend.
#[derive(Clone)]
pub struct VillaService {
    repo: Arc<dyn VillaRepository>,
}

impl VillaService {
    pub fn new(repo: Arc<dyn VillaRepository>) -> Self {
        Self { repo }
    }

    /// Label of the active storage backend.
    pub fn backend_name(&self) -> &'static str {
        self.repo.backend_name()
    }

    /// Whether the storage backend is reachable.
    pub async fn health_check(&self) -> Result<(), CoreError> {
        self.repo.health_check().await
    }

    /// Every stored villa, unfiltered.
    pub async fn list(&self) -> Result<Vec<VillaDto>, CoreError> {
        let villas = self.repo.list_all().await?;
        tracing::debug!(count = villas.len(), "Listing villas");
        Ok(villas.into_iter().map(VillaDto::from).collect())
    }

    /// Fetch one villa.
    pub async fn get(&self, id: DbId) -> Result<VillaDto, CoreError> {
        require_id(id)?;
        let villa = self.find_existing(id).await?;
        Ok(villa.into())
    }

    /// Create a villa and return it with its newly assigned id.
    ///
    /// The caller must not pre-assign an id; a populated id is treated as a
    /// server-side inconsistency rather than a client error.
    pub async fn create(&self, dto: Option<VillaDto>) -> Result<VillaDto, CoreError> {
        let dto = dto.ok_or_else(|| {
            tracing::warn!("Rejected villa create with empty body");
            CoreError::invalid("Villa body is required")
        })?;

        if self.repo.find_by_name(&dto.name, true).await?.is_some() {
            tracing::warn!(name = %dto.name, "Rejected duplicate villa name");
            return Err(CoreError::Conflict("Villa already exists".to_string()));
        }

        if dto.id != 0 {
            tracing::error!(villa_id = dto.id, "Villa create received a pre-assigned id");
            return Err(CoreError::Internal(format!(
                "Villa id must not be set on create (got {})",
                dto.id
            )));
        }

        require_valid(&dto)?;

        let villa = Villa::from(dto);
        let id = self.repo.insert(&villa).await?;
        tracing::info!(villa_id = id, name = %villa.name, "Villa created");

        Ok(VillaDto::from(Villa { id, ..villa }))
    }

    /// Delete a villa.
    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        require_id(id)?;
        self.find_existing(id).await?;

        if !self.repo.remove(id).await? {
            // Removed by a concurrent request between the lookup and the delete.
            return Err(not_found(id));
        }
        tracing::info!(villa_id = id, "Villa deleted");
        Ok(())
    }

    /// Replace every field of an existing villa with `dto`.
    pub async fn full_update(&self, id: DbId, dto: Option<VillaDto>) -> Result<(), CoreError> {
        let dto = dto.ok_or_else(|| CoreError::invalid("Villa body is required"))?;
        if dto.id != id {
            tracing::warn!(villa_id = id, body_id = dto.id, "Villa update id mismatch");
            return Err(CoreError::invalid(format!(
                "Path id {id} does not match body id {}",
                dto.id
            )));
        }

        require_valid(&dto)?;
        self.require_unique_name(id, &dto.name).await?;

        self.repo.replace(&Villa::from(dto)).await?;
        tracing::info!(villa_id = id, "Villa replaced");
        Ok(())
    }

    /// Apply patch operations to an existing villa.
    ///
    /// The patch is applied to a detached copy. Nothing is written unless
    /// every operation succeeds and the result passes validation.
    pub async fn partial_update(
        &self,
        id: DbId,
        operations: Option<Vec<PatchOperation>>,
    ) -> Result<(), CoreError> {
        let operations =
            operations.ok_or_else(|| CoreError::invalid("Patch document is required"))?;
        require_id(id)?;

        let current = VillaDto::from(self.find_existing(id).await?);

        let staged = apply_patch(&current, &operations).map_err(|errors| {
            tracing::warn!(villa_id = id, failed = errors.len(), "Rejected villa patch");
            CoreError::invalid_with_details(
                "Patch document is invalid",
                errors.iter().map(ToString::to_string).collect(),
            )
        })?;

        if staged.id != id {
            return Err(CoreError::invalid("Villa id cannot be changed"));
        }
        require_valid(&staged)?;
        if staged == current {
            tracing::debug!(villa_id = id, "Villa patch made no changes");
            return Ok(());
        }
        self.require_unique_name(id, &staged.name).await?;

        self.repo.replace(&Villa::from(staged)).await?;
        tracing::info!(villa_id = id, ops = operations.len(), "Villa patched");
        Ok(())
    }

    async fn find_existing(&self, id: DbId) -> Result<Villa, CoreError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    async fn require_unique_name(&self, id: DbId, name: &str) -> Result<(), CoreError> {
        match self.repo.find_by_name(name, true).await? {
            Some(other) if other.id != id => {
                tracing::warn!(villa_id = id, other_id = other.id, "Villa name collision");
                Err(CoreError::Conflict("Villa already exists".to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn require_id(id: DbId) -> Result<(), CoreError> {
    if id == 0 {
        tracing::warn!("Rejected villa request with id 0");
        return Err(CoreError::invalid("Villa id must be non-zero"));
    }
    Ok(())
}

fn require_valid(dto: &VillaDto) -> Result<(), CoreError> {
    let problems = dto.validation_errors();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(CoreError::invalid_with_details("Villa is invalid", problems))
    }
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: ENTITY_NAME,
        id,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::repository::InMemoryVillaRepo;
    use crate::villa::seed_villas;

    fn dto(id: DbId, name: &str, occupancy: i32, square_footage: i32) -> VillaDto {
        VillaDto {
            id,
            name: name.to_string(),
            occupancy,
            square_footage,
        }
    }

    /// Service over a store holding only `{1, "Pool View", 4, 100}`.
    fn pool_view_service() -> VillaService {
        let villas = seed_villas().into_iter().filter(|v| v.id == 1);
        VillaService::new(Arc::new(InMemoryVillaRepo::with_villas(villas)))
    }

    fn empty_service() -> VillaService {
        VillaService::new(Arc::new(InMemoryVillaRepo::new()))
    }

    // -- list / get ----------------------------------------------------------

    #[tokio::test]
    async fn list_returns_everything() {
        let service = VillaService::new(Arc::new(InMemoryVillaRepo::with_villas(seed_villas())));
        let villas = service.list().await.unwrap();
        assert_eq!(villas.len(), 2);
        assert_eq!(villas[0].name, "Pool View");
        assert_eq!(villas[1].name, "Beach View");
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() {
        assert!(empty_service().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_zero_is_invalid_regardless_of_contents() {
        assert_matches!(
            empty_service().get(0).await,
            Err(CoreError::InvalidArgument { .. })
        );
        assert_matches!(
            pool_view_service().get(0).await,
            Err(CoreError::InvalidArgument { .. })
        );
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        assert_matches!(
            pool_view_service().get(42).await,
            Err(CoreError::NotFound { entity: "Villa", id: 42 })
        );
    }

    // -- create --------------------------------------------------------------

    #[tokio::test]
    async fn create_assigns_next_id() {
        let service = pool_view_service();
        let created = service
            .create(Some(dto(0, "Beach View", 3, 300)))
            .await
            .unwrap();
        assert_eq!(created, dto(2, "Beach View", 3, 300));
        assert_eq!(service.get(2).await.unwrap(), created);
    }

    #[tokio::test]
    async fn created_ids_are_fresh_and_positive() {
        let service = empty_service();
        let mut seen = Vec::new();
        for i in 0..5 {
            let created = service
                .create(Some(dto(0, &format!("Villa {i}"), 1, 1)))
                .await
                .unwrap();
            assert!(created.id > 0);
            assert!(!seen.contains(&created.id));
            seen.push(created.id);
        }
    }

    #[tokio::test]
    async fn create_without_body_is_invalid() {
        assert_matches!(
            empty_service().create(None).await,
            Err(CoreError::InvalidArgument { .. })
        );
    }

    #[tokio::test]
    async fn create_duplicate_name_differing_in_case_conflicts() {
        let service = empty_service();
        service.create(Some(dto(0, "Sea Breeze", 2, 80))).await.unwrap();
        assert_matches!(
            service.create(Some(dto(0, "SEA breeze", 2, 80))).await,
            Err(CoreError::Conflict(_))
        );
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn create_with_preset_id_is_internal() {
        let service = empty_service();
        assert_matches!(
            service.create(Some(dto(9, "Preset", 2, 80))).await,
            Err(CoreError::Internal(_))
        );
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_reports_every_invalid_field() {
        let err = empty_service()
            .create(Some(dto(0, "", 0, 0)))
            .await
            .unwrap_err();
        assert_eq!(err.details().len(), 3);
    }

    // -- delete --------------------------------------------------------------

    #[tokio::test]
    async fn delete_zero_is_invalid() {
        assert_matches!(
            pool_view_service().delete(0).await,
            Err(CoreError::InvalidArgument { .. })
        );
    }

    #[tokio::test]
    async fn delete_removes_then_not_found() {
        let service = pool_view_service();
        service.delete(1).await.unwrap();
        assert_matches!(service.get(1).await, Err(CoreError::NotFound { .. }));
        assert_matches!(service.delete(1).await, Err(CoreError::NotFound { .. }));
    }

    // -- full update ---------------------------------------------------------

    #[tokio::test]
    async fn full_update_overwrites_every_field() {
        let service = pool_view_service();
        service
            .full_update(1, Some(dto(1, "Pool House", 10, 900)))
            .await
            .unwrap();
        assert_eq!(service.get(1).await.unwrap(), dto(1, "Pool House", 10, 900));
    }

    #[tokio::test]
    async fn full_update_id_mismatch_is_invalid_and_does_not_mutate() {
        let service = pool_view_service();
        assert_matches!(
            service.full_update(1, Some(dto(2, "Other", 5, 5))).await,
            Err(CoreError::InvalidArgument { .. })
        );
        assert_eq!(service.get(1).await.unwrap(), dto(1, "Pool View", 4, 100));
    }

    #[tokio::test]
    async fn full_update_without_body_is_invalid() {
        assert_matches!(
            pool_view_service().full_update(1, None).await,
            Err(CoreError::InvalidArgument { .. })
        );
    }

    #[tokio::test]
    async fn full_update_missing_is_not_found() {
        assert_matches!(
            pool_view_service()
                .full_update(5, Some(dto(5, "Nowhere", 1, 1)))
                .await,
            Err(CoreError::NotFound { id: 5, .. })
        );
    }

    #[tokio::test]
    async fn full_update_cannot_steal_another_name() {
        let service = VillaService::new(Arc::new(InMemoryVillaRepo::with_villas(seed_villas())));
        assert_matches!(
            service
                .full_update(1, Some(dto(1, "beach view", 4, 100)))
                .await,
            Err(CoreError::Conflict(_))
        );
    }

    // -- partial update ------------------------------------------------------

    #[tokio::test]
    async fn patch_replaces_single_field() {
        let service = pool_view_service();
        service
            .partial_update(1, Some(vec![PatchOperation::replace("/occupancy", json!(6))]))
            .await
            .unwrap();
        assert_eq!(service.get(1).await.unwrap(), dto(1, "Pool View", 6, 100));
    }

    #[tokio::test]
    async fn patch_with_one_bad_op_leaves_entity_unchanged() {
        let service = pool_view_service();
        let ops = vec![
            PatchOperation::replace("/occupancy", json!(6)),
            PatchOperation::replace("/name", json!("Renamed")),
            PatchOperation::replace("/doesNotExist", json!(1)),
            PatchOperation::replace("/squareFootage", json!(150)),
        ];

        let err = service.partial_update(1, Some(ops)).await.unwrap_err();
        assert_matches!(err, CoreError::InvalidArgument { .. });
        assert_eq!(err.details().len(), 1);
        assert_eq!(service.get(1).await.unwrap(), dto(1, "Pool View", 4, 100));
    }

    #[tokio::test]
    async fn patch_without_ops_or_with_zero_id_is_invalid() {
        let service = pool_view_service();
        assert_matches!(
            service.partial_update(1, None).await,
            Err(CoreError::InvalidArgument { .. })
        );
        assert_matches!(
            service.partial_update(0, Some(Vec::new())).await,
            Err(CoreError::InvalidArgument { .. })
        );
    }

    #[tokio::test]
    async fn patch_missing_is_not_found() {
        assert_matches!(
            pool_view_service()
                .partial_update(3, Some(vec![PatchOperation::replace("/occupancy", json!(2))]))
                .await,
            Err(CoreError::NotFound { id: 3, .. })
        );
    }

    #[tokio::test]
    async fn patch_cannot_change_id() {
        let service = pool_view_service();
        assert_matches!(
            service
                .partial_update(1, Some(vec![PatchOperation::replace("/id", json!(7))]))
                .await,
            Err(CoreError::InvalidArgument { .. })
        );
        assert!(service.get(1).await.is_ok());
    }

    #[tokio::test]
    async fn patch_result_must_pass_validation() {
        let service = pool_view_service();
        let err = service
            .partial_update(1, Some(vec![PatchOperation::replace("/occupancy", json!(0))]))
            .await
            .unwrap_err();
        assert_eq!(err.details(), ["occupancy must be at least 1".to_string()]);
        assert_eq!(service.get(1).await.unwrap().occupancy, 4);
    }

    #[tokio::test]
    async fn patch_rename_to_existing_name_conflicts() {
        let service = VillaService::new(Arc::new(InMemoryVillaRepo::with_villas(seed_villas())));
        assert_matches!(
            service
                .partial_update(2, Some(vec![PatchOperation::replace("/name", json!("POOL VIEW"))]))
                .await,
            Err(CoreError::Conflict(_))
        );
    }

    #[tokio::test]
    async fn empty_patch_is_a_no_op() {
        let service = pool_view_service();
        service.partial_update(1, Some(Vec::new())).await.unwrap();
        assert_eq!(service.get(1).await.unwrap(), dto(1, "Pool View", 4, 100));
    }
}
