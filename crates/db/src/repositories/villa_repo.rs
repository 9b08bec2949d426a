//! Repository for the `villas` table.

use async_trait::async_trait;
use sqlx::PgPool;
use villa_core::error::CoreError;
use villa_core::repository::VillaRepository;
use villa_core::types::DbId;
use villa_core::villa::{Villa, ENTITY_NAME};

use crate::error::map_sqlx_error;
use crate::models::villa::VillaRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, occupancy, square_footage";

/// Durable [`VillaRepository`]. Every operation is a single statement.
#[derive(Clone)]
pub struct PgVillaRepo {
    pool: PgPool,
}

impl PgVillaRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VillaRepository for PgVillaRepo {
    async fn list_all(&self) -> Result<Vec<Villa>, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM villas ORDER BY id");
        let rows = sqlx::query_as::<_, VillaRow>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Villa::from).collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Villa>, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM villas WHERE id = $1");
        let row = sqlx::query_as::<_, VillaRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Villa::from))
    }

    async fn find_by_name(
        &self,
        name: &str,
        case_insensitive: bool,
    ) -> Result<Option<Villa>, CoreError> {
        let query = if case_insensitive {
            format!("SELECT {COLUMNS} FROM villas WHERE LOWER(name) = LOWER($1) LIMIT 1")
        } else {
            format!("SELECT {COLUMNS} FROM villas WHERE name = $1 LIMIT 1")
        };
        let row = sqlx::query_as::<_, VillaRow>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Villa::from))
    }

    /// Ids come from the `BIGSERIAL` sequence, so they are never reused.
    async fn insert(&self, villa: &Villa) -> Result<DbId, CoreError> {
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO villas (name, occupancy, square_footage)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&villa.name)
        .bind(villa.occupancy)
        .bind(villa.square_footage)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        tracing::debug!(villa_id = id, "Inserted villa row");
        Ok(id)
    }

    async fn replace(&self, villa: &Villa) -> Result<(), CoreError> {
        let result = sqlx::query(
            "UPDATE villas SET
                name = $2,
                occupancy = $3,
                square_footage = $4
             WHERE id = $1",
        )
        .bind(villa.id)
        .bind(&villa.name)
        .bind(villa.occupancy)
        .bind(villa.square_footage)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound {
                entity: ENTITY_NAME,
                id: villa.id,
            });
        }
        Ok(())
    }

    async fn remove(&self, id: DbId) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM villas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
