//! Villa row model.

use serde::Serialize;
use sqlx::FromRow;
use villa_core::types::DbId;
use villa_core::villa::Villa;

/// A row from the `villas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VillaRow {
    pub id: DbId,
    pub name: String,
    pub occupancy: i32,
    pub square_footage: i32,
}

impl From<VillaRow> for Villa {
    fn from(row: VillaRow) -> Self {
        Villa {
            id: row.id,
            name: row.name,
            occupancy: row.occupancy,
            square_footage: row.square_footage,
        }
    }
}
