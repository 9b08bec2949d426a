//! Villa domain entity, its wire DTO, and the mapping between them.
//!
//! The DTO is the only shape that crosses the HTTP boundary. The entity is
//! what repositories store. The two are structurally identical so the
//! conversion in either direction is total and lossless.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::DbId;

/// Entity name used in `NotFound` errors and log fields.
pub const ENTITY_NAME: &str = "Villa";

/// Maximum length (in characters) of a villa name.
pub const MAX_NAME_LEN: u64 = 200;

/// A stored villa.
///
/// `id == 0` means "not yet assigned"; repositories hand out positive ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Villa {
    pub id: DbId,
    pub name: String,
    pub occupancy: i32,
    pub square_footage: i32,
}

/// Request/response body for every villa endpoint.
///
/// `id` defaults to `0` when omitted. `sqft` is accepted on input as an
/// alias for `squareFootage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VillaDto {
    #[serde(default)]
    pub id: DbId,
    #[validate(length(
        min = 1,
        max = 200,
        message = "name must be between 1 and 200 characters"
    ))]
    pub name: String,
    #[validate(range(min = 1, message = "occupancy must be at least 1"))]
    pub occupancy: i32,
    #[serde(alias = "sqft")]
    #[validate(range(min = 1, message = "squareFootage must be at least 1"))]
    pub square_footage: i32,
}

impl VillaDto {
    /// Check the field rules and return every problem found.
    ///
    /// An empty `Vec` means the DTO is acceptable for create/update.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Err(errors) = self.validate() {
            let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
            fields.sort_by(|a, b| a.0.cmp(&b.0));
            for (field, field_errors) in fields {
                for error in field_errors.iter() {
                    match &error.message {
                        Some(message) => problems.push(message.to_string()),
                        None => problems.push(format!("{field}: {}", error.code)),
                    }
                }
            }
        }

        if !self.name.is_empty() && self.name.trim().is_empty() {
            problems.push("name must not be blank".to_string());
        }

        problems
    }
}

/// Case-insensitive name comparison used for the uniqueness rule.
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// The two villas the in-memory backend starts with when seeding is enabled.
pub fn seed_villas() -> Vec<Villa> {
    vec![
        Villa {
            id: 1,
            name: "Pool View".to_string(),
            occupancy: 4,
            square_footage: 100,
        },
        Villa {
            id: 2,
            name: "Beach View".to_string(),
            occupancy: 3,
            square_footage: 300,
        },
    ]
}

/* --------------------------------------------------------------------------
   Mapping
   -------------------------------------------------------------------------- */

impl From<Villa> for VillaDto {
    fn from(villa: Villa) -> Self {
        VillaDto {
            id: villa.id,
            name: villa.name,
            occupancy: villa.occupancy,
            square_footage: villa.square_footage,
        }
    }
}

impl From<VillaDto> for Villa {
    fn from(dto: VillaDto) -> Self {
        Villa {
            id: dto.id,
            name: dto.name,
            occupancy: dto.occupancy,
            square_footage: dto.square_footage,
        }
    }
}
