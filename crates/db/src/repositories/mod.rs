//! Repository layer.
//!
//! Each repository wraps a `PgPool` and implements the matching storage
//! trait from `villa_core`.

pub mod villa_repo;

pub use villa_repo::PgVillaRepo;
