//! Villa resource-management engine.
//!
//! Domain model and wire DTO, the partial-update patch engine, the
//! storage-agnostic [`repository::VillaRepository`] contract with its
//! in-memory backend, and the [`service::VillaService`] that enforces the
//! request contract for every CRUD operation.

pub mod error;
pub mod patch;
pub mod repository;
pub mod service;
pub mod types;
pub mod villa;
