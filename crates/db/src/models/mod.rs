//! Row types for the villa tables.

pub mod villa;
