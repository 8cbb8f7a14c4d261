//! Shared organization directory domain primitives.
//!
//! This crate owns record shapes, input validation, the request error
//! taxonomy, queue event decoding, and partial-update expression building.
//! It intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod contract;
pub mod error;
pub mod events;
pub mod update_expression;
pub mod validation;
