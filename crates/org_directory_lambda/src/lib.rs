//! AWS-oriented adapters and handlers for the organization directory.
//!
//! This crate owns runtime integration details (Lambda handlers, HTTP and
//! queue envelopes, DynamoDB access) and the operations composed from the
//! domain primitives in `org_directory_core`.

pub mod adapters;
pub mod config;
pub mod handlers;

#[cfg(test)]
pub(crate) mod test_support;
