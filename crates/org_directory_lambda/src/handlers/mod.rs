pub mod constraints;
pub mod http;
pub mod organizations;
pub mod queue;
pub mod users;

/// Fresh opaque record identifier.
pub(crate) fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
