use org_directory_core::contract::{Organization, OrganizationChanges, User, UserChanges};
use org_directory_core::error::RequestError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(String),

    #[error("failed to decode stored item: {0}")]
    Decode(String),
}

impl From<StoreError> for RequestError {
    fn from(error: StoreError) -> Self {
        RequestError::unexpected(error.to_string())
    }
}

/// External key-value store holding organizations and users.
///
/// Each method is a single round trip. Nothing here is transactional, so
/// callers composing reads and writes get advisory checks only.
pub trait DirectoryStore {
    fn get_organization(&self, organization_id: &str) -> Result<Option<Organization>, StoreError>;

    /// Queries the organization name index.
    fn query_organizations_by_name(&self, name: &str) -> Result<Vec<Organization>, StoreError>;

    fn put_organization(&self, organization: &Organization) -> Result<(), StoreError>;

    /// Applies a partial update and returns the stored record afterwards.
    fn update_organization(
        &self,
        organization_id: &str,
        changes: &OrganizationChanges,
    ) -> Result<Organization, StoreError>;

    fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError>;

    /// Queries the user email index.
    fn query_users_by_email(&self, email: &str) -> Result<Vec<User>, StoreError>;

    fn put_user(&self, user: &User) -> Result<(), StoreError>;

    fn update_user(&self, user_id: &str, changes: &UserChanges) -> Result<User, StoreError>;
}
