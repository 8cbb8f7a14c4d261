//! Read-only existence checks run ahead of a write.
//!
//! Each check is one store query with no side effects. A concurrent request
//! can still create a conflicting record between the check and the write.

use crate::adapters::directory_store::{DirectoryStore, StoreError};

pub fn organization_exists_by_id(
    store: &dyn DirectoryStore,
    organization_id: &str,
) -> Result<bool, StoreError> {
    Ok(store.get_organization(organization_id)?.is_some())
}

pub fn organization_exists_by_name(
    store: &dyn DirectoryStore,
    name: &str,
) -> Result<bool, StoreError> {
    Ok(!store.query_organizations_by_name(name)?.is_empty())
}

/// True when an organization other than `organization_id` already uses `name`.
pub fn organization_name_taken_by_other(
    store: &dyn DirectoryStore,
    name: &str,
    organization_id: &str,
) -> Result<bool, StoreError> {
    Ok(store
        .query_organizations_by_name(name)?
        .iter()
        .any(|organization| organization.organization_id != organization_id))
}

pub fn user_exists_by_email(
    store: &dyn DirectoryStore,
    email: &str,
    exclude_user_id: Option<&str>,
) -> Result<bool, StoreError> {
    Ok(store
        .query_users_by_email(email)?
        .iter()
        .any(|user| Some(user.user_id.as_str()) != exclude_user_id))
}
