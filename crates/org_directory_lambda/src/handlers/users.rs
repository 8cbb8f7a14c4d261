use org_directory_core::contract::{User, NO_FIELDS_TO_UPDATE};
use org_directory_core::error::RequestError;
use org_directory_core::validation::{validate_create_user, validate_update_user};
use serde_json::Value;
use tracing::info;

use crate::adapters::directory_store::DirectoryStore;
use crate::handlers::constraints::{organization_exists_by_id, user_exists_by_email};
use crate::handlers::new_record_id;

pub fn create_user(store: &dyn DirectoryStore, payload: &Value) -> Result<User, RequestError> {
    let input = validate_create_user(payload)?;

    if !organization_exists_by_id(store, &input.organization_id)? {
        return Err(RequestError::missing_reference(format!(
            "Organization with id {} does not exist",
            input.organization_id
        )));
    }

    if user_exists_by_email(store, &input.email, None)? {
        return Err(RequestError::conflict(format!(
            "User with email {} already exists",
            input.email
        )));
    }

    let user = input.into_user(new_record_id());
    store.put_user(&user)?;

    info!(
        user_id = %user.user_id,
        organization_id = %user.organization_id,
        "user created"
    );
    Ok(user)
}

pub fn update_user(store: &dyn DirectoryStore, payload: &Value) -> Result<User, RequestError> {
    let input = validate_update_user(payload)?;

    if !organization_exists_by_id(store, &input.organization_id)? {
        return Err(RequestError::missing_reference(format!(
            "Organization with id {} not found",
            input.organization_id
        )));
    }

    let Some(existing) = store.get_user(&input.user_id)? else {
        return Err(RequestError::not_found(format!(
            "User with id {} not found",
            input.user_id
        )));
    };

    if existing.organization_id != input.organization_id {
        return Err(RequestError::forbidden(format!(
            "Organization with id {} not found",
            input.organization_id
        )));
    }

    if input.changes.is_empty() {
        return Err(RequestError::validation(NO_FIELDS_TO_UPDATE));
    }

    if let Some(email) = &input.changes.email {
        if user_exists_by_email(store, email, Some(&input.user_id))? {
            return Err(RequestError::conflict(format!(
                "User with email {email} already exists"
            )));
        }
    }

    let user = store.update_user(&input.user_id, &input.changes)?;

    info!(
        user_id = %user.user_id,
        organization_id = %user.organization_id,
        "user updated"
    );
    Ok(user)
}
