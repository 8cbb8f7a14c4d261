use org_directory_core::contract::{Organization, NO_FIELDS_TO_UPDATE};
use org_directory_core::error::RequestError;
use org_directory_core::validation::{validate_create_organization, validate_update_organization};
use serde_json::Value;
use tracing::info;

use crate::adapters::directory_store::DirectoryStore;
use crate::handlers::constraints::{
    organization_exists_by_id, organization_exists_by_name, organization_name_taken_by_other,
};
use crate::handlers::new_record_id;

pub fn create_organization(
    store: &dyn DirectoryStore,
    payload: &Value,
) -> Result<Organization, RequestError> {
    let input = validate_create_organization(payload)?;

    if organization_exists_by_name(store, &input.name)? {
        return Err(RequestError::conflict(format!(
            "Organization with name {} already exists",
            input.name
        )));
    }

    let organization = input.into_organization(new_record_id());
    store.put_organization(&organization)?;

    info!(
        organization_id = %organization.organization_id,
        "organization created"
    );
    Ok(organization)
}

pub fn update_organization(
    store: &dyn DirectoryStore,
    payload: &Value,
) -> Result<Organization, RequestError> {
    let input = validate_update_organization(payload)?;

    if !organization_exists_by_id(store, &input.organization_id)? {
        return Err(RequestError::not_found(format!(
            "Organization with id {} not found",
            input.organization_id
        )));
    }

    if input.changes.is_empty() {
        return Err(RequestError::validation(NO_FIELDS_TO_UPDATE));
    }

    if let Some(name) = &input.changes.name {
        if organization_name_taken_by_other(store, name, &input.organization_id)? {
            return Err(RequestError::conflict(format!(
                "Organization with name {name} already exists"
            )));
        }
    }

    let organization = store.update_organization(&input.organization_id, &input.changes)?;

    info!(
        organization_id = %organization.organization_id,
        "organization updated"
    );
    Ok(organization)
}
