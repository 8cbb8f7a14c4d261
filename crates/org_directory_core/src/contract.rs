//! Record shapes, validated inputs and store attribute names.

use serde::{Deserialize, Serialize};

pub const ORGANIZATION_ID_ATTRIBUTE: &str = "organizationId";
pub const USER_ID_ATTRIBUTE: &str = "userId";
pub const NAME_ATTRIBUTE: &str = "name";
pub const DESCRIPTION_ATTRIBUTE: &str = "description";
pub const EMAIL_ATTRIBUTE: &str = "email";

/// Secondary index on `Organization.name`.
pub const ORGANIZATION_NAME_INDEX: &str = "name-index";
/// Secondary index on `User.email`.
pub const USER_EMAIL_INDEX: &str = "email-index";

pub const NO_FIELDS_TO_UPDATE: &str = "No fields to update";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub organization_id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub organization_id: String,
    pub name: String,
    pub email: String,
}

/// Body of every error response and of the queue batch acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrganizationInput {
    pub name: String,
    pub description: String,
}

impl CreateOrganizationInput {
    pub fn into_organization(self, organization_id: String) -> Organization {
        Organization {
            organization_id,
            name: self.name,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    pub organization_id: String,
    pub name: String,
    pub email: String,
}

impl CreateUserInput {
    pub fn into_user(self, user_id: String) -> User {
        User {
            user_id,
            organization_id: self.organization_id,
            name: self.name,
            email: self.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOrganizationInput {
    pub organization_id: String,
    pub changes: OrganizationChanges,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserInput {
    pub user_id: String,
    pub organization_id: String,
    pub changes: UserChanges,
}

/// Mutable organization fields supplied by an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl OrganizationChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    /// Attribute/value pairs for the fields present, in a stable order.
    pub fn assignments(&self) -> Vec<(&'static str, &str)> {
        let mut assignments = Vec::with_capacity(2);
        if let Some(name) = &self.name {
            assignments.push((NAME_ATTRIBUTE, name.as_str()));
        }
        if let Some(description) = &self.description {
            assignments.push((DESCRIPTION_ATTRIBUTE, description.as_str()));
        }
        assignments
    }

    pub fn apply_to(&self, organization: &mut Organization) {
        if let Some(name) = &self.name {
            organization.name = name.clone();
        }
        if let Some(description) = &self.description {
            organization.description = description.clone();
        }
    }
}

/// Mutable user fields supplied by an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    pub fn assignments(&self) -> Vec<(&'static str, &str)> {
        let mut assignments = Vec::with_capacity(2);
        if let Some(name) = &self.name {
            assignments.push((NAME_ATTRIBUTE, name.as_str()));
        }
        if let Some(email) = &self.email {
            assignments.push((EMAIL_ATTRIBUTE, email.as_str()));
        }
        assignments
    }

    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
    }
}
