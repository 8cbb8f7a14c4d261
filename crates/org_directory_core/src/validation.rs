//! Declarative input schemas for the four mutations.
//!
//! Every schema collects all field violations before failing and returns a
//! typed payload holding only the recognized, trimmed fields.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::contract::{
    CreateOrganizationInput, CreateUserInput, OrganizationChanges, UpdateOrganizationInput,
    UpdateUserInput, UserChanges, DESCRIPTION_ATTRIBUTE, EMAIL_ATTRIBUTE, NAME_ATTRIBUTE,
    ORGANIZATION_ID_ATTRIBUTE, USER_ID_ATTRIBUTE,
};
use crate::error::RequestError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").expect("email pattern should compile")
});

const MESSAGE_SEPARATOR: &str = ". ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldRule {
    /// Opaque identifier, taken verbatim.
    Identifier,
    /// Free text, trimmed.
    Text,
    /// Trimmed and checked against the email pattern.
    Email,
}

struct FieldChecker<'a> {
    input: &'a Map<String, Value>,
    violations: Vec<String>,
}

impl<'a> FieldChecker<'a> {
    fn new(input: &'a Value) -> Result<Self, RequestError> {
        let input = input
            .as_object()
            .ok_or_else(|| RequestError::validation("Request payload must be a JSON object"))?;
        Ok(Self {
            input,
            violations: Vec::new(),
        })
    }

    fn field(&mut self, name: &str, presence: Presence, rule: FieldRule) -> Option<String> {
        let input = self.input;
        let raw = match input.get(name) {
            None => {
                if presence == Presence::Required {
                    self.violations.push(format!("\"{name}\" is required"));
                }
                return None;
            }
            Some(Value::String(raw)) => raw,
            Some(_) => {
                self.violations.push(format!("\"{name}\" must be a string"));
                return None;
            }
        };

        let value = match rule {
            FieldRule::Identifier => raw.as_str(),
            FieldRule::Text | FieldRule::Email => raw.trim(),
        };
        if value.is_empty() {
            self.violations
                .push(format!("\"{name}\" is not allowed to be empty"));
            return None;
        }
        if rule == FieldRule::Email && !EMAIL_PATTERN.is_match(value) {
            self.violations
                .push(format!("\"{name}\" must be a valid email"));
            return None;
        }

        Some(value.to_string())
    }

    fn required(&mut self, name: &str, rule: FieldRule) -> Option<String> {
        self.field(name, Presence::Required, rule)
    }

    fn optional(&mut self, name: &str, rule: FieldRule) -> Option<String> {
        self.field(name, Presence::Optional, rule)
    }

    fn finish(self) -> Result<(), RequestError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(RequestError::validation(
                self.violations.join(MESSAGE_SEPARATOR),
            ))
        }
    }
}

/// Unwraps a field already recorded as present by the checker.
fn checked(value: Option<String>) -> String {
    value.unwrap_or_default()
}

pub fn validate_create_organization(
    input: &Value,
) -> Result<CreateOrganizationInput, RequestError> {
    let mut checker = FieldChecker::new(input)?;
    let name = checker.required(NAME_ATTRIBUTE, FieldRule::Text);
    let description = checker.required(DESCRIPTION_ATTRIBUTE, FieldRule::Text);
    checker.finish()?;

    Ok(CreateOrganizationInput {
        name: checked(name),
        description: checked(description),
    })
}

pub fn validate_create_user(input: &Value) -> Result<CreateUserInput, RequestError> {
    let mut checker = FieldChecker::new(input)?;
    let name = checker.required(NAME_ATTRIBUTE, FieldRule::Text);
    let email = checker.required(EMAIL_ATTRIBUTE, FieldRule::Email);
    let organization_id = checker.required(ORGANIZATION_ID_ATTRIBUTE, FieldRule::Identifier);
    checker.finish()?;

    Ok(CreateUserInput {
        organization_id: checked(organization_id),
        name: checked(name),
        email: checked(email),
    })
}

pub fn validate_update_organization(
    input: &Value,
) -> Result<UpdateOrganizationInput, RequestError> {
    let mut checker = FieldChecker::new(input)?;
    let organization_id = checker.required(ORGANIZATION_ID_ATTRIBUTE, FieldRule::Identifier);
    let name = checker.optional(NAME_ATTRIBUTE, FieldRule::Text);
    let description = checker.optional(DESCRIPTION_ATTRIBUTE, FieldRule::Text);
    checker.finish()?;

    Ok(UpdateOrganizationInput {
        organization_id: checked(organization_id),
        changes: OrganizationChanges { name, description },
    })
}

pub fn validate_update_user(input: &Value) -> Result<UpdateUserInput, RequestError> {
    let mut checker = FieldChecker::new(input)?;
    let user_id = checker.required(USER_ID_ATTRIBUTE, FieldRule::Identifier);
    let name = checker.optional(NAME_ATTRIBUTE, FieldRule::Text);
    let email = checker.optional(EMAIL_ATTRIBUTE, FieldRule::Email);
    let organization_id = checker.required(ORGANIZATION_ID_ATTRIBUTE, FieldRule::Identifier);
    checker.finish()?;

    Ok(UpdateUserInput {
        user_id: checked(user_id),
        organization_id: checked(organization_id),
        changes: UserChanges { name, email },
    })
}
