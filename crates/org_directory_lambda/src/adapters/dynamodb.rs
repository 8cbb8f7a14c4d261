use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use org_directory_core::contract::{
    Organization, OrganizationChanges, User, UserChanges, DESCRIPTION_ATTRIBUTE, EMAIL_ATTRIBUTE,
    NAME_ATTRIBUTE, ORGANIZATION_ID_ATTRIBUTE, ORGANIZATION_NAME_INDEX, USER_EMAIL_INDEX,
    USER_ID_ATTRIBUTE,
};
use org_directory_core::update_expression::{build_update_expression, UpdateExpression};

use crate::adapters::directory_store::{DirectoryStore, StoreError};
use crate::config::DirectoryConfig;

type Item = HashMap<String, AttributeValue>;

pub struct DynamoDbDirectoryStore {
    client: aws_sdk_dynamodb::Client,
    organizations_table: String,
    users_table: String,
}

impl DynamoDbDirectoryStore {
    pub fn new(client: aws_sdk_dynamodb::Client, config: &DirectoryConfig) -> Self {
        Self {
            client,
            organizations_table: config.organizations_table.clone(),
            users_table: config.users_table.clone(),
        }
    }

    /// Builds a store from the default AWS credential and region chain.
    pub async fn from_config(config: &DirectoryConfig) -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let mut builder = aws_sdk_dynamodb::config::Builder::from(&sdk_config);
        if let Some(endpoint_url) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }
        Self::new(
            aws_sdk_dynamodb::Client::from_conf(builder.build()),
            config,
        )
    }

    fn get_item(&self, table: &str, key_name: &str, key: &str) -> Result<Option<Item>, StoreError> {
        let request = self
            .client
            .get_item()
            .table_name(table)
            .key(key_name, AttributeValue::S(key.to_string()));

        let output = block_on(request.send()).map_err(|error| {
            StoreError::Request(format!(
                "failed to get {key_name}={key} from {table}: {}",
                DisplayErrorContext(&error)
            ))
        })?;
        Ok(output.item().cloned())
    }

    fn query_index(
        &self,
        table: &str,
        index: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Item>, StoreError> {
        let request = self
            .client
            .query()
            .table_name(table)
            .index_name(index)
            .key_condition_expression("#attribute = :value")
            .expression_attribute_names("#attribute", attribute)
            .expression_attribute_values(":value", AttributeValue::S(value.to_string()));

        let output = block_on(request.send()).map_err(|error| {
            StoreError::Request(format!(
                "failed to query {index} on {table}: {}",
                DisplayErrorContext(&error)
            ))
        })?;
        Ok(output.items().to_vec())
    }

    fn put_item(&self, table: &str, item: Item) -> Result<(), StoreError> {
        let request = self.client.put_item().table_name(table).set_item(Some(item));

        block_on(request.send()).map(|_| ()).map_err(|error| {
            StoreError::Request(format!(
                "failed to put item into {table}: {}",
                DisplayErrorContext(&error)
            ))
        })
    }

    fn update_item(
        &self,
        table: &str,
        key_name: &str,
        key: &str,
        assignments: &[(&str, &str)],
    ) -> Result<Item, StoreError> {
        let Some(UpdateExpression {
            expression,
            attribute_names,
            attribute_values,
        }) = build_update_expression(assignments)
        else {
            return Err(StoreError::Request(format!(
                "update of {key_name}={key} in {table} has no fields"
            )));
        };

        let request = self
            .client
            .update_item()
            .table_name(table)
            .key(key_name, AttributeValue::S(key.to_string()))
            .update_expression(expression)
            .set_expression_attribute_names(Some(attribute_names.into_iter().collect()))
            .set_expression_attribute_values(Some(
                attribute_values
                    .into_iter()
                    .map(|(placeholder, value)| (placeholder, AttributeValue::S(value)))
                    .collect(),
            ))
            .return_values(ReturnValue::AllNew);

        let output = block_on(request.send()).map_err(|error| {
            StoreError::Request(format!(
                "failed to update {key_name}={key} in {table}: {}",
                DisplayErrorContext(&error)
            ))
        })?;
        output.attributes().cloned().ok_or_else(|| {
            StoreError::Decode(format!(
                "update of {key_name}={key} in {table} returned no attributes"
            ))
        })
    }
}

impl DirectoryStore for DynamoDbDirectoryStore {
    fn get_organization(&self, organization_id: &str) -> Result<Option<Organization>, StoreError> {
        self.get_item(
            &self.organizations_table,
            ORGANIZATION_ID_ATTRIBUTE,
            organization_id,
        )?
        .as_ref()
        .map(organization_from_item)
        .transpose()
    }

    fn query_organizations_by_name(&self, name: &str) -> Result<Vec<Organization>, StoreError> {
        self.query_index(
            &self.organizations_table,
            ORGANIZATION_NAME_INDEX,
            NAME_ATTRIBUTE,
            name,
        )?
        .iter()
        .map(organization_from_item)
        .collect()
    }

    fn put_organization(&self, organization: &Organization) -> Result<(), StoreError> {
        self.put_item(&self.organizations_table, organization_item(organization))
    }

    fn update_organization(
        &self,
        organization_id: &str,
        changes: &OrganizationChanges,
    ) -> Result<Organization, StoreError> {
        let item = self.update_item(
            &self.organizations_table,
            ORGANIZATION_ID_ATTRIBUTE,
            organization_id,
            &changes.assignments(),
        )?;
        organization_from_item(&item)
    }

    fn get_user(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        self.get_item(&self.users_table, USER_ID_ATTRIBUTE, user_id)?
            .as_ref()
            .map(user_from_item)
            .transpose()
    }

    fn query_users_by_email(&self, email: &str) -> Result<Vec<User>, StoreError> {
        self.query_index(&self.users_table, USER_EMAIL_INDEX, EMAIL_ATTRIBUTE, email)?
            .iter()
            .map(user_from_item)
            .collect()
    }

    fn put_user(&self, user: &User) -> Result<(), StoreError> {
        self.put_item(&self.users_table, user_item(user))
    }

    fn update_user(&self, user_id: &str, changes: &UserChanges) -> Result<User, StoreError> {
        let item = self.update_item(
            &self.users_table,
            USER_ID_ATTRIBUTE,
            user_id,
            &changes.assignments(),
        )?;
        user_from_item(&item)
    }
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn string_attribute(item: &Item, attribute: &str) -> Result<String, StoreError> {
    match item.get(attribute) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(StoreError::Decode(format!(
            "attribute '{attribute}' must be a string"
        ))),
        None => Err(StoreError::Decode(format!(
            "attribute '{attribute}' is missing"
        ))),
    }
}

fn organization_item(organization: &Organization) -> Item {
    HashMap::from([
        (
            ORGANIZATION_ID_ATTRIBUTE.to_string(),
            AttributeValue::S(organization.organization_id.clone()),
        ),
        (
            NAME_ATTRIBUTE.to_string(),
            AttributeValue::S(organization.name.clone()),
        ),
        (
            DESCRIPTION_ATTRIBUTE.to_string(),
            AttributeValue::S(organization.description.clone()),
        ),
    ])
}

fn organization_from_item(item: &Item) -> Result<Organization, StoreError> {
    Ok(Organization {
        organization_id: string_attribute(item, ORGANIZATION_ID_ATTRIBUTE)?,
        name: string_attribute(item, NAME_ATTRIBUTE)?,
        description: string_attribute(item, DESCRIPTION_ATTRIBUTE)?,
    })
}

fn user_item(user: &User) -> Item {
    HashMap::from([
        (
            USER_ID_ATTRIBUTE.to_string(),
            AttributeValue::S(user.user_id.clone()),
        ),
        (
            ORGANIZATION_ID_ATTRIBUTE.to_string(),
            AttributeValue::S(user.organization_id.clone()),
        ),
        (NAME_ATTRIBUTE.to_string(), AttributeValue::S(user.name.clone())),
        (
            EMAIL_ATTRIBUTE.to_string(),
            AttributeValue::S(user.email.clone()),
        ),
    ])
}

fn user_from_item(item: &Item) -> Result<User, StoreError> {
    Ok(User {
        user_id: string_attribute(item, USER_ID_ATTRIBUTE)?,
        organization_id: string_attribute(item, ORGANIZATION_ID_ATTRIBUTE)?,
        name: string_attribute(item, NAME_ATTRIBUTE)?,
        email: string_attribute(item, EMAIL_ATTRIBUTE)?,
    })
}
