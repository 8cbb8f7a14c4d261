use org_directory_core::contract::MessageBody;
use org_directory_core::error::RequestError;
use org_directory_core::events::DirectoryEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::adapters::directory_store::DirectoryStore;
use crate::handlers::organizations::{create_organization, update_organization};
use crate::handlers::users::{create_user, update_user};

pub const PROCESSED_MESSAGE: &str = "Processed";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueBatchResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: MessageBody,
}

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("SQS event must include Records array")]
    MissingRecords,

    #[error("SQS record {message_id} body must be a string")]
    InvalidRecordBody { message_id: String },

    #[error("failed to process SQS record {message_id}: {source}")]
    Record {
        message_id: String,
        #[source]
        source: RequestError,
    },
}

/// Processes every record in order. The first failure aborts the rest of
/// the batch so the host's redrive policy can retry it.
pub fn handle_queue_event(
    event: &Value,
    store: &dyn DirectoryStore,
) -> Result<QueueBatchResponse, QueueError> {
    process_records(event, store).inspect_err(log_batch_failure)
}

fn process_records(
    event: &Value,
    store: &dyn DirectoryStore,
) -> Result<QueueBatchResponse, QueueError> {
    let records = event
        .get("Records")
        .and_then(Value::as_array)
        .ok_or(QueueError::MissingRecords)?;

    for (position, record) in records.iter().enumerate() {
        let message_id = record
            .get("messageId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{position}"));
        let body = record
            .get("body")
            .and_then(Value::as_str)
            .ok_or_else(|| QueueError::InvalidRecordBody {
                message_id: message_id.clone(),
            })?;

        process_message(body, store)
            .map_err(|source| QueueError::Record { message_id, source })?;
    }

    Ok(QueueBatchResponse {
        status_code: 200,
        body: MessageBody::new(PROCESSED_MESSAGE),
    })
}

fn log_batch_failure(failure: &QueueError) {
    match failure {
        QueueError::Record { message_id, source } if !source.is_unexpected() => warn!(
            message_id = %message_id,
            status_code = source.status_code(),
            kind = source.kind(),
            error = %source,
            "queue record rejected"
        ),
        QueueError::Record { message_id, source } => error!(
            message_id = %message_id,
            status_code = source.status_code(),
            error = %source,
            "queue record failed unexpectedly"
        ),
        _ => error!(error = %failure, "queue batch failed"),
    }
}

fn process_message(body: &str, store: &dyn DirectoryStore) -> Result<(), RequestError> {
    let event = DirectoryEvent::from_message_body(body)?;
    let event_type = event
        .event_type()
        .map(|kind| kind.as_str())
        .unwrap_or_default();

    match &event {
        DirectoryEvent::CreateOrganization(payload) => {
            create_organization(store, payload)?;
        }
        DirectoryEvent::CreateUser(payload) => {
            create_user(store, payload)?;
        }
        DirectoryEvent::UpdateOrganization(payload) => {
            update_organization(store, payload)?;
        }
        DirectoryEvent::UpdateUser(payload) => {
            update_user(store, payload)?;
        }
        DirectoryEvent::Unrecognized(raw_event_type) => {
            warn!(
                event_type = raw_event_type.as_deref().unwrap_or("<missing>"),
                "skipping message with unrecognized event type"
            );
            return Ok(());
        }
    }

    info!(event_type, "queue message processed");
    Ok(())
}
