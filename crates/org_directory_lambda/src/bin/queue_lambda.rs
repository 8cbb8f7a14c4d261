use lambda_runtime::{service_fn, Error, LambdaEvent};
use org_directory_lambda::adapters::dynamodb::DynamoDbDirectoryStore;
use org_directory_lambda::config::DirectoryConfig;
use org_directory_lambda::handlers::queue::{handle_queue_event, QueueBatchResponse};
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    store: &DynamoDbDirectoryStore,
) -> Result<QueueBatchResponse, Error> {
    handle_queue_event(&event.payload, store).map_err(|error| Error::from(error.to_string()))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let config = DirectoryConfig::from_env();
    tracing::info!(
        organizations_table = %config.organizations_table,
        users_table = %config.users_table,
        "starting queue handler"
    );
    let store = DynamoDbDirectoryStore::from_config(&config).await;

    lambda_runtime::run(service_fn(|event| handle_request(event, &store))).await
}
