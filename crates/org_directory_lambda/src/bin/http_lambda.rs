use lambda_runtime::{service_fn, Error, LambdaEvent};
use org_directory_lambda::adapters::dynamodb::DynamoDbDirectoryStore;
use org_directory_lambda::config::DirectoryConfig;
use org_directory_lambda::handlers::http::{handle_http_event, ApiGatewayResponse};
use serde_json::Value;

async fn handle_request(
    event: LambdaEvent<Value>,
    store: &DynamoDbDirectoryStore,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_http_event(event.payload, store))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let config = DirectoryConfig::from_env();
    tracing::info!(
        organizations_table = %config.organizations_table,
        users_table = %config.users_table,
        "starting http handler"
    );
    let store = DynamoDbDirectoryStore::from_config(&config).await;

    lambda_runtime::run(service_fn(|event| handle_request(event, &store))).await
}
