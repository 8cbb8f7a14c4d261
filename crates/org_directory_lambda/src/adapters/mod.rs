pub mod directory_store;
pub mod dynamodb;
