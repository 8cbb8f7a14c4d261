pub const ORGANIZATIONS_TABLE_VAR: &str = "ORGANIZATIONS_TABLE";
pub const USERS_TABLE_VAR: &str = "USERS_TABLE";
pub const DYNAMODB_ENDPOINT_URL_VAR: &str = "DYNAMODB_ENDPOINT_URL";

pub const DEFAULT_ORGANIZATIONS_TABLE: &str = "organizations";
pub const DEFAULT_USERS_TABLE: &str = "users";

/// Runtime settings read once per cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    pub organizations_table: String,
    pub users_table: String,
    /// Overrides the DynamoDB endpoint, e.g. for a local emulator.
    pub endpoint_url: Option<String>,
}

impl DirectoryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            organizations_table: read(ORGANIZATIONS_TABLE_VAR)
                .unwrap_or_else(|| DEFAULT_ORGANIZATIONS_TABLE.to_string()),
            users_table: read(USERS_TABLE_VAR).unwrap_or_else(|| DEFAULT_USERS_TABLE.to_string()),
            endpoint_url: read(DYNAMODB_ENDPOINT_URL_VAR),
        }
    }
}
