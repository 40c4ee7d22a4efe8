use std::env;

use aws_config::SdkConfig;

/// DynamoDB connection settings loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoConfig {
    /// Custom endpoint URL (for local DynamoDB).
    pub endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// Prefix prepended to every entity's table name (default: "")
    pub table_prefix: String,
}

impl DynamoConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AWS_ENDPOINT_URL` - Custom endpoint, e.g. `http://localhost:8000` (default: unset)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `DYNAMODB_TABLE_PREFIX` - Table name prefix, e.g. "dev-" (default: "")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            endpoint_url: lookup("AWS_ENDPOINT_URL").filter(|url| !url.is_empty()),
            region: lookup("AWS_REGION")
                .filter(|region| !region.is_empty())
                .unwrap_or_else(|| "us-east-1".to_string()),
            table_prefix: lookup("DYNAMODB_TABLE_PREFIX").unwrap_or_default(),
        }
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }

    /// Builds the shared AWS SDK configuration.
    ///
    /// Credentials come from the SDK's default provider chain.
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(self.region.clone()));

        if let Some(endpoint) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        loader.load().await
    }
}

impl Default for DynamoConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
