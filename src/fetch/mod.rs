//! External secret fetching.
//!
//! [`SecretFetcher`] is the async capability the resolution engine consumes:
//! given a name it returns the JSON object stored under it.
//! [`AwsSecretFetcher`] implements it over the AWS SDK; [`MemoryFetcher`]
//! is an in-memory stand-in for tests.

mod aws;
mod memory;

pub use aws::AwsSecretFetcher;
pub use memory::MemoryFetcher;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ResolveError, Result};

/// A fetched payload parsed as a JSON object, field name to field value.
pub type SecretBlob = serde_json::Map<String, Value>;

/// Fetches named JSON payloads from an external store.
#[async_trait]
pub trait SecretFetcher: Send + Sync {
    /// Fetches the Parameter Store parameter stored under `name`.
    async fn fetch_parameter(&self, name: &str) -> Result<SecretBlob>;

    /// Fetches the Secrets Manager secret stored under `name` in `region`.
    async fn fetch_secret(&self, name: &str, region: &str) -> Result<SecretBlob>;
}

/// Parses a raw payload into a JSON object.
pub(crate) fn parse_blob(name: &str, raw: &str) -> Result<SecretBlob> {
    let value: Value = serde_json::from_str(raw).map_err(|e| ResolveError::Parse {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(ResolveError::Parse {
            name: name.to_string(),
            message: format!("expected an object, got {}", json_type(&other)),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blob_object() {
        let blob = parse_blob("db", r#"{"username":"admin","password":"s3cr3t"}"#).unwrap();
        assert_eq!(blob.get("username"), Some(&Value::from("admin")));
        assert_eq!(blob.len(), 2);
    }

    #[test]
    fn test_parse_blob_invalid_json() {
        let err = parse_blob("db", "not json").unwrap_err();
        assert!(matches!(err, ResolveError::Parse { ref name, .. } if name == "db"));
    }

    #[test]
    fn test_parse_blob_non_object() {
        let err = parse_blob("db", r#"["a","b"]"#).unwrap_err();
        assert!(matches!(err, ResolveError::Parse { ref message, .. } if message.contains("array")));
    }
}
