//! Key classification.
//!
//! A single pass over the merged key space partitions keys into the
//! enablement flag, the two namespace maps, and their pointer subsets.
//! Pure scan; never touches the network.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::ConfigSources;
use crate::constants::{
    AWS_CONFIG_ENABLED, PARAMETER_STORE_PREFIX, PARAMETER_STORE_SECRET_NAME_PREFIX,
    SECRETS_MANAGER_PREFIX, SECRETS_MANAGER_SECRET_NAME_PREFIX,
};

/// Result of scanning the configuration key space.
///
/// Maps are ordered by key so downstream iteration is deterministic.
#[derive(Debug, Default)]
pub struct Classification {
    /// True only when the enablement key holds the exact string `true`.
    pub enabled: bool,
    /// Every key under the parameter-store namespace.
    pub parameter_store_props: BTreeMap<String, Value>,
    /// Every key under the secrets-manager namespace.
    pub secret_manager_props: BTreeMap<String, Value>,
    /// Subset of parameter-store keys whose values name a parameter to fetch.
    pub parameter_store_pointers: BTreeMap<String, Value>,
    /// Subset of secrets-manager keys whose values name a secret to fetch.
    pub secret_manager_pointers: BTreeMap<String, Value>,
}

/// Scans the merged view of `sources` and partitions its keys.
pub fn classify(sources: &ConfigSources) -> Classification {
    let mut classified = Classification::default();

    for (key, value) in sources.merged() {
        if key == AWS_CONFIG_ENABLED && value.as_str() == Some("true") {
            classified.enabled = true;
        }
        if key.starts_with(PARAMETER_STORE_PREFIX) {
            classified
                .parameter_store_props
                .insert(key.to_string(), value.clone());
            if key.starts_with(PARAMETER_STORE_SECRET_NAME_PREFIX) {
                classified
                    .parameter_store_pointers
                    .insert(key.to_string(), value.clone());
            }
        }
        if key.starts_with(SECRETS_MANAGER_PREFIX) {
            classified
                .secret_manager_props
                .insert(key.to_string(), value.clone());
            if key.starts_with(SECRETS_MANAGER_SECRET_NAME_PREFIX) {
                classified
                    .secret_manager_pointers
                    .insert(key.to_string(), value.clone());
            }
        }
    }

    classified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PropertySource;

    fn sources_with(entries: &[(&str, Value)]) -> ConfigSources {
        let mut source = PropertySource::new("test");
        for (key, value) in entries {
            source.set(*key, value.clone());
        }
        let mut sources = ConfigSources::new();
        sources.add(source);
        sources
    }

    #[test]
    fn test_enabled_requires_exact_true_string() {
        let enabled = classify(&sources_with(&[(AWS_CONFIG_ENABLED, Value::from("true"))]));
        assert!(enabled.enabled);

        let uppercase = classify(&sources_with(&[(AWS_CONFIG_ENABLED, Value::from("TRUE"))]));
        assert!(!uppercase.enabled);

        // A JSON boolean is not the literal string form
        let boolean = classify(&sources_with(&[(AWS_CONFIG_ENABLED, Value::from(true))]));
        assert!(!boolean.enabled);

        let absent = classify(&sources_with(&[]));
        assert!(!absent.enabled);
    }

    #[test]
    fn test_partitions_by_namespace() {
        let classified = classify(&sources_with(&[
            ("aws.parameterstore.secretName.db", Value::from("mydb")),
            ("aws.parameterstore.db.password", Value::from("placeholder")),
            ("aws.secretsmanager.secretName.api", Value::from("apisecret")),
            ("aws.secretsmanager.api.token", Value::from("placeholder")),
            ("server.port", Value::from("8080")),
        ]));

        assert_eq!(classified.parameter_store_props.len(), 2);
        assert_eq!(classified.secret_manager_props.len(), 2);
        assert_eq!(classified.parameter_store_pointers.len(), 1);
        assert_eq!(classified.secret_manager_pointers.len(), 1);
        assert!(
            classified
                .parameter_store_pointers
                .contains_key("aws.parameterstore.secretName.db")
        );
        assert!(
            classified
                .secret_manager_pointers
                .contains_key("aws.secretsmanager.secretName.api")
        );
    }

    #[test]
    fn test_scan_uses_earliest_source_for_duplicates() {
        let mut sources = ConfigSources::new();
        sources.add(PropertySource::new("first").with("aws.parameterstore.Region", "us-east-1"));
        sources.add(PropertySource::new("second").with("aws.parameterstore.Region", "eu-west-1"));

        let classified = classify(&sources);
        assert_eq!(
            classified.parameter_store_props.get("aws.parameterstore.Region"),
            Some(&Value::from("us-east-1"))
        );
    }
}
