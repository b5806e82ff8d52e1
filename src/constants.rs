//! Configuration key grammar.
//!
//! Fixed key names and namespace prefixes the resolver recognises, kept in
//! one place so the grammar reads as a unit.

/// Master switch; resolution only runs when this key holds the exact
/// string `true`.
pub const AWS_CONFIG_ENABLED: &str = "aws.parameterstore.config.enabled";

/// Namespace prefix for keys resolved against Parameter Store.
pub const PARAMETER_STORE_PREFIX: &str = "aws.parameterstore.";

/// Pointer sub-prefix: values under it name the parameter to fetch.
pub const PARAMETER_STORE_SECRET_NAME_PREFIX: &str = "aws.parameterstore.secretName.";

/// Region used for Secrets Manager calls, expected in the resolved
/// parameter-store values.
pub const PARAMETER_STORE_REGION: &str = "aws.parameterstore.Region";

/// Namespace prefix for keys resolved against Secrets Manager.
pub const SECRETS_MANAGER_PREFIX: &str = "aws.secretsmanager.";

/// Pointer sub-prefix: values under it name the secret to fetch.
pub const SECRETS_MANAGER_SECRET_NAME_PREFIX: &str = "aws.secretsmanager.secretName.";

/// Name of the property source the resolver publishes.
pub const OVERLAY_SOURCE_NAME: &str = "aws-config-bootstrap";
