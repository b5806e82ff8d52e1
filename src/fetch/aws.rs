use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use tracing::debug;

use super::{SecretBlob, SecretFetcher, parse_blob};
use crate::error::{ResolveError, Result};

/// Resolves parameters and secrets through the AWS SDK.
///
/// Parameter reads request decryption, so a pointer may name a
/// `SecureString` parameter provided the caller's role covers
/// `ssm:GetParameter` plus the key used to encrypt it. The Secrets Manager
/// client is rebuilt per call against whatever region the engine derived,
/// since that region is itself part of the resolved configuration.
pub struct AwsSecretFetcher {
    ssm: aws_sdk_ssm::Client,
    base: SdkConfig,
}

impl AwsSecretFetcher {
    /// Wraps an already-loaded [`SdkConfig`]; credential and default-region
    /// discovery stay the caller's responsibility.
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            ssm: aws_sdk_ssm::Client::new(config),
            base: config.clone(),
        }
    }
}

#[async_trait]
impl SecretFetcher for AwsSecretFetcher {
    async fn fetch_parameter(&self, name: &str) -> Result<SecretBlob> {
        debug!(name, "fetching parameter");
        let resp = self
            .ssm
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| ResolveError::Fetch {
                store: "parameter store",
                name: name.to_string(),
                message: aws_sdk_ssm::error::DisplayErrorContext(&e).to_string(),
            })?;

        let raw = resp
            .parameter
            .and_then(|p| p.value)
            .ok_or_else(|| ResolveError::Fetch {
                store: "parameter store",
                name: name.to_string(),
                message: "parameter exists but has no value".to_string(),
            })?;

        parse_blob(name, &raw)
    }

    async fn fetch_secret(&self, name: &str, region: &str) -> Result<SecretBlob> {
        debug!(name, region, "fetching secret");
        let config = self
            .base
            .to_builder()
            .region(Region::new(region.to_string()))
            .build();
        let client = aws_sdk_secretsmanager::Client::new(&config);

        let resp = client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .map_err(|e| ResolveError::Fetch {
                store: "secrets manager",
                name: name.to_string(),
                message: aws_sdk_secretsmanager::error::DisplayErrorContext(&e).to_string(),
            })?;

        let raw = resp.secret_string.ok_or_else(|| ResolveError::Fetch {
            store: "secrets manager",
            name: name.to_string(),
            message: "secret has no string payload".to_string(),
        })?;

        parse_blob(name, &raw)
    }
}
